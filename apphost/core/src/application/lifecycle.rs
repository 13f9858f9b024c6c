// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Application lifecycle service
//!
//! Business operations over the registry: create, start, stop, get, list,
//! remove, mark_error. Owns the mapping from validator/registry errors to
//! the service's own error kinds; the HTTP facade is the only layer that
//! turns these into status codes.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::app::{AppId, AppRecord, TransitionError};
use crate::domain::registry::{AppRegistry, RegistryError};
use crate::domain::validation::{AppValidator, ValidationError};

/// Input to `AppLifecycleService::create`.
#[derive(Debug, Clone)]
pub struct CreateAppRequest {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub config: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("application not found: {0}")]
    NotFound(AppId),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Internal invariant violation: generated ids never collide.
    #[error("duplicate application id: {0}")]
    DuplicateId(AppId),
}

impl From<RegistryError> for LifecycleError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => LifecycleError::NotFound(id),
            RegistryError::DuplicateId(id) => LifecycleError::DuplicateId(id),
            RegistryError::Rejected(e) => LifecycleError::Transition(e),
        }
    }
}

/// Lifecycle operations for managed applications.
///
/// Collaborators are injected at construction; the service holds no global
/// state of its own.
pub struct AppLifecycleService {
    registry: Arc<dyn AppRegistry>,
    validator: AppValidator,
}

impl AppLifecycleService {
    pub fn new(registry: Arc<dyn AppRegistry>, validator: AppValidator) -> Self {
        Self {
            registry,
            validator,
        }
    }

    /// Validate inputs, generate an id, and register a new `Stopped` record.
    ///
    /// Name and host are stored in normalized (trimmed) form. On any
    /// validation failure nothing is inserted.
    pub async fn create(&self, request: CreateAppRequest) -> Result<AppRecord, LifecycleError> {
        let name = request.name.trim().to_string();
        self.validator.validate_name(&name)?;
        let host = self.validator.validate_host(&request.host)?;
        self.validator.validate_port(request.port)?;

        let record = AppRecord::new(name, host, request.port, request.config);
        self.registry.insert(record.clone()).await?;

        tracing::info!(id = %record.id, name = %record.name, "application registered");
        Ok(record)
    }

    /// Transition an application to `Running`.
    pub async fn start(&self, id: &AppId) -> Result<AppRecord, LifecycleError> {
        let record = self
            .registry
            .update(id, Box::new(|record| record.start()))
            .await?;
        tracing::info!(id = %id, "application started");
        Ok(record)
    }

    /// Transition an application to `Stopped`.
    pub async fn stop(&self, id: &AppId) -> Result<AppRecord, LifecycleError> {
        let record = self
            .registry
            .update(id, Box::new(|record| record.stop()))
            .await?;
        tracing::info!(id = %id, "application stopped");
        Ok(record)
    }

    /// Operator fault path: force an application into `Error`.
    pub async fn mark_error(&self, id: &AppId) -> Result<AppRecord, LifecycleError> {
        let record = self
            .registry
            .update(
                id,
                Box::new(|record| {
                    record.mark_error();
                    Ok(())
                }),
            )
            .await?;
        tracing::warn!(id = %id, "application marked as errored");
        Ok(record)
    }

    pub async fn get(&self, id: &AppId) -> Result<AppRecord, LifecycleError> {
        self.registry
            .get(id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(id.clone()))
    }

    pub async fn list(&self) -> Result<Vec<AppRecord>, LifecycleError> {
        Ok(self.registry.list().await?)
    }

    pub async fn remove(&self, id: &AppId) -> Result<(), LifecycleError> {
        self.registry.remove(id).await?;
        tracing::info!(id = %id, "application removed");
        Ok(())
    }
}
