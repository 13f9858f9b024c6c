// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Registry contract (Lifecycle Context)
//!
//! Storage interface for `AppRecord` aggregates, defined in the domain layer
//! and implemented in `crate::infrastructure::registry`. The registry is the
//! single source of truth for managed applications.
//!
//! `update` is the concurrency-critical operation: implementations must
//! apply the mutator as one atomic read-modify-write per record, so that of
//! N racing transitions on the same id exactly one succeeds.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::app::{AppId, AppRecord, TransitionError};

/// Atomic mutation applied to a record under the registry's write guard.
/// Returning an error leaves the record unmodified.
pub type Mutator = Box<dyn FnOnce(&mut AppRecord) -> Result<(), TransitionError> + Send>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("application not found: {0}")]
    NotFound(AppId),

    #[error("duplicate application id: {0}")]
    DuplicateId(AppId),

    #[error(transparent)]
    Rejected(#[from] TransitionError),
}

/// Registry interface for `AppRecord` aggregates.
#[async_trait]
pub trait AppRegistry: Send + Sync {
    /// Insert a new record; fails with `DuplicateId` if the id exists.
    async fn insert(&self, record: AppRecord) -> Result<(), RegistryError>;

    /// Fetch a snapshot of one record.
    async fn get(&self, id: &AppId) -> Result<Option<AppRecord>, RegistryError>;

    /// Apply `mutate` to the record atomically and return the updated copy.
    async fn update(&self, id: &AppId, mutate: Mutator) -> Result<AppRecord, RegistryError>;

    /// Snapshot of all records in insertion order.
    async fn list(&self) -> Result<Vec<AppRecord>, RegistryError>;

    /// Remove a record by id.
    async fn remove(&self, id: &AppId) -> Result<(), RegistryError>;
}
