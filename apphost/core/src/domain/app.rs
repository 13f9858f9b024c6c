// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Application Record (Lifecycle Context)
//!
//! `AppRecord` is the aggregate root of the lifecycle service: the identity,
//! address, and status of one managed HTTP application. Status changes go
//! through the transition methods on this type; callers never assign
//! `AppStatus` directly.
//!
//! ## State machine
//!
//! | Operation | Valid from | Resulting state |
//! |-----------|------------|-----------------|
//! | `start` | `Stopped` | `Running` |
//! | `stop` | `Running` | `Stopped` |
//! | `mark_error` | any | `Error` |
//!
//! `Starting` and `Stopping` are reserved for future asynchronous start/stop
//! orchestration; no operation currently drives them. `Error` is terminal by
//! policy: there is no recovery transition, operators delete the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// A unique identifier for a managed application.
///
/// Format: `app_<slug>-<rand8>` where the slug is derived from the
/// application name and `rand8` is random hex, so ids stay readable in logs
/// while collisions are practically impossible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    pub fn generate(name: &str) -> Self {
        let slug: String = name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let entropy = Uuid::new_v4().simple().to_string();
        Self(format!("app_{}-{}", slug.trim_matches('-'), &entropy[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AppId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The lifecycle state of a managed application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    /// Registered but not serving traffic (initial state)
    Stopped,
    /// Reserved: start requested, not yet running
    Starting,
    /// Serving traffic
    Running,
    /// Reserved: stop requested, not yet stopped
    Stopping,
    /// Faulted; requires operator intervention
    Error,
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppStatus::Stopped => "stopped",
            AppStatus::Starting => "starting",
            AppStatus::Running => "running",
            AppStatus::Stopping => "stopping",
            AppStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Errors raised by invalid state transitions.
///
/// The "already running" / "already stopped" phrasing is a wire contract:
/// consumers match on those substrings in the response message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("application '{0}' is already running")]
    AlreadyRunning(String),

    #[error("application '{0}' is already stopped")]
    AlreadyStopped(String),

    #[error("application '{name}' cannot transition from status '{from}'")]
    InvalidState { name: String, from: AppStatus },
}

/// A managed HTTP application: immutable identity plus mutable status.
///
/// `name`, `host`, and `port` are fixed at creation; only `status` (and the
/// `updated_at` timestamp) change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppRecord {
    pub id: AppId,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub status: AppStatus,
    #[serde(default)]
    pub config: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppRecord {
    /// Create a new record in the initial `Stopped` state.
    ///
    /// Callers are expected to have run the inputs through
    /// `crate::domain::validation` first; this constructor does not revalidate.
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        config: HashMap<String, serde_json::Value>,
    ) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: AppId::generate(&name),
            name,
            host: host.into(),
            port,
            status: AppStatus::Stopped,
            config,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition to `Running`. Valid only from `Stopped`.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        match self.status {
            AppStatus::Stopped => {
                self.status = AppStatus::Running;
                self.touch();
                Ok(())
            }
            AppStatus::Running | AppStatus::Starting => {
                Err(TransitionError::AlreadyRunning(self.name.clone()))
            }
            from => Err(TransitionError::InvalidState {
                name: self.name.clone(),
                from,
            }),
        }
    }

    /// Transition to `Stopped`. Valid only from `Running`.
    pub fn stop(&mut self) -> Result<(), TransitionError> {
        match self.status {
            AppStatus::Running => {
                self.status = AppStatus::Stopped;
                self.touch();
                Ok(())
            }
            AppStatus::Stopped | AppStatus::Stopping => {
                Err(TransitionError::AlreadyStopped(self.name.clone()))
            }
            from => Err(TransitionError::InvalidState {
                name: self.name.clone(),
                from,
            }),
        }
    }

    /// Force the record into `Error`. Operator/fault path; always valid.
    pub fn mark_error(&mut self) {
        self.status = AppStatus::Error;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AppRecord {
        AppRecord::new("svc", "localhost", 8080, HashMap::new())
    }

    #[test]
    fn test_new_record_is_stopped() {
        let rec = record();
        assert_eq!(rec.status, AppStatus::Stopped);
        assert!(rec.id.as_str().starts_with("app_svc-"));
        assert_eq!(rec.created_at, rec.updated_at);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = AppId::generate("svc");
        let b = AppId::generate("svc");
        assert_ne!(a, b);
    }

    #[test]
    fn test_start_stop_round_trip() {
        let mut rec = record();
        rec.start().unwrap();
        assert_eq!(rec.status, AppStatus::Running);
        rec.stop().unwrap();
        assert_eq!(rec.status, AppStatus::Stopped);
    }

    #[test]
    fn test_start_while_running_reports_already_running() {
        let mut rec = record();
        rec.start().unwrap();
        let err = rec.start().unwrap_err();
        assert!(err.to_string().contains("already running"));
        assert_eq!(rec.status, AppStatus::Running);
    }

    #[test]
    fn test_stop_while_stopped_reports_already_stopped() {
        let mut rec = record();
        let err = rec.stop().unwrap_err();
        assert!(err.to_string().contains("already stopped"));
        assert_eq!(rec.status, AppStatus::Stopped);
    }

    #[test]
    fn test_error_state_rejects_start_and_stop() {
        let mut rec = record();
        rec.mark_error();
        assert_eq!(rec.status, AppStatus::Error);

        let err = rec.start().unwrap_err();
        assert!(matches!(err, TransitionError::InvalidState { .. }));
        assert!(!err.to_string().contains("already running"));

        let err = rec.stop().unwrap_err();
        assert!(matches!(err, TransitionError::InvalidState { .. }));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AppStatus::Running).unwrap(),
            "\"running\""
        );
        assert_eq!(
            serde_json::to_string(&AppStatus::Stopped).unwrap(),
            "\"stopped\""
        );
        assert_eq!(serde_json::to_string(&AppStatus::Error).unwrap(), "\"error\"");
    }

    #[test]
    fn test_record_json_shape() {
        let rec = record();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["name"], "svc");
        assert_eq!(json["host"], "localhost");
        assert_eq!(json["port"], 8080);
        assert_eq!(json["status"], "stopped");
        assert!(json["id"].as_str().unwrap().starts_with("app_"));
    }
}
