// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Service Configuration
//
// Startup configuration for the APPHOST service:
// - YAML file loading with discovery precedence
// - Environment variable overrides for container deployments
// - Fail-fast validation before any service is constructed

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("service_name cannot be empty")]
    EmptyServiceName,

    #[error("host cannot be empty")]
    EmptyHost,

    #[error("port must be between 1 and 65535")]
    InvalidPort,

    #[error("secret_key must be at least {MIN_SECRET_LEN} characters (got {0})")]
    SecretTooShort(usize),
}

/// Startup configuration for the APPHOST HTTP service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name reported by `/health` (defaults to the machine hostname)
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Bind host for the HTTP facade
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port for the HTTP facade
    #[serde(default = "default_port")]
    pub port: u16,

    /// Session/signing secret; minimum 32 characters
    #[serde(default = "generated_secret")]
    pub secret_key: String,

    /// Verbose diagnostics for development
    #[serde(default)]
    pub debug: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            host: default_host(),
            port: default_port(),
            secret_key: generated_secret(),
            debug: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render as YAML (for `apphost config generate`).
    pub fn to_yaml_string(&self) -> String {
        serde_yaml::to_string(self).unwrap_or_default()
    }

    /// Discover a configuration file using precedence order:
    /// 1. `APPHOST_CONFIG_PATH` environment variable
    /// 2. `./apphost.yaml` (working directory)
    /// 3. `~/.apphost/config.yaml` (user home)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("APPHOST_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./apphost.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".apphost").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Load with discovery, falling back to defaults; env overrides applied
    /// last so container deployments win over file contents.
    pub fn load_or_default(cli_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            Self::from_yaml_file(&path)?
        } else if let Some(path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", path);
            Self::from_yaml_file(path)?
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("APPHOST_HOST") {
            if !host.trim().is_empty() {
                self.host = host;
            }
        }
        if let Ok(port) = std::env::var("APPHOST_PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => {
                    tracing::warn!("Invalid value for APPHOST_PORT: '{}'. Ignoring.", port);
                }
            }
        }
        if let Ok(secret) = std::env::var("APPHOST_SECRET_KEY") {
            self.secret_key = secret;
        }
        if let Ok(val) = std::env::var("APPHOST_DEBUG") {
            match val.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => self.debug = true,
                "false" | "0" | "no" | "off" => self.debug = false,
                _ => {
                    tracing::warn!(
                        "Invalid value for APPHOST_DEBUG: '{}'. Expected true/false. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Validate configuration. Called once at startup; the service refuses
    /// to construct on failure (no partial startup).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::EmptyServiceName);
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.secret_key.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort(self.secret_key.len()));
        }
        Ok(())
    }
}

fn default_service_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "apphost".to_string())
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn generated_secret() -> String {
    // Two v4 UUIDs give 64 hex chars, comfortably above the minimum.
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}
