// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Creation-time validation rules
//!
//! Pure checks run before an `AppRecord` is created. All failures are
//! returned as `ValidationError` values; nothing here panics or performs
//! side effects. Callers decide whether a failure becomes a 4xx response.

use std::net::IpAddr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Names that collide with operational surfaces and are refused outright.
const RESERVED_NAMES: &[&str] = &["admin", "root", "system", "api"];

/// Characters associated with markup/shell injection.
const DENIED_NAME_CHARS: &[char] = &['<', '>', '"', '\'', '`', '\0'];

const MAX_NAME_LEN: usize = 100;

/// RFC 1123 hostname: dot-separated labels of alphanumerics and interior
/// hyphens, each label 1-63 chars.
fn hostname_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
        )
        .expect("hostname pattern is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("application name cannot be empty")]
    EmptyName,

    #[error("application name exceeds {MAX_NAME_LEN} characters (got {0})")]
    NameTooLong(usize),

    #[error("application name '{0}' is reserved")]
    ReservedName(String),

    #[error("application name contains forbidden character {0:?}")]
    ForbiddenNameCharacter(char),

    #[error("host cannot be empty")]
    EmptyHost,

    #[error("host '{0}' is not a valid hostname or IP address")]
    InvalidHost(String),

    #[error("port must be between 1 and 65535")]
    InvalidPort,
}

/// Stateless validator for application identity fields.
///
/// Passed to `AppLifecycleService` by value; construction is free, the
/// struct only exists so the rules are an explicit injected collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppValidator;

impl AppValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check name length, reserved words, and the injection denylist.
    pub fn validate_name(&self, name: &str) -> Result<(), ValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::NameTooLong(name.chars().count()));
        }
        if RESERVED_NAMES
            .iter()
            .any(|reserved| trimmed.eq_ignore_ascii_case(reserved))
        {
            return Err(ValidationError::ReservedName(trimmed.to_string()));
        }
        if let Some(c) = name
            .chars()
            .find(|c| DENIED_NAME_CHARS.contains(c) || c.is_control())
        {
            return Err(ValidationError::ForbiddenNameCharacter(c));
        }
        Ok(())
    }

    /// Check host syntax and return the normalized form.
    ///
    /// Binding to all interfaces is disallowed by policy, so the wildcard
    /// addresses `0.0.0.0` and `::` normalize to their loopback equivalents.
    pub fn validate_host(&self, host: &str) -> Result<String, ValidationError> {
        let trimmed = host.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyHost);
        }

        // IPv6 literals may arrive in URL bracket form.
        let candidate = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);

        if let Ok(ip) = candidate.parse::<IpAddr>() {
            return Ok(match ip {
                IpAddr::V4(v4) if v4.is_unspecified() => "127.0.0.1".to_string(),
                IpAddr::V6(v6) if v6.is_unspecified() => "::1".to_string(),
                other => other.to_string(),
            });
        }

        if trimmed.len() <= 253 && hostname_pattern().is_match(trimmed) {
            return Ok(trimmed.to_string());
        }

        Err(ValidationError::InvalidHost(trimmed.to_string()))
    }

    /// Check port range. Ports below 1024 pass here; a privileged-bind
    /// failure is the OS layer's to report.
    pub fn validate_port(&self, port: u16) -> Result<(), ValidationError> {
        if port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> AppValidator {
        AppValidator::new()
    }

    #[test]
    fn test_valid_names() {
        for name in ["svc", "my-app", "Backend API Gateway", "a", "app_01"] {
            assert!(validator().validate_name(name).is_ok(), "rejected {name:?}");
        }
    }

    #[test]
    fn test_empty_and_whitespace_names_rejected() {
        assert_eq!(
            validator().validate_name(""),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            validator().validate_name("   "),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn test_overlong_name_rejected() {
        let name = "x".repeat(101);
        assert_eq!(
            validator().validate_name(&name),
            Err(ValidationError::NameTooLong(101))
        );
        assert!(validator().validate_name(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_reserved_names_rejected_case_insensitively() {
        for name in ["admin", "Admin", "ROOT", "system", "API"] {
            assert!(
                matches!(
                    validator().validate_name(name),
                    Err(ValidationError::ReservedName(_))
                ),
                "accepted reserved name {name:?}"
            );
        }
    }

    #[test]
    fn test_injection_characters_rejected() {
        for name in ["<script>", "a>b", "it's", "say \"hi\"", "tick`", "nul\0"] {
            assert!(
                matches!(
                    validator().validate_name(name),
                    Err(ValidationError::ForbiddenNameCharacter(_))
                ),
                "accepted {name:?}"
            );
        }
    }

    #[test]
    fn test_valid_hosts_pass_through() {
        assert_eq!(
            validator().validate_host("localhost").unwrap(),
            "localhost"
        );
        assert_eq!(
            validator().validate_host("api.example.com").unwrap(),
            "api.example.com"
        );
        assert_eq!(validator().validate_host("127.0.0.1").unwrap(), "127.0.0.1");
        assert_eq!(validator().validate_host("::1").unwrap(), "::1");
        assert_eq!(validator().validate_host("[::1]").unwrap(), "::1");
        assert_eq!(
            validator().validate_host("  10.1.2.3  ").unwrap(),
            "10.1.2.3"
        );
    }

    #[test]
    fn test_wildcard_hosts_normalize_to_loopback() {
        assert_eq!(validator().validate_host("0.0.0.0").unwrap(), "127.0.0.1");
        assert_eq!(validator().validate_host("::").unwrap(), "::1");
    }

    #[test]
    fn test_invalid_hosts_rejected() {
        assert_eq!(
            validator().validate_host(""),
            Err(ValidationError::EmptyHost)
        );
        assert_eq!(
            validator().validate_host("   "),
            Err(ValidationError::EmptyHost)
        );
        for host in ["-leading.dash", "trailing-.dash", "spaces in host", "a..b"] {
            assert!(
                matches!(
                    validator().validate_host(host),
                    Err(ValidationError::InvalidHost(_))
                ),
                "accepted {host:?}"
            );
        }
    }

    #[test]
    fn test_port_range() {
        assert_eq!(
            validator().validate_port(0),
            Err(ValidationError::InvalidPort)
        );
        assert!(validator().validate_port(1).is_ok());
        assert!(validator().validate_port(80).is_ok());
        assert!(validator().validate_port(65535).is_ok());
    }
}
