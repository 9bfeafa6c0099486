//! Configuration for logging and message dispatch.
//!
//! Both structs can be built from environment variables or deserialized from
//! a TOML table:
//!
//! ```toml
//! unknown_notifications = "reject"
//! max_pending_requests = 128
//!
//! [logging]
//! level = "debug"
//! timestamps = false
//! ```

use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Maximum log level (default: INFO).
    pub level: LevelFilter,
    /// Show timestamps in logs (default: true).
    pub timestamps: bool,
    /// Show log targets in logs (default: true).
    pub targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            timestamps: true,
            targets: true,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from environment variables.
    ///
    /// Respects:
    /// - `LSPWIRE_LOG`: Log level (off, error, warn, info, debug, trace)
    /// - `LSPWIRE_LOG_TIMESTAMPS`: Show timestamps (0/false to disable)
    /// - `LSPWIRE_LOG_TARGETS`: Show targets (0/false to disable)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`LoggingConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let level = lookup("LSPWIRE_LOG")
            .and_then(|s| parse_level(&s))
            .unwrap_or(LevelFilter::Info);

        let timestamps = lookup("LSPWIRE_LOG_TIMESTAMPS")
            .map(|s| !is_falsy(&s))
            .unwrap_or(true);

        let targets = lookup("LSPWIRE_LOG_TARGETS")
            .map(|s| !is_falsy(&s))
            .unwrap_or(true);

        Self {
            level,
            timestamps,
            targets,
        }
    }

    /// Sets the global maximum log level.
    pub fn apply(&self) {
        log::set_max_level(self.level);
    }
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_lowercase().as_str() {
        "off" | "none" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

fn is_falsy(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "0" | "false" | "no")
}

/// What to do with a notification whose method is not in the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownNotificationPolicy {
    /// Drop it with a warning. Notifications never get a reply.
    #[default]
    Ignore,
    /// Surface it to the caller as a decode error.
    Reject,
}

/// Message dispatch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Handling of notifications with unregistered methods.
    pub unknown_notifications: UnknownNotificationPolicy,
    /// Upper bound on outgoing requests awaiting a response (0 = unbounded).
    pub max_pending_requests: usize,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            unknown_notifications: UnknownNotificationPolicy::Ignore,
            max_pending_requests: 0,
            logging: LoggingConfig::default(),
        }
    }
}

impl DispatchConfig {
    /// Create dispatch config from environment variables.
    ///
    /// Respects the logging variables of [`LoggingConfig::from_env`] plus:
    /// - `LSPWIRE_UNKNOWN_NOTIFICATIONS`: `ignore` or `reject`
    /// - `LSPWIRE_MAX_PENDING`: maximum in-flight outgoing requests
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`DispatchConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let unknown_notifications = lookup("LSPWIRE_UNKNOWN_NOTIFICATIONS")
            .and_then(|s| match s.to_lowercase().as_str() {
                "ignore" => Some(UnknownNotificationPolicy::Ignore),
                "reject" => Some(UnknownNotificationPolicy::Reject),
                _ => None,
            })
            .unwrap_or_default();

        let max_pending_requests = lookup("LSPWIRE_MAX_PENDING")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0);

        Self {
            unknown_notifications,
            max_pending_requests,
            logging: LoggingConfig::from_lookup(&lookup),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn logging_defaults() {
        let config = LoggingConfig::from_lookup(lookup(&[]));
        assert_eq!(config, LoggingConfig::default());
        assert_eq!(config.level, LevelFilter::Info);
    }

    #[test]
    fn logging_from_vars() {
        let config = LoggingConfig::from_lookup(lookup(&[
            ("LSPWIRE_LOG", "TRACE"),
            ("LSPWIRE_LOG_TIMESTAMPS", "no"),
            ("LSPWIRE_LOG_TARGETS", "1"),
        ]));
        assert_eq!(config.level, LevelFilter::Trace);
        assert!(!config.timestamps);
        assert!(config.targets);
    }

    #[test]
    fn bad_level_falls_back() {
        let config = LoggingConfig::from_lookup(lookup(&[("LSPWIRE_LOG", "loud")]));
        assert_eq!(config.level, LevelFilter::Info);
    }

    #[test]
    fn dispatch_from_vars() {
        let config = DispatchConfig::from_lookup(lookup(&[
            ("LSPWIRE_UNKNOWN_NOTIFICATIONS", "Reject"),
            ("LSPWIRE_MAX_PENDING", "64"),
            ("LSPWIRE_LOG", "off"),
        ]));
        assert_eq!(
            config.unknown_notifications,
            UnknownNotificationPolicy::Reject
        );
        assert_eq!(config.max_pending_requests, 64);
        assert_eq!(config.logging.level, LevelFilter::Off);
    }

    #[test]
    fn dispatch_from_toml() {
        let config: DispatchConfig = toml::from_str(
            r#"
            unknown_notifications = "reject"

            [logging]
            level = "debug"
            timestamps = false
            "#,
        )
        .unwrap();
        assert_eq!(
            config.unknown_notifications,
            UnknownNotificationPolicy::Reject
        );
        assert_eq!(config.max_pending_requests, 0);
        assert_eq!(config.logging.level, LevelFilter::Debug);
        assert!(!config.logging.timestamps);
        assert!(config.logging.targets);
    }

    #[test]
    fn dispatch_toml_rejects_unknown_keys() {
        let result: Result<DispatchConfig, _> = toml::from_str("retries = 3");
        assert!(result.is_err());
    }
}
