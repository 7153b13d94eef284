//! Telemetry configuration from environment variables.

use std::env;

use serde::{Deserialize, Serialize};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to every event
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error or a directive list)
    pub log_level: String,

    /// Whether to emit JSON instead of human-readable lines
    pub json_logs: bool,

    /// Whether to include source file and line in events
    pub with_source_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "tl-log-lookup".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_source_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TL_SERVICE_NAME`: Service name (default: tl-log-lookup)
    /// - `TL_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `TL_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `TL_LOG_SOURCE`: Include file and line (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();
        let enabled = |v: String| v.to_lowercase() == "true" || v == "1";

        Self {
            service_name: lookup("TL_SERVICE_NAME").unwrap_or_else(|| "tl-log-lookup".to_string()),

            log_level: lookup("TL_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),

            json_logs: lookup("TL_JSON_LOGS").map(enabled).unwrap_or(is_container),

            with_source_location: lookup("TL_LOG_SOURCE").map(enabled).unwrap_or(false),
        }
    }

    /// Configuration for a named component, other fields from the environment.
    pub fn for_component(component: &str) -> Self {
        Self {
            service_name: format!("tl-{}", component),
            ..Self::from_env()
        }
    }
}
