//! # TL Telemetry
//!
//! Logging bootstrap for binaries and test harnesses in the workspace.
//! Library crates only emit `tracing` events; this crate installs the
//! subscriber that renders them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tl_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     init_logging(&TelemetryConfig::from_env()).expect("logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TL_SERVICE_NAME` | `tl-log-lookup` | Service name in events |
//! | `TL_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `TL_JSON_LOGS` | `false` | JSON output (defaults on in containers) |
//! | `TL_LOG_SOURCE` | `false` | Include file and line |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The filter directives could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A global subscriber is already installed.
    #[error("Subscriber already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install logging, ignoring a subscriber that is already set.
///
/// Meant for tests, where many cases race to initialize.
pub fn try_init_for_tests() {
    let config = TelemetryConfig {
        log_level: "debug".to_string(),
        json_logs: false,
        ..TelemetryConfig::for_component("tests")
    };
    let _ = init_logging(&config);
}
