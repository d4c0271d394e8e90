//! Logging initialisation
//!
//! Installs a `tracing` subscriber with an environment-overridable filter
//! and either human-readable or JSON output.

mod logging;

pub use logging::{LoggingConfig, TelemetryError, init_logging};
