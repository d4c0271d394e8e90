//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the RTL client and provides
//! configuration loading and logging initialisation.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::AppConfig;
pub use telemetry::{LoggingConfig, TelemetryError, init_logging};
