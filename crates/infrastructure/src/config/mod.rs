//! Application configuration
//!
//! Values are layered, later sources winning:
//! 1. built-in defaults
//! 2. an optional `rtl.toml` (or `rtl.json`, `rtl.yaml`) in the working directory
//! 3. `RTL__`-prefixed environment variables, `__` separating nested keys
//!    (e.g. `RTL__CLIENT__EMAIL`, `RTL__MONITOR__POLL_INTERVAL_SECS`)

use std::path::Path;

use application::MonitorConfig;
use integration_rtl::RtlConfig;
use serde::{Deserialize, Serialize};

use crate::telemetry::LoggingConfig;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "RTL";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// RTL backend client
    #[serde(default)]
    pub client: RtlConfig,

    /// Proximity monitor
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `rtl.*` in the working directory and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_sources(
            config::File::with_name("rtl").required(false),
            Self::environment(),
        )
    }

    /// Load configuration from an explicit file and the environment
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::from_sources(config::File::from(path).required(true), Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    fn from_sources<F>(
        file: F,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.validate().map_err(config::ConfigError::Message)?;
        Ok(app)
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<(), String> {
        self.client
            .validate()
            .map_err(|e| format!("client: {e}"))?;
        self.monitor
            .validate()
            .map_err(|e| format!("monitor: {e}"))?;
        Ok(())
    }
}
