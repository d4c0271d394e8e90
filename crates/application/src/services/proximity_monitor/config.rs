//! Proximity monitor configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::watch::DEFAULT_THRESHOLD_KM;

/// Proximity monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Pause between two poll cycles in seconds (default: 5)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Upper bound for a single live position fetch in seconds (default: 10)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Threshold the monitor assigns to watches registered without one (default: 0.035 km)
    #[serde(default = "default_threshold_km")]
    pub default_threshold_km: f64,
}

const fn default_poll_interval() -> u64 {
    5
}

const fn default_fetch_timeout() -> u64 {
    10
}

const fn default_threshold_km() -> f64 {
    DEFAULT_THRESHOLD_KM
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            fetch_timeout_secs: default_fetch_timeout(),
            default_threshold_km: default_threshold_km(),
        }
    }
}

impl MonitorConfig {
    /// Validate the configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_secs == 0 {
            return Err("poll_interval_secs must be greater than 0".to_string());
        }

        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be greater than 0".to_string());
        }

        if !self.default_threshold_km.is_finite() || self.default_threshold_km <= 0.0 {
            return Err(format!(
                "default_threshold_km must be a positive number, got {}",
                self.default_threshold_km
            ));
        }

        Ok(())
    }

    /// Poll interval and fetch timeout as durations
    #[must_use]
    pub const fn timings(&self) -> PollTimings {
        PollTimings {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }
}

/// Timing parameters of the poller loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTimings {
    /// Sleep between the end of one cycle and the start of the next
    pub poll_interval: Duration,
    /// Bound for one live position fetch
    pub fetch_timeout: Duration,
}

impl Default for PollTimings {
    fn default() -> Self {
        MonitorConfig::default().timings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.fetch_timeout_secs, 10);
        assert!((config.default_threshold_km - 0.035).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn timings_from_config() {
        let timings = MonitorConfig::default().timings();
        assert_eq!(timings.poll_interval, Duration::from_secs(5));
        assert_eq!(timings.fetch_timeout, Duration::from_secs(10));
        assert_eq!(PollTimings::default(), timings);
    }

    #[test]
    fn rejects_zero_interval() {
        let config = MonitorConfig {
            poll_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = MonitorConfig {
            fetch_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_threshold() {
        for threshold in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = MonitorConfig {
                default_threshold_km: threshold,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "accepted {threshold}");
        }
    }

    #[test]
    fn deserialize_partial() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{"poll_interval_secs": 2}"#).unwrap();
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(config.fetch_timeout_secs, 10);
    }
}
