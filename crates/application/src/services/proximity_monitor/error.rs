//! Proximity monitor errors

use std::time::Duration;

use thiserror::Error;

/// Errors raised by the proximity monitor
///
/// `Network`, `FetchTimeout` and `Callback` are produced inside a poll cycle.
/// They are logged and counted there and never stop the poller.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Fetching live positions for a route failed
    #[error("Live position fetch for route {route_code} failed: {message}")]
    Network {
        /// Route whose feed failed
        route_code: String,
        /// Underlying error message
        message: String,
    },

    /// Fetching live positions for a route took too long
    #[error("Live position fetch for route {route_code} timed out after {timeout:?}")]
    FetchTimeout {
        /// Route whose feed timed out
        route_code: String,
        /// Configured fetch timeout
        timeout: Duration,
    },

    /// A registered callback returned an error or panicked
    #[error("Proximity callback failed: {0}")]
    Callback(String),

    /// The poller could not be spawned because no Tokio runtime is active
    #[error("No Tokio runtime available to run the proximity poller")]
    NoRuntime,

    /// The monitor has been shut down
    #[error("Proximity monitor has been stopped")]
    Stopped,
}
