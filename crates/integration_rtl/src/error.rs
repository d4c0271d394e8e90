//! RTL client error types

use thiserror::Error;

/// Errors that can occur while talking to the RTL booking backend
#[derive(Debug, Error)]
pub enum RtlError {
    /// Connection to the backend failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request returned a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse a response body
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// An authenticated call was made before logging in
    #[error("Not authenticated: call login first")]
    NotAuthenticated,

    /// Login was rejected or the backend refused the token
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Backend answered 500 for a product lookup
    #[error("Blank data: {0}")]
    BlankData(String),

    /// Payment requested but the booking has no saved card
    #[error("No card available: {0}")]
    NoCardAvailable(String),

    /// Login payload encryption failed
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Reading or writing the cached token failed
    #[error("Token store error: {0}")]
    TokenStore(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl RtlError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }

    /// Map a transport-level reqwest error
    pub(crate) fn from_transport(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::ConnectionFailed(err.to_string())
        }
    }
}
