//! JWT expiry inspection and on-disk token cache
//!
//! The backend issues a JWT on login. The token is cached in a plain file so
//! repeated runs do not log in every time. Expiry is read from the `exp`
//! claim without verifying the signature (the key is server-side only).

use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::RtlError;

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Decode the `exp` claim of a JWT
///
/// `None` when the token is not a decodable JWT, `Some(None)` when it decodes
/// but carries no expiry.
fn decode_expiry(token: &str) -> Option<Option<i64>> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature)) = (parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    Some(claims.exp)
}

/// Check whether a token must be replaced
///
/// Undecodable tokens count as expired. Tokens without an `exp` claim never
/// expire.
#[must_use]
pub fn is_token_expired(token: &str, now: DateTime<Utc>) -> bool {
    match decode_expiry(token) {
        None => true,
        Some(None) => false,
        Some(Some(exp)) => now.timestamp() > exp,
    }
}

/// File-backed JWT cache
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached token, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub async fn load(&self) -> Result<Option<String>, RtlError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cached token");
                Ok(None)
            },
            Err(e) => Err(RtlError::TokenStore(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    /// Overwrite the cached token
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, token: &str) -> Result<(), RtlError> {
        tokio::fs::write(&self.path, token).await.map_err(|e| {
            RtlError::TokenStore(format!("failed to write {}: {e}", self.path.display()))
        })
    }
}
