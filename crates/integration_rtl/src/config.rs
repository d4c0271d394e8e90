//! RTL backend client configuration

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// AES key shipped with the official mobile app for the login payload
pub const DEFAULT_LOGIN_KEY: &str = "2023SCS@FT2840MOB6732947";

/// IV paired with [`DEFAULT_LOGIN_KEY`]
pub const DEFAULT_LOGIN_IV: &str = "JqxEoZbRvTfWgPmL";

/// Configuration for the RTL mobile booking backend
#[derive(Clone, Serialize, Deserialize)]
pub struct RtlConfig {
    /// Base URL of the booking API (everything before `/mobile` or `/booking`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Account email used for login and booking
    #[serde(default)]
    pub email: Option<String>,

    /// Account password (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub password: Option<SecretString>,

    /// AES key for the login payload (16, 24 or 32 bytes)
    #[serde(default = "default_login_key", skip_serializing)]
    pub login_key: SecretString,

    /// AES-CBC initialization vector for the login payload (16 bytes)
    #[serde(default = "default_login_iv", skip_serializing)]
    pub login_iv: SecretString,

    /// App version reported on login
    #[serde(default = "default_version_name")]
    pub version_name: String,

    /// File used to cache the JWT between runs
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

impl std::fmt::Debug for RtlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RtlConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("email", &self.email)
            .field(
                "password",
                &if self.password.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("login_key", &"[REDACTED]")
            .field("login_iv", &"[REDACTED]")
            .field("version_name", &self.version_name)
            .field("token_file", &self.token_file)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://bo.rtl.mv:4455/maldives/api".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_login_key() -> SecretString {
    SecretString::from(DEFAULT_LOGIN_KEY)
}

fn default_login_iv() -> SecretString {
    SecretString::from(DEFAULT_LOGIN_IV)
}

fn default_version_name() -> String {
    "0.9.93".to_string()
}

fn default_token_file() -> PathBuf {
    PathBuf::from("rtl.token")
}

impl Default for RtlConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            email: None,
            password: None,
            login_key: default_login_key(),
            login_iv: default_login_iv(),
            version_name: default_version_name(),
            token_file: default_token_file(),
        }
    }
}

impl RtlConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            email: Some("test@example.mv".to_string()),
            password: Some(SecretString::from("test-password")),
            token_file: std::env::temp_dir().join("rtl-test.token"),
            ..Default::default()
        }
    }

    /// Set the account credentials
    #[must_use]
    pub fn with_credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Check if login credentials are configured
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.is_empty())
            && self
                .password
                .as_ref()
                .is_some_and(|p| !p.expose_secret().is_empty())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        let key_len = self.login_key.expose_secret().len();
        if !matches!(key_len, 16 | 24 | 32) {
            return Err(format!("login_key must be 16, 24 or 32 bytes, got {key_len}"));
        }

        let iv_len = self.login_iv.expose_secret().len();
        if iv_len != 16 {
            return Err(format!("login_iv must be 16 bytes, got {iv_len}"));
        }

        Ok(())
    }
}
