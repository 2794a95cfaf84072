//! CSPM API connection settings.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

pub const DEFAULT_API_URL: &str = "https://us2.app.sysdig.com";

fn default_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Default per-request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the CSPM API (scheme + host, no path).
    #[serde(default = "default_url")]
    pub url: String,

    /// Bearer token sent with every request.
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.token.trim().is_empty()
    }

    /// The token, or an error naming where it can be supplied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when the token is empty and
    /// [`ConfigError::InvalidValue`] when the URL is blank.
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api.url".into(),
                reason: "must not be empty".into(),
            });
        }
        let token = self.token.trim();
        if token.is_empty() {
            return Err(ConfigError::NotConfigured {
                field: "api.token".into(),
                env: "SYSDIG_API_TOKEN".into(),
            });
        }
        Ok(token)
    }
}
