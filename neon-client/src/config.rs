//! Client configuration

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Default Neon API v2 endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.neoncrm.com/v2";

/// Connection settings shared by every caller
#[derive(Debug, Clone)]
pub struct NeonConfig {
    /// API base URL (e.g., "https://api.neoncrm.com/v2")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl NeonConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 10,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = secs;
        self
    }
}

impl Default for NeonConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Per-caller API credentials
#[derive(Clone, PartialEq, Eq)]
pub struct NeonCredentials {
    pub api_user: String,
    pub api_key: String,
}

impl NeonCredentials {
    pub fn new(api_user: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_user: api_user.into(),
            api_key: api_key.into(),
        }
    }

    /// `Authorization` header value: `Basic base64("user:key")`
    pub fn basic_auth_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.api_user, self.api_key));
        format!("Basic {token}")
    }
}

impl std::fmt::Debug for NeonCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeonCredentials")
            .field("api_user", &self.api_user)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
