//! OpenPath door access
//!
//! A member gets door access by being in the member group of the org. The
//! caller is responsible for checking the Neon access requirements first.

pub mod client;

pub use client::OpenPathClient;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use neon_client::AccountSummary;

#[derive(Debug, thiserror::Error)]
pub enum OpenPathError {
    #[error("OpenPath returned status {status}")]
    Status { status: u16, body: String },
    #[error("unexpected OpenPath response: {0}")]
    InvalidResponse(String),
    #[error("OpenPath request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl OpenPathError {
    pub fn status(&self) -> Option<u16> {
        match self {
            OpenPathError::Status { status, .. } => Some(*status),
            OpenPathError::Http(e) => e.status().map(|s| s.as_u16()),
            OpenPathError::InvalidResponse(_) => None,
        }
    }
}

pub type OpenPathResult<T> = Result<T, OpenPathError>;

/// Basic auth pair from the caller's credential bundle
#[derive(Clone)]
pub struct OpenPathCredentials {
    pub user: String,
    pub key: String,
}

impl OpenPathCredentials {
    pub fn basic_auth_header(&self) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", self.user, self.key)))
    }
}

impl std::fmt::Debug for OpenPathCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenPathCredentials")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// The Neon account being granted access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessMember {
    pub account_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl AccessMember {
    /// Prefers the email on the Neon account over the one from the message
    pub fn new(account: &AccountSummary, fallback_email: &str) -> Self {
        Self {
            account_id: account.account_id.clone(),
            email: account
                .email
                .clone()
                .unwrap_or_else(|| fallback_email.to_string()),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
        }
    }
}

#[async_trait]
pub trait AccessControl: Send + Sync {
    /// Make sure the member exists in OpenPath and holds the member group
    async fn update_access(
        &self,
        member: &AccessMember,
        credentials: &OpenPathCredentials,
    ) -> OpenPathResult<()>;
}
