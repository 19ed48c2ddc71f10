//! Per-user API credentials
//!
//! Each Gmail user stores their Neon and OpenPath keys as one JSON secret
//! named `{display_name}_{user_id}`. Every read verifies the payload's
//! CRC32C before the bundle is trusted; verified bundles are cached for the
//! life of the process and dropped when the user saves new settings.

pub mod cache;
pub mod gsm;

pub use cache::CredentialCache;
pub use gsm::{AccessTokenSource, GoogleSecretManager, SECRET_MANAGER_BASE_URL};

use crate::auth::UserIdentity;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("secret not found")]
    NotFound,
    #[error("secret checksum mismatch")]
    ChecksumMismatch,
    #[error("secret payload is not a credential bundle: {0}")]
    InvalidPayload(String),
    #[error("secret store returned status {status}")]
    Status { status: u16, body: String },
    #[error("access token unavailable: {0}")]
    Token(String),
    #[error("secret store request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type SecretResult<T> = Result<T, SecretError>;

impl From<SecretError> for AppError {
    fn from(e: SecretError) -> Self {
        match e {
            SecretError::NotFound => AppError::new(ErrorCode::SecretNotFound),
            SecretError::ChecksumMismatch => AppError::new(ErrorCode::ChecksumFailed),
            other => {
                tracing::error!(error = %other, "Credential store failure");
                AppError::new(ErrorCode::CredentialStoreFailed)
            }
        }
    }
}

/// Raw secret version with the checksum the store recorded for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretPayload {
    pub data: Vec<u8>,
    pub crc32c: Option<u32>,
}

impl SecretPayload {
    /// Payload with its checksum computed locally
    pub fn new(data: Vec<u8>) -> Self {
        let crc32c = Some(crc32c::crc32c(&data));
        Self { data, crc32c }
    }

    /// Bytes, only if the recorded checksum matches them
    pub fn verified(&self) -> SecretResult<&[u8]> {
        match self.crc32c {
            Some(expected) if crc32c::crc32c(&self.data) == expected => Ok(&self.data),
            _ => Err(SecretError::ChecksumMismatch),
        }
    }
}

#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Latest version of a secret; `NotFound` when the secret does not exist
    async fn access_latest(&self, secret_id: &str) -> SecretResult<SecretPayload>;

    /// Delete a secret and all its versions; `NotFound` when absent
    async fn delete(&self, secret_id: &str) -> SecretResult<()>;

    async fn create(&self, secret_id: &str) -> SecretResult<()>;

    async fn add_version(&self, secret_id: &str, payload: &SecretPayload) -> SecretResult<()>;
}

/// Keys one user needs for Neon and OpenPath
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialBundle {
    #[serde(rename = "N_APIkey")]
    pub neon_api_key: String,
    #[serde(rename = "O_APIuser")]
    pub openpath_user: String,
    #[serde(rename = "O_APIkey")]
    pub openpath_key: String,
}

impl std::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("openpath_user", &self.openpath_user)
            .finish_non_exhaustive()
    }
}

/// Secret id for a user. Characters Secret Manager rejects become `_`.
pub fn secret_name(identity: &UserIdentity) -> String {
    format!("{}_{}", identity.display_name, identity.user_id)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Reads and writes credential bundles through the cache
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn SecretStore>,
    cache: CredentialCache,
}

impl CredentialService {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store,
            cache: CredentialCache::new(),
        }
    }

    pub fn cache(&self) -> &CredentialCache {
        &self.cache
    }

    /// Cached bundle for the user, fetched and verified on a miss
    pub async fn get_user_keys(&self, identity: &UserIdentity) -> SecretResult<CredentialBundle> {
        let name = secret_name(identity);
        let store = &self.store;
        let secret_id = name.as_str();
        self.cache
            .get_or_fetch(&name, || async move {
                let payload = store.access_latest(secret_id).await?;
                let bytes = payload.verified()?;
                serde_json::from_slice::<CredentialBundle>(bytes)
                    .map_err(|e| SecretError::InvalidPayload(e.to_string()))
            })
            .await
    }

    /// Replace the user's secret with a fresh one holding `bundle`
    pub async fn save_user_keys(
        &self,
        identity: &UserIdentity,
        bundle: &CredentialBundle,
    ) -> SecretResult<()> {
        let name = secret_name(identity);
        match self.store.delete(&name).await {
            Ok(()) | Err(SecretError::NotFound) => {}
            Err(e) => return Err(e),
        }
        // The old bundle is gone from the store even if the rewrite fails
        self.cache.invalidate(&name);
        let data = serde_json::to_vec(bundle)
            .map_err(|e| SecretError::InvalidPayload(e.to_string()))?;
        self.store.create(&name).await?;
        self.store.add_version(&name, &SecretPayload::new(data)).await?;
        self.cache.invalidate(&name);
        tracing::info!(user_id = %identity.user_id, "Saved credential bundle");
        Ok(())
    }
}
