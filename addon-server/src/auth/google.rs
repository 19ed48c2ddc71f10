//! Google ID token verification against Google's published signing keys
//!
//! Keys are cached in-process. A token whose `kid` is not in the cache
//! forces one refresh before it is rejected, which picks up Google's key
//! rotation without waiting for the TTL. Forced refreshes are spaced at
//! least `MIN_REFRESH_INTERVAL` apart, so unknown `kid`s cannot drive
//! outbound fetches.

use super::{TokenVerifier, UserIdentity};
use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

pub const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

const JWKS_TTL: Duration = Duration::from_secs(3600);

const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Claims read from Google ID tokens
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub given_name: Option<String>,
}

/// Expected values for the two tokens
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub service_account_email: String,
    pub system_audience: String,
    pub user_audience: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum VerifyError {
    #[error("invalid token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("no signing key for kid {0:?}")]
    UnknownKey(Option<String>),
    #[error("signing key fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
}

enum KeySource {
    Remote { client: reqwest::Client, url: String },
    Static,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

pub struct GoogleTokenVerifier {
    source: KeySource,
    cache: RwLock<Option<CachedKeys>>,
    settings: TokenSettings,
}

impl GoogleTokenVerifier {
    /// Verifier that fetches keys from `jwks_url` on demand
    pub fn new(
        client: reqwest::Client,
        jwks_url: impl Into<String>,
        settings: TokenSettings,
    ) -> Self {
        Self {
            source: KeySource::Remote {
                client,
                url: jwks_url.into(),
            },
            cache: RwLock::new(None),
            settings,
        }
    }

    /// Verifier with a fixed key set that is never refreshed
    pub fn with_key_set(keys: JwkSet, settings: TokenSettings) -> Self {
        Self {
            source: KeySource::Static,
            cache: RwLock::new(Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            })),
            settings,
        }
    }

    async fn cached_key(&self, kid: &str, allow_stale: bool) -> Option<DecodingKey> {
        let cache = self.cache.read().await;
        let cached = cache.as_ref()?;
        let fresh = cached.fetched_at.elapsed() < JWKS_TTL;
        if !fresh && !allow_stale && matches!(self.source, KeySource::Remote { .. }) {
            return None;
        }
        let jwk = cached.keys.find(kid)?;
        DecodingKey::from_jwk(jwk).ok()
    }

    /// No keys yet, or the last fetch is old enough to fetch again
    async fn may_refresh(&self) -> bool {
        match self.cache.read().await.as_ref() {
            Some(cached) => cached.fetched_at.elapsed() >= MIN_REFRESH_INTERVAL,
            None => true,
        }
    }

    async fn refresh(&self) -> Result<(), VerifyError> {
        let KeySource::Remote { client, url } = &self.source else {
            return Ok(());
        };
        let keys: JwkSet = client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        tracing::debug!(keys = keys.keys.len(), "Refreshed Google signing keys");
        *self.cache.write().await = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });
        Ok(())
    }

    async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, VerifyError> {
        let Some(kid) = kid else {
            return Err(VerifyError::UnknownKey(None));
        };
        if let Some(key) = self.cached_key(kid, false).await {
            return Ok(key);
        }
        if self.may_refresh().await {
            self.refresh().await?;
        } else {
            tracing::debug!(kid, "Unknown signing key, refresh throttled");
        }
        self.cached_key(kid, true)
            .await
            .ok_or_else(|| VerifyError::UnknownKey(Some(kid.to_string())))
    }

    async fn decode(
        &self,
        token: &str,
        audience: Option<&str>,
    ) -> Result<GoogleClaims, VerifyError> {
        let header = decode_header(token)?;
        let key = self.decoding_key(header.kid.as_deref()).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&GOOGLE_ISSUERS);
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        Ok(decode::<GoogleClaims>(token, &key, &validation)?.claims)
    }
}

/// The token names the trusted service account by email or subject
pub fn is_service_account(claims: &GoogleClaims, expected: &str) -> bool {
    if claims.email_verified == Some(false) {
        return false;
    }
    let email_matches = claims
        .email
        .as_deref()
        .is_some_and(|email| email.eq_ignore_ascii_case(expected));
    email_matches || claims.sub == expected
}

#[async_trait]
impl TokenVerifier for GoogleTokenVerifier {
    async fn verify_caller(&self, token: &str) -> bool {
        match self
            .decode(token, Some(&self.settings.system_audience))
            .await
        {
            Ok(claims) => {
                let trusted = is_service_account(&claims, &self.settings.service_account_email);
                if !trusted {
                    tracing::warn!("System token names an untrusted caller");
                }
                trusted
            }
            Err(e) => {
                tracing::warn!(error = %e, "System token rejected");
                false
            }
        }
    }

    async fn identify_user(&self, token: &str) -> Option<UserIdentity> {
        match self
            .decode(token, self.settings.user_audience.as_deref())
            .await
        {
            Ok(claims) => UserIdentity::from_claims(&claims),
            Err(e) => {
                tracing::warn!(error = %e, "User token rejected");
                None
            }
        }
    }
}
