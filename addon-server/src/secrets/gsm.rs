//! Google Secret Manager over REST

use super::{SecretError, SecretPayload, SecretResult, SecretStore};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

pub const SECRET_MANAGER_BASE_URL: &str = "https://secretmanager.googleapis.com/v1";

pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Tokens are refreshed this long before they expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Where the service's OAuth access token comes from
pub enum AccessTokenSource {
    /// Fixed token, for local runs
    Static(String),
    /// Compute metadata server, cached until shortly before expiry
    Metadata {
        client: Client,
        url: String,
        cached: RwLock<Option<(String, Instant)>>,
    },
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: u64,
}

impl AccessTokenSource {
    pub fn metadata(client: Client) -> Self {
        Self::Metadata {
            client,
            url: METADATA_TOKEN_URL.to_string(),
            cached: RwLock::new(None),
        }
    }

    async fn token(&self) -> SecretResult<String> {
        let (client, url, cached) = match self {
            Self::Static(token) => return Ok(token.clone()),
            Self::Metadata {
                client,
                url,
                cached,
            } => (client, url, cached),
        };

        if let Some((token, expires_at)) = cached.read().await.as_ref() {
            if Instant::now() + TOKEN_EXPIRY_MARGIN < *expires_at {
                return Ok(token.clone());
            }
        }

        let response = client
            .get(url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| SecretError::Token(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SecretError::Token(format!(
                "metadata server returned {}",
                response.status()
            )));
        }
        let token: MetadataToken = response
            .json()
            .await
            .map_err(|e| SecretError::Token(e.to_string()))?;

        let expires_at = Instant::now() + Duration::from_secs(token.expires_in);
        *cached.write().await = Some((token.access_token.clone(), expires_at));
        Ok(token.access_token)
    }
}

#[derive(Deserialize)]
struct AccessResponse {
    payload: AccessPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessPayload {
    #[serde(default)]
    data: String,
    /// int64, serialized by the API as a JSON string
    #[serde(default)]
    data_crc32c: Option<Value>,
}

fn parse_crc32c(value: Option<&Value>) -> Option<u32> {
    let value = match value? {
        Value::String(s) => s.parse::<u64>().ok()?,
        Value::Number(n) => n.as_u64()?,
        _ => return None,
    };
    u32::try_from(value).ok()
}

pub struct GoogleSecretManager {
    client: Client,
    base_url: String,
    project_id: String,
    tokens: AccessTokenSource,
}

impl GoogleSecretManager {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        tokens: AccessTokenSource,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            tokens,
        }
    }

    fn secret_url(&self, secret_id: &str) -> String {
        format!(
            "{}/projects/{}/secrets/{}",
            self.base_url, self.project_id, secret_id
        )
    }

    async fn check_status(response: reqwest::Response) -> SecretResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(SecretError::NotFound);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Secret Manager request failed");
        Err(SecretError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl SecretStore for GoogleSecretManager {
    async fn access_latest(&self, secret_id: &str) -> SecretResult<SecretPayload> {
        let token = self.tokens.token().await?;
        let response = self
            .client
            .get(format!("{}/versions/latest:access", self.secret_url(secret_id)))
            .bearer_auth(token)
            .send()
            .await?;
        let body: AccessResponse = Self::check_status(response).await?.json().await?;

        let data = STANDARD
            .decode(body.payload.data.as_bytes())
            .map_err(|e| SecretError::InvalidPayload(e.to_string()))?;
        Ok(SecretPayload {
            data,
            crc32c: parse_crc32c(body.payload.data_crc32c.as_ref()),
        })
    }

    async fn delete(&self, secret_id: &str) -> SecretResult<()> {
        let token = self.tokens.token().await?;
        let response = self
            .client
            .delete(self.secret_url(secret_id))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn create(&self, secret_id: &str) -> SecretResult<()> {
        let token = self.tokens.token().await?;
        let response = self
            .client
            .post(format!(
                "{}/projects/{}/secrets",
                self.base_url, self.project_id
            ))
            .query(&[("secretId", secret_id)])
            .bearer_auth(token)
            .json(&json!({"replication": {"automatic": {}}}))
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn add_version(&self, secret_id: &str, payload: &SecretPayload) -> SecretResult<()> {
        let token = self.tokens.token().await?;
        let mut body = json!({"payload": {"data": STANDARD.encode(&payload.data)}});
        if let Some(crc) = payload.crc32c {
            body["payload"]["dataCrc32c"] = Value::String(crc.to_string());
        }
        let response = self
            .client
            .post(format!("{}:addVersion", self.secret_url(secret_id)))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }
}
