//! Application state for the add-on server

use crate::auth::{GOOGLE_JWKS_URL, GoogleTokenVerifier, TokenSettings, TokenVerifier};
use crate::cards::Endpoints;
use crate::config::Config;
use crate::gmail::{GMAIL_API_BASE_URL, GmailClient, MailContext};
use crate::openpath::{AccessControl, OpenPathClient};
use crate::secrets::{
    AccessTokenSource, CredentialService, GoogleSecretManager, SECRET_MANAGER_BASE_URL,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use neon_client::{NeonConfig, NeonConnector, NeonHttpConnector};
use std::sync::Arc;
use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
///
/// Every outbound dependency sits behind a trait object so integration tests
/// can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Verifies the system and user ID tokens
    pub verifier: Arc<dyn TokenVerifier>,
    /// Per-user API keys with the process-wide cache
    pub credentials: CredentialService,
    /// Builds a Neon client for the caller's key
    pub neon: Arc<dyn NeonConnector>,
    /// Headers of the open message
    pub mail: Arc<dyn MailContext>,
    /// OpenPath group updates
    pub access: Arc<dyn AccessControl>,
    pub endpoints: Endpoints,
}

impl AppState {
    /// Wire up the production clients
    pub fn new(config: &Config) -> Result<Self, BoxError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.outbound_timeout_secs))
            .build()?;

        let verifier = GoogleTokenVerifier::new(
            http.clone(),
            GOOGLE_JWKS_URL,
            TokenSettings {
                service_account_email: config.service_account_email.clone(),
                system_audience: config.system_token_audience.clone(),
                user_audience: config.user_token_audience.clone(),
            },
        );

        let tokens = match &config.gcp_access_token {
            Some(token) => AccessTokenSource::Static(token.clone()),
            None => AccessTokenSource::metadata(http.clone()),
        };
        let secrets = GoogleSecretManager::new(
            http.clone(),
            SECRET_MANAGER_BASE_URL,
            config.gcp_project_id.clone(),
            tokens,
        );

        let neon = NeonHttpConnector::new(
            NeonConfig::new(config.neon_base_url.clone())
                .with_timeout(config.outbound_timeout_secs),
        )?;

        let access = OpenPathClient::new(
            http.clone(),
            config.openpath_base_url.clone(),
            config.openpath_org_id.clone(),
            config.openpath_member_group_id.clone(),
        );

        Ok(Self {
            endpoints: Endpoints::new(config.public_base_url.clone()),
            config: Arc::new(config.clone()),
            verifier: Arc::new(verifier),
            credentials: CredentialService::new(Arc::new(secrets)),
            neon: Arc::new(neon),
            mail: Arc::new(GmailClient::new(http, GMAIL_API_BASE_URL)),
            access: Arc::new(access),
        })
    }

    /// Today's civil date in the organization's timezone
    pub fn today(&self) -> NaiveDate {
        self.now_local().date()
    }

    pub fn now_local(&self) -> NaiveDateTime {
        Utc::now()
            .with_timezone(&self.config.org_timezone)
            .naive_local()
    }
}
