//! Add-on server configuration

use chrono_tz::Tz;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Add-on server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// Public URL the host calls back on; button actions are built from it
    pub public_base_url: String,
    /// Neon API user paired with each caller's stored API key
    pub neon_api_user: String,
    /// Neon REST base URL
    pub neon_base_url: String,
    /// Service account the host signs system ID tokens as
    pub service_account_email: String,
    /// Expected `aud` of the system ID token
    pub system_token_audience: String,
    /// Expected `aud` of the user ID token (unchecked when unset)
    pub user_token_audience: Option<String>,
    /// Mail domain of staff; messages from it are matched on the recipient
    pub org_domain: String,
    /// Timezone that decides what "today" means for class dates
    pub org_timezone: Tz,
    /// Google Cloud project holding the credential secrets
    pub gcp_project_id: String,
    /// Static OAuth token for Secret Manager (local runs); the metadata
    /// server is used when unset
    pub gcp_access_token: Option<String>,
    /// OpenPath REST base URL
    pub openpath_base_url: String,
    /// OpenPath organization id
    pub openpath_org_id: String,
    /// OpenPath group that grants member door access
    pub openpath_member_group_id: String,
    /// Timeout for every outbound HTTP call, in seconds
    pub outbound_timeout_secs: u64,
    /// `text` or `json`
    pub log_format: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn optional(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.trim().is_empty())
    }

    fn or_default(name: &str, default: &str) -> String {
        Self::optional(name).unwrap_or_else(|| default.into())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = Self::or_default("ENVIRONMENT", "development");
        let public_base_url = Self::or_default("PUBLIC_BASE_URL", "http://localhost:8080")
            .trim_end_matches('/')
            .to_string();

        let timezone_name = Self::or_default("ORG_TIMEZONE", "America/Chicago");
        let org_timezone: Tz = timezone_name
            .parse()
            .map_err(|_| format!("ORG_TIMEZONE '{timezone_name}' is not a known timezone"))?;

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            neon_api_user: Self::require_secret("NEON_API_USER", &environment)?,
            neon_base_url: Self::or_default("NEON_BASE_URL", neon_client::config::DEFAULT_BASE_URL),
            service_account_email: Self::require_secret("SERVICE_ACCT_EMAIL", &environment)?,
            system_token_audience: Self::optional("SYSTEM_TOKEN_AUDIENCE")
                .unwrap_or_else(|| public_base_url.clone()),
            user_token_audience: Self::optional("USER_TOKEN_AUDIENCE"),
            org_domain: Self::or_default("ORG_DOMAIN", "asmbly.org").to_lowercase(),
            org_timezone,
            gcp_project_id: Self::or_default("GCP_PROJECT_ID", "gmail-neon-op-integration"),
            gcp_access_token: Self::optional("GCP_ACCESS_TOKEN"),
            openpath_base_url: Self::or_default("OPENPATH_BASE_URL", "https://api.openpath.com"),
            openpath_org_id: Self::require_secret("OPENPATH_ORG_ID", &environment)?,
            openpath_member_group_id: Self::require_secret(
                "OPENPATH_MEMBER_GROUP_ID",
                &environment,
            )?,
            outbound_timeout_secs: std::env::var("OUTBOUND_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(10),
            log_format: Self::or_default("LOG_FORMAT", "text"),
            public_base_url,
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
