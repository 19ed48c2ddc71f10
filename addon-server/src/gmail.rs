//! Email context of the open message or draft
//!
//! Every member-facing action starts from "who is this email about". For a
//! received message that is the sender, unless staff sent it, in which case
//! it is the first recipient. In a draft it is the first `To` recipient.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::event::AddonEvent;

pub const GMAIL_API_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Gmail returned status {status}")]
    Status { status: u16 },
    #[error("Gmail request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl MailError {
    pub fn status(&self) -> Option<u16> {
        match self {
            MailError::Status { status } => Some(*status),
            MailError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// `From` and `To` headers of a message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageAddresses {
    pub from: Option<String>,
    pub to: Vec<String>,
}

#[async_trait]
pub trait MailContext: Send + Sync {
    async fn message_addresses(
        &self,
        message_id: &str,
        access_token: &str,
        oauth_token: &str,
    ) -> Result<MessageAddresses, MailError>;
}

pub struct GmailClient {
    client: Client,
    base_url: String,
}

impl GmailClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Deserialize)]
struct MessageMetadata {
    #[serde(default)]
    payload: Option<MessagePart>,
}

#[derive(Deserialize)]
struct MessagePart {
    #[serde(default)]
    headers: Vec<Header>,
}

#[derive(Deserialize)]
struct Header {
    name: String,
    value: String,
}

#[async_trait]
impl MailContext for GmailClient {
    async fn message_addresses(
        &self,
        message_id: &str,
        access_token: &str,
        oauth_token: &str,
    ) -> Result<MessageAddresses, MailError> {
        let response = self
            .client
            .get(format!("{}/users/me/messages/{message_id}", self.base_url))
            .query(&[
                ("format", "metadata"),
                ("metadataHeaders", "From"),
                ("metadataHeaders", "To"),
            ])
            .bearer_auth(oauth_token)
            .header("X-Goog-Gmail-Access-Token", access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(MailError::Status {
                status: response.status().as_u16(),
            });
        }
        let message: MessageMetadata = response.json().await?;

        let mut addresses = MessageAddresses::default();
        for header in message.payload.map(|p| p.headers).unwrap_or_default() {
            if header.name.eq_ignore_ascii_case("From") {
                addresses.from = parse_address_list(&header.value).into_iter().next();
            } else if header.name.eq_ignore_ascii_case("To") {
                addresses.to = parse_address_list(&header.value);
            }
        }
        Ok(addresses)
    }
}

/// Bare addresses from a header like `"Ada L" <ada@example.org>, bob@example.org`
pub fn parse_address_list(header: &str) -> Vec<String> {
    let mut addresses = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in header.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => {
                addresses.extend(bare_address(&current));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    addresses.extend(bare_address(&current));
    addresses
}

fn bare_address(mailbox: &str) -> Option<String> {
    let mailbox = mailbox.trim();
    let address = match (mailbox.rfind('<'), mailbox.rfind('>')) {
        (Some(open), Some(close)) if open < close => &mailbox[open + 1..close],
        _ => mailbox,
    };
    let address = address.trim();
    address.contains('@').then(|| address.to_lowercase())
}

fn in_domain(address: &str, domain: &str) -> bool {
    address
        .rsplit_once('@')
        .is_some_and(|(_, d)| d.eq_ignore_ascii_case(domain))
}

/// Member email for the message, from already-fetched headers
pub fn pick_member_email(addresses: &MessageAddresses, org_domain: &str) -> Option<String> {
    match &addresses.from {
        Some(from) if !in_domain(from, org_domain) => Some(from.clone()),
        _ => addresses.to.first().cloned(),
    }
}

/// Member email for the callback's Gmail context
pub async fn member_email(
    mail: &dyn MailContext,
    event: &AddonEvent,
    org_domain: &str,
) -> AppResult<String> {
    let gmail = event
        .gmail
        .as_ref()
        .ok_or_else(|| AppError::new(ErrorCode::MailContextUnavailable))?;

    let Some(message_id) = gmail.message_id.as_deref() else {
        return gmail
            .to_recipients
            .iter()
            .find_map(|r| bare_address(r))
            .ok_or_else(|| AppError::new(ErrorCode::MailContextUnavailable));
    };

    let access_token = gmail.access_token.as_deref().unwrap_or_default();
    let oauth_token = event
        .user_oauth_token()
        .ok_or_else(|| AppError::new(ErrorCode::MailContextUnavailable))?;

    let addresses = mail
        .message_addresses(message_id, access_token, oauth_token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, status = e.status(), "Gmail metadata lookup failed");
            AppError::new(ErrorCode::MailLookupFailed)
        })?;

    pick_member_email(&addresses, org_domain)
        .ok_or_else(|| AppError::new(ErrorCode::MailLookupFailed))
}
