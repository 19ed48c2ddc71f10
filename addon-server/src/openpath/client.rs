//! OpenPath REST client

use super::{AccessControl, AccessMember, OpenPathCredentials, OpenPathError, OpenPathResult};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

pub struct OpenPathClient {
    client: Client,
    base_url: String,
    org_id: String,
    member_group_id: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenPathUser {
    id: Value,
    #[serde(default)]
    identity: Option<Identity>,
}

#[derive(Debug, Deserialize)]
struct Identity {
    #[serde(default)]
    email: Option<String>,
}

impl OpenPathUser {
    fn id_string(&self) -> Option<String> {
        match &self.id {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    fn has_email(&self, email: &str) -> bool {
        self.identity
            .as_ref()
            .and_then(|i| i.email.as_deref())
            .is_some_and(|e| e.eq_ignore_ascii_case(email))
    }
}

impl OpenPathClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        org_id: impl Into<String>,
        member_group_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            org_id: org_id.into(),
            member_group_id: member_group_id.into(),
        }
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        credentials: &OpenPathCredentials,
    ) -> RequestBuilder {
        self.client
            .request(method, format!("{}/orgs/{}/{}", self.base_url, self.org_id, path))
            .header(reqwest::header::AUTHORIZATION, credentials.basic_auth_header())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn check_status(response: reqwest::Response) -> OpenPathResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "OpenPath request failed");
        Err(OpenPathError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> OpenPathResult<T> {
        let envelope: Envelope<T> = Self::check_status(response).await?.json().await?;
        Ok(envelope.data)
    }

    async fn find_user(
        &self,
        email: &str,
        credentials: &OpenPathCredentials,
    ) -> OpenPathResult<Option<String>> {
        let response = self
            .request(Method::GET, "users", credentials)
            .query(&[("q", email)])
            .send()
            .await?;
        let users: Vec<OpenPathUser> = Self::read(response).await?;
        Ok(users
            .iter()
            .find(|u| u.has_email(email))
            .and_then(OpenPathUser::id_string))
    }

    async fn create_user(
        &self,
        member: &AccessMember,
        credentials: &OpenPathCredentials,
    ) -> OpenPathResult<String> {
        let response = self
            .request(Method::POST, "users", credentials)
            .json(&json!({
                "identity": {
                    "email": member.email,
                    "firstName": member.first_name,
                    "lastName": member.last_name,
                },
                "externalId": member.account_id,
                "hasRemoteUnlock": false,
            }))
            .send()
            .await?;
        let user: OpenPathUser = Self::read(response).await?;
        user.id_string()
            .ok_or_else(|| OpenPathError::InvalidResponse("created user has no id".into()))
    }

    async fn set_groups(
        &self,
        user_id: &str,
        credentials: &OpenPathCredentials,
    ) -> OpenPathResult<()> {
        let group_id = match self.member_group_id.parse::<u64>() {
            Ok(n) => json!(n),
            Err(_) => json!(self.member_group_id),
        };
        let response = self
            .request(Method::PUT, &format!("users/{user_id}/groupIds"), credentials)
            .json(&json!({"groupIds": [group_id]}))
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }
}

#[async_trait]
impl AccessControl for OpenPathClient {
    async fn update_access(
        &self,
        member: &AccessMember,
        credentials: &OpenPathCredentials,
    ) -> OpenPathResult<()> {
        let user_id = match self.find_user(&member.email, credentials).await? {
            Some(id) => id,
            None => {
                let id = self.create_user(member, credentials).await?;
                tracing::info!(
                    account_id = %member.account_id,
                    openpath_user = %id,
                    "Created OpenPath user"
                );
                id
            }
        };
        self.set_groups(&user_id, credentials).await?;
        tracing::info!(
            account_id = %member.account_id,
            openpath_user = %user_id,
            "OpenPath groups updated"
        );
        Ok(())
    }
}
