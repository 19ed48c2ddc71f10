//! HTTP implementation of [`NeonApi`]

use crate::api::{AttendeeStatusUpdate, NeonApi, NeonConnector};
use crate::config::{NeonConfig, NeonCredentials};
use crate::error::{NeonError, NeonResult};
use crate::registration::{registration_body, status_patch_body};
use crate::search::{EventQuery, SearchRequest, account_search, order_search};
use crate::types::{
    AccountSummary, EventDetail, EventRegistration, EventSummary, OrderSummary, Registrant,
    RegistrationList, SearchResponse,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Neon client bound to one caller's credentials
#[derive(Debug, Clone)]
pub struct NeonClient {
    client: Client,
    base_url: String,
    auth_header: String,
}

impl NeonClient {
    /// Create a client with its own connection pool
    pub fn new(config: &NeonConfig, credentials: &NeonCredentials) -> NeonResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self::with_client(client, config, credentials))
    }

    /// Create a client sharing an existing connection pool
    pub fn with_client(client: Client, config: &NeonConfig, credentials: &NeonCredentials) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_header: credentials.basic_auth_header(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        self.client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> NeonResult<T> {
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> NeonResult<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Send a body and only check the status
    async fn send_body(&self, method: Method, path: &str, body: &Value) -> NeonResult<()> {
        let response = self.request(method, path).json(body).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> NeonResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Neon request failed");
        Err(NeonError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> NeonResult<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    async fn search_rows(
        &self,
        path: &str,
        request: &SearchRequest,
    ) -> NeonResult<Vec<Map<String, Value>>> {
        let response: SearchResponse = self.post(path, request).await?;
        Ok(response.search_results.unwrap_or_default())
    }
}

fn parse_rows<T>(
    rows: Vec<Map<String, Value>>,
    kind: &str,
    parse: impl Fn(&Map<String, Value>) -> Option<T>,
) -> NeonResult<Vec<T>> {
    rows.iter()
        .map(|row| {
            parse(row).ok_or_else(|| NeonError::InvalidResponse(format!("{kind} row without id")))
        })
        .collect()
}

#[async_trait]
impl NeonApi for NeonClient {
    async fn search_accounts_by_email(&self, email: &str) -> NeonResult<Vec<AccountSummary>> {
        let rows = self.search_rows("accounts/search", &account_search(email)).await?;
        tracing::debug!(matches = rows.len(), "Account search");
        parse_rows(rows, "account", AccountSummary::from_row)
    }

    async fn search_events(&self, query: &EventQuery) -> NeonResult<Vec<EventSummary>> {
        let rows = self.search_rows("events/search", &query.to_request()).await?;
        tracing::debug!(matches = rows.len(), "Event search");
        parse_rows(rows, "event", EventSummary::from_row)
    }

    async fn event_registrations(&self, event_id: &str) -> NeonResult<Vec<EventRegistration>> {
        let list: RegistrationList = self
            .get(&format!("events/{event_id}/eventRegistrations"), &[])
            .await?;
        Ok(list.event_registrations.unwrap_or_default())
    }

    async fn get_event(&self, event_id: &str) -> NeonResult<EventDetail> {
        self.get(&format!("events/{event_id}"), &[]).await
    }

    async fn register_for_event(
        &self,
        registrant: &Registrant,
        event_id: &str,
        now: NaiveDateTime,
    ) -> NeonResult<()> {
        let body = registration_body(registrant, event_id, now);
        self.send_body(Method::POST, "eventRegistrations", &body).await
    }

    async fn account_registrations(
        &self,
        account_id: &str,
        event_id: Option<&str>,
    ) -> NeonResult<Vec<EventRegistration>> {
        let mut query = vec![
            ("sortColumn", "registrationDateTime"),
            ("sortDirection", "DESC"),
        ];
        if let Some(event_id) = event_id {
            query.push(("eventId", event_id));
        }
        let list: RegistrationList = self
            .get(&format!("accounts/{account_id}/eventRegistrations"), &query)
            .await?;
        Ok(list.event_registrations.unwrap_or_default())
    }

    async fn update_attendee_status(&self, update: &AttendeeStatusUpdate) -> NeonResult<()> {
        let body = status_patch_body(update);
        self.send_body(
            Method::PATCH,
            &format!("eventRegistrations/{}", update.registration_id),
            &body,
        )
        .await
    }

    async fn search_orders_by_cart_id(&self, cart_id: &str) -> NeonResult<Vec<OrderSummary>> {
        let rows = self.search_rows("orders/search", &order_search(cart_id)).await?;
        parse_rows(rows, "order", OrderSummary::from_row)
    }
}

/// Hands out [`NeonClient`]s that share one connection pool
#[derive(Debug, Clone)]
pub struct NeonHttpConnector {
    client: Client,
    config: NeonConfig,
}

impl NeonHttpConnector {
    pub fn new(config: NeonConfig) -> NeonResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self { client, config })
    }
}

impl NeonConnector for NeonHttpConnector {
    fn connect(&self, credentials: NeonCredentials) -> Arc<dyn NeonApi> {
        Arc::new(NeonClient::with_client(
            self.client.clone(),
            &self.config,
            &credentials,
        ))
    }
}
