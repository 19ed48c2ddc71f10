//! In-memory fakes for the router tests

#![allow(dead_code)]

use addon_server::auth::{TokenVerifier, UserIdentity};
use addon_server::cards::Endpoints;
use addon_server::gmail::{MailContext, MailError, MessageAddresses};
use addon_server::openpath::{AccessControl, AccessMember, OpenPathCredentials, OpenPathResult};
use addon_server::secrets::{
    CredentialBundle, CredentialService, SecretError, SecretPayload, SecretResult, SecretStore,
};
use addon_server::{AppState, Config, api};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use chrono::NaiveDateTime;
use http::Request;
use http_body_util::BodyExt;
use neon_client::{
    AccountSummary, AttendeeStatusUpdate, EventDetail, EventQuery, EventRegistration,
    EventSummary, NeonApi, NeonConnector, NeonCredentials, NeonError, NeonResult, OrderSummary,
    Registrant,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const SYSTEM_TOKEN: &str = "system-token";
pub const USER_TOKEN: &str = "user-token";
pub const MEMBER_EMAIL: &str = "ada@example.org";
pub const SECRET_NAME: &str = "Grace_1098";

// ── Identity ──

pub struct FakeVerifier;

#[async_trait]
impl TokenVerifier for FakeVerifier {
    async fn verify_caller(&self, token: &str) -> bool {
        token == SYSTEM_TOKEN
    }

    async fn identify_user(&self, token: &str) -> Option<UserIdentity> {
        (token == USER_TOKEN).then(|| UserIdentity {
            user_id: "1098".into(),
            display_name: "Grace".into(),
            email: Some("grace@asmbly.org".into()),
        })
    }
}

// ── Secrets ──

#[derive(Default)]
pub struct MemorySecrets {
    pub secrets: Mutex<HashMap<String, SecretPayload>>,
    pub reads: Mutex<usize>,
}

impl MemorySecrets {
    pub fn with_bundle(neon_key: &str) -> Self {
        let store = Self::default();
        let data = serde_json::to_vec(&bundle(neon_key)).unwrap();
        store
            .secrets
            .lock()
            .unwrap()
            .insert(SECRET_NAME.into(), SecretPayload::new(data));
        store
    }
}

pub fn bundle(neon_key: &str) -> CredentialBundle {
    CredentialBundle {
        neon_api_key: neon_key.into(),
        openpath_user: "op-user".into(),
        openpath_key: "op-key".into(),
    }
}

#[async_trait]
impl SecretStore for MemorySecrets {
    async fn access_latest(&self, secret_id: &str) -> SecretResult<SecretPayload> {
        *self.reads.lock().unwrap() += 1;
        self.secrets
            .lock()
            .unwrap()
            .get(secret_id)
            .cloned()
            .ok_or(SecretError::NotFound)
    }

    async fn delete(&self, secret_id: &str) -> SecretResult<()> {
        self.secrets
            .lock()
            .unwrap()
            .remove(secret_id)
            .map(|_| ())
            .ok_or(SecretError::NotFound)
    }

    async fn create(&self, _secret_id: &str) -> SecretResult<()> {
        Ok(())
    }

    async fn add_version(&self, secret_id: &str, payload: &SecretPayload) -> SecretResult<()> {
        self.secrets
            .lock()
            .unwrap()
            .insert(secret_id.into(), payload.clone());
        Ok(())
    }
}

// ── Neon ──

#[derive(Default)]
pub struct NeonData {
    pub accounts: Vec<AccountSummary>,
    pub events: Vec<EventSummary>,
    pub event_registrations: HashMap<String, Vec<EventRegistration>>,
    pub account_registrations: Vec<EventRegistration>,
    pub event_details: HashMap<String, EventDetail>,
    pub orders: Vec<OrderSummary>,
    pub registered: Vec<(String, String)>,
    pub updates: Vec<AttendeeStatusUpdate>,
    pub api_keys: Vec<String>,
    pub event_queries: Vec<EventQuery>,
    pub fail_registration: Option<u16>,
}

impl NeonData {
    /// Registration, update and status-change calls seen so far
    pub fn mutations(&self) -> usize {
        self.registered.len() + self.updates.len()
    }
}

#[derive(Clone, Default)]
pub struct FakeNeon(pub Arc<Mutex<NeonData>>);

impl FakeNeon {
    pub fn data(&self) -> std::sync::MutexGuard<'_, NeonData> {
        self.0.lock().unwrap()
    }
}

#[async_trait]
impl NeonApi for FakeNeon {
    async fn search_accounts_by_email(&self, email: &str) -> NeonResult<Vec<AccountSummary>> {
        Ok(self
            .data()
            .accounts
            .iter()
            .filter(|a| a.email.as_deref() == Some(email))
            .cloned()
            .collect())
    }

    async fn search_events(&self, query: &EventQuery) -> NeonResult<Vec<EventSummary>> {
        let mut data = self.data();
        data.event_queries.push(query.clone());
        Ok(data
            .events
            .iter()
            .filter(|e| e.name.contains(&query.name))
            .cloned()
            .collect())
    }

    async fn event_registrations(&self, event_id: &str) -> NeonResult<Vec<EventRegistration>> {
        Ok(self
            .data()
            .event_registrations
            .get(event_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_event(&self, event_id: &str) -> NeonResult<EventDetail> {
        self.data()
            .event_details
            .get(event_id)
            .cloned()
            .ok_or(NeonError::Status {
                status: 404,
                body: String::new(),
            })
    }

    async fn register_for_event(
        &self,
        registrant: &Registrant,
        event_id: &str,
        _now: NaiveDateTime,
    ) -> NeonResult<()> {
        let mut data = self.data();
        if let Some(status) = data.fail_registration {
            return Err(NeonError::Status {
                status,
                body: "rejected".into(),
            });
        }
        data.registered
            .push((registrant.account_id.clone(), event_id.to_string()));
        Ok(())
    }

    async fn account_registrations(
        &self,
        _account_id: &str,
        event_id: Option<&str>,
    ) -> NeonResult<Vec<EventRegistration>> {
        Ok(self
            .data()
            .account_registrations
            .iter()
            .filter(|r| event_id.is_none() || r.event_id.as_deref() == event_id)
            .cloned()
            .collect())
    }

    async fn update_attendee_status(&self, update: &AttendeeStatusUpdate) -> NeonResult<()> {
        let mut data = self.data();
        for registration in data
            .account_registrations
            .iter_mut()
            .filter(|r| r.id == update.registration_id)
        {
            for ticket in &mut registration.tickets {
                for attendee in &mut ticket.attendees {
                    attendee.registration_status = Some(update.status.to_string());
                }
            }
        }
        data.updates.push(update.clone());
        Ok(())
    }

    async fn search_orders_by_cart_id(&self, cart_id: &str) -> NeonResult<Vec<OrderSummary>> {
        Ok(self
            .data()
            .orders
            .iter()
            .filter(|o| o.cart_id.as_deref() == Some(cart_id))
            .cloned()
            .collect())
    }
}

impl NeonConnector for FakeNeon {
    fn connect(&self, credentials: NeonCredentials) -> Arc<dyn NeonApi> {
        self.data().api_keys.push(credentials.api_key);
        Arc::new(self.clone())
    }
}

// ── Gmail ──

pub struct FakeMail {
    pub addresses: MessageAddresses,
}

#[async_trait]
impl MailContext for FakeMail {
    async fn message_addresses(
        &self,
        _message_id: &str,
        _access_token: &str,
        _oauth_token: &str,
    ) -> Result<MessageAddresses, MailError> {
        Ok(self.addresses.clone())
    }
}

// ── OpenPath ──

#[derive(Default)]
pub struct FakeAccess {
    pub calls: Mutex<Vec<(AccessMember, String)>>,
}

#[async_trait]
impl AccessControl for FakeAccess {
    async fn update_access(
        &self,
        member: &AccessMember,
        credentials: &OpenPathCredentials,
    ) -> OpenPathResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((member.clone(), credentials.user.clone()));
        Ok(())
    }
}

// ── Harness ──

pub fn test_config() -> Config {
    Config {
        environment: "test".into(),
        http_port: 0,
        public_base_url: "https://addon.example".into(),
        neon_api_user: "asmbly".into(),
        neon_base_url: "http://neon.invalid/v2".into(),
        service_account_email: "addon@project.iam.gserviceaccount.com".into(),
        system_token_audience: "https://addon.example".into(),
        user_token_audience: None,
        org_domain: "asmbly.org".into(),
        org_timezone: chrono_tz::America::Chicago,
        gcp_project_id: "test-project".into(),
        gcp_access_token: Some("gcp-token".into()),
        openpath_base_url: "http://openpath.invalid".into(),
        openpath_org_id: "1".into(),
        openpath_member_group_id: "2".into(),
        outbound_timeout_secs: 5,
        log_format: "text".into(),
    }
}

pub struct Harness {
    pub neon: FakeNeon,
    pub secrets: Arc<MemorySecrets>,
    pub access: Arc<FakeAccess>,
    pub app: Router,
    pub state: AppState,
}

impl Harness {
    /// Harness where the open message is from the member
    pub fn new() -> Self {
        Self::with_secrets(MemorySecrets::with_bundle("neon-key"))
    }

    pub fn with_secrets(secrets: MemorySecrets) -> Self {
        let neon = FakeNeon::default();
        let secrets = Arc::new(secrets);
        let access = Arc::new(FakeAccess::default());
        let config = test_config();
        let state = AppState {
            endpoints: Endpoints::new(config.public_base_url.clone()),
            config: Arc::new(config),
            verifier: Arc::new(FakeVerifier),
            credentials: CredentialService::new(secrets.clone()),
            neon: Arc::new(neon.clone()),
            mail: Arc::new(FakeMail {
                addresses: MessageAddresses {
                    from: Some(MEMBER_EMAIL.into()),
                    to: vec!["classes@asmbly.org".into()],
                },
            }),
            access: access.clone(),
        };
        Self {
            neon,
            secrets,
            access,
            app: api::create_router(state.clone()),
            state,
        }
    }

    pub async fn post(&self, path: &str, body: Value) -> Value {
        let response = self
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), http::StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}

// ── Payloads ──

/// Authorized callback with an open message and the given parameters
pub fn event(parameters: Value) -> Value {
    json!({
        "commonEventObject": {
            "hostApp": "GMAIL",
            "platform": "WEB",
            "parameters": parameters,
        },
        "authorizationEventObject": {
            "systemIdToken": SYSTEM_TOKEN,
            "userIdToken": USER_TOKEN,
            "userOAuthToken": "oauth",
        },
        "gmail": {"messageId": "m-1", "accessToken": "gmail-access"}
    })
}

pub fn event_with_inputs(inputs: Value) -> Value {
    let mut event = event(json!({}));
    event["commonEventObject"]["formInputs"] = inputs;
    event
}

pub fn text_input(value: &str) -> Value {
    json!({"stringInputs": {"value": [value]}})
}

pub fn account(id: &str, email: &str, gating: bool) -> AccountSummary {
    let date = gating.then(|| "2023-04-01".to_string());
    AccountSummary {
        account_id: id.into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: Some(email.into()),
        membership_start_date: date.clone(),
        waiver_date: date.clone(),
        facility_tour_date: date,
    }
}

pub fn registration(id: &str, event_id: &str, attendee_id: u64, status: &str) -> EventRegistration {
    serde_json::from_value(json!({
        "id": id,
        "eventId": event_id,
        "tickets": [{"attendees": [{"attendeeId": attendee_id, "registrationStatus": status}]}]
    }))
    .unwrap()
}

pub fn event_detail(id: &str, name: &str, date: &str) -> EventDetail {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "eventDates": {"startDate": date}
    }))
    .unwrap()
}

/// First pushed card of a response
pub fn pushed_card(response: &Value) -> &Value {
    &response["renderActions"]["action"]["navigations"][0]["pushCard"]
}

/// Text of the first paragraph on the pushed card
pub fn card_text(response: &Value) -> String {
    pushed_card(response)["sections"][0]["widgets"][0]["textParagraph"]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}
