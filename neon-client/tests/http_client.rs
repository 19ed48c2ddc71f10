//! NeonClient against an in-process stub of the Neon API

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use neon_client::{
    AttendeeStatusUpdate, EventQuery, NeonApi, NeonClient, NeonConfig, NeonCredentials, NeonError,
    Registrant,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
    auth: Arc<Mutex<Vec<String>>>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl Recorded {
    fn record_auth(&self, headers: &HeaderMap) {
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.auth.lock().unwrap().push(value);
    }
}

async fn accounts_search(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    rec.record_auth(&headers);
    rec.bodies.lock().unwrap().push(("accounts/search".into(), body));
    Json(json!({
        "searchResults": [{
            "Account ID": "1234",
            "First Name": "Ada",
            "Last Name": "Lovelace",
            "Email 1": "ada@example.org",
            "Membership Start Date": "2023-04-01",
            "WaiverDate": "2023-03-30",
            "FacilityTourDate": "2023-04-02"
        }],
        "pagination": {"currentPage": 0, "pageSize": 200, "totalResults": 1}
    }))
}

async fn events_search(State(rec): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    rec.bodies.lock().unwrap().push(("events/search".into(), body));
    Json(json!({
        "searchResults": [
            {"Event ID": "55", "Event Name": "Laser Cutter Basics", "Event Start Date": "2024-01-12", "Event Capacity": "10"}
        ]
    }))
}

async fn account_regs(
    State(rec): State<Recorded>,
    Path(account_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    assert_eq!(account_id, "1234");
    rec.queries.lock().unwrap().push(query);
    Json(json!({
        "eventRegistrations": [{
            "id": "901",
            "eventId": "55",
            "tickets": [{"attendees": [{"attendeeId": 7001, "registrationStatus": "SUCCEEDED"}]}]
        }]
    }))
}

async fn patch_registration(
    State(rec): State<Recorded>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    rec.bodies.lock().unwrap().push((format!("eventRegistrations/{id}"), body));
    StatusCode::OK
}

async fn failing_registration() -> (StatusCode, &'static str) {
    (StatusCode::UNPROCESSABLE_ENTITY, "event is full")
}

async fn start_stub() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/v2/accounts/search", post(accounts_search))
        .route("/v2/events/search", post(events_search))
        .route("/v2/accounts/{id}/eventRegistrations", get(account_regs))
        .route("/v2/eventRegistrations/{id}", patch(patch_registration))
        .route("/v2/eventRegistrations", post(failing_registration))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/v2"), recorded)
}

fn client(base_url: &str) -> NeonClient {
    NeonClient::new(
        &NeonConfig::new(base_url).with_timeout(5),
        &NeonCredentials::new("asmbly", "secret"),
    )
    .unwrap()
}

#[tokio::test]
async fn test_account_search_sends_basic_auth_and_parses_rows() {
    let (base_url, recorded) = start_stub().await;
    let accounts = client(&base_url)
        .search_accounts_by_email("ada@example.org")
        .await
        .unwrap();

    assert_eq!(accounts.len(), 1);
    assert!(accounts[0].meets_access_requirements());
    assert_eq!(
        recorded.auth.lock().unwrap()[0],
        "Basic YXNtYmx5OnNlY3JldA=="
    );
    let bodies = recorded.bodies.lock().unwrap();
    assert_eq!(bodies[0].1["searchFields"][0]["value"], "ada@example.org");
    assert_eq!(bodies[0].1["pagination"]["pageSize"], 200);
}

#[tokio::test]
async fn test_event_search_posts_predicates() {
    let (base_url, recorded) = start_stub().await;
    let query = EventQuery {
        name: "Laser".into(),
        start: NaiveDate::from_ymd_opt(2024, 1, 10),
        end: NaiveDate::from_ymd_opt(2024, 1, 20),
        today: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
    };
    let events = client(&base_url).search_events(&query).await.unwrap();

    assert_eq!(events[0].capacity, Some(10));
    let bodies = recorded.bodies.lock().unwrap();
    let fields = bodies[0].1["searchFields"].as_array().unwrap();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[2]["operator"], "LESS_AND_EQUAL");
}

#[tokio::test]
async fn test_cancel_flow_patches_resolved_attendee() {
    let (base_url, recorded) = start_stub().await;
    let neon = client(&base_url);

    let outcome = neon_client::registration::cancel_registration(&neon, "901", "55", "1234")
        .await
        .unwrap();
    assert_eq!(
        outcome,
        neon_client::Termination::Applied {
            attendee_id: "7001".into()
        }
    );

    let query = &recorded.queries.lock().unwrap()[0];
    assert_eq!(query.get("eventId").map(String::as_str), Some("55"));
    assert_eq!(query.get("sortDirection").map(String::as_str), Some("DESC"));

    let bodies = recorded.bodies.lock().unwrap();
    let (path, body) = &bodies[0];
    assert_eq!(path, "eventRegistrations/901");
    assert_eq!(body["tickets"][0]["attendees"][0]["attendeeId"], 7001);
    assert_eq!(body["tickets"][0]["attendees"][0]["registrationStatus"], "CANCELED");
}

#[tokio::test]
async fn test_non_success_status_is_reported() {
    let (base_url, _) = start_stub().await;
    let registrant = Registrant {
        account_id: "1234".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
    };
    let now = NaiveDate::from_ymd_opt(2024, 1, 5)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();

    let err = client(&base_url)
        .register_for_event(&registrant, "55", now)
        .await
        .unwrap_err();
    assert!(matches!(err, NeonError::Status { status: 422, .. }));
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn test_update_status_direct() {
    let (base_url, recorded) = start_stub().await;
    client(&base_url)
        .update_attendee_status(&AttendeeStatusUpdate {
            registration_id: "901".into(),
            event_id: "55".into(),
            account_id: "1234".into(),
            attendee_id: "7001".into(),
            status: "REFUNDED",
        })
        .await
        .unwrap();
    let bodies = recorded.bodies.lock().unwrap();
    assert_eq!(
        bodies[0].1["tickets"][0]["attendees"][0]["registrationStatus"],
        "REFUNDED"
    );
}
