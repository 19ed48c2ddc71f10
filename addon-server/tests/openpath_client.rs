//! OpenPathClient against an in-process stub of the OpenPath API

use addon_server::openpath::{
    AccessControl, AccessMember, OpenPathClient, OpenPathCredentials, OpenPathError,
};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Stub {
    /// Existing users by email
    users: Arc<Mutex<HashMap<String, u64>>>,
    created: Arc<Mutex<Vec<Value>>>,
    groups: Arc<Mutex<Vec<(String, Value)>>>,
    auth: Arc<Mutex<Vec<String>>>,
    reject_groups: bool,
}

impl Stub {
    fn record_auth(&self, headers: &HeaderMap) {
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.auth.lock().unwrap().push(value);
    }
}

async fn list_users(
    State(stub): State<Stub>,
    Path(org): Path<String>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    assert_eq!(org, "77");
    stub.record_auth(&headers);
    let q = query.get("q").cloned().unwrap_or_default();
    let data: Vec<Value> = stub
        .users
        .lock()
        .unwrap()
        .iter()
        .filter(|(email, _)| email.contains(&q))
        .map(|(email, id)| json!({"id": id, "identity": {"email": email}}))
        .collect();
    Json(json!({"data": data}))
}

async fn create_user(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.record_auth(&headers);
    stub.created.lock().unwrap().push(body);
    Json(json!({"data": {"id": 501}}))
}

async fn set_groups(
    State(stub): State<Stub>,
    Path((_org, user_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    stub.record_auth(&headers);
    if stub.reject_groups {
        return StatusCode::FORBIDDEN;
    }
    stub.groups.lock().unwrap().push((user_id, body));
    StatusCode::NO_CONTENT
}

async fn start(stub: Stub) -> OpenPathClient {
    let app = Router::new()
        .route("/orgs/{org}/users", get(list_users).post(create_user))
        .route("/orgs/{org}/users/{user_id}/groupIds", put(set_groups))
        .with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    OpenPathClient::new(reqwest::Client::new(), format!("http://{addr}/"), "77", "12")
}

fn member() -> AccessMember {
    AccessMember {
        account_id: "1234".into(),
        email: "ada@example.org".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
    }
}

fn credentials() -> OpenPathCredentials {
    OpenPathCredentials {
        user: "op-user".into(),
        key: "op-key".into(),
    }
}

#[tokio::test]
async fn test_existing_user_gets_member_group() {
    let stub = Stub::default();
    stub.users
        .lock()
        .unwrap()
        .insert("ada@example.org".into(), 42);
    let client = start(stub.clone()).await;

    client.update_access(&member(), &credentials()).await.unwrap();

    assert!(stub.created.lock().unwrap().is_empty());
    let groups = stub.groups.lock().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].0, "42");
    assert_eq!(groups[0].1, json!({"groupIds": [12]}));
    // base64("op-user:op-key")
    assert!(
        stub.auth
            .lock()
            .unwrap()
            .iter()
            .all(|a| a == "Basic b3AtdXNlcjpvcC1rZXk=")
    );
}

#[tokio::test]
async fn test_missing_user_is_created_first() {
    let stub = Stub::default();
    let client = start(stub.clone()).await;

    client.update_access(&member(), &credentials()).await.unwrap();

    let created = stub.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["identity"]["email"], "ada@example.org");
    assert_eq!(created[0]["identity"]["firstName"], "Ada");
    assert_eq!(created[0]["externalId"], "1234");
    assert_eq!(stub.groups.lock().unwrap()[0].0, "501");
}

#[tokio::test]
async fn test_group_rejection_surfaces_status() {
    let stub = Stub {
        reject_groups: true,
        ..Stub::default()
    };
    stub.users
        .lock()
        .unwrap()
        .insert("ada@example.org".into(), 42);
    let client = start(stub).await;

    let err = client
        .update_access(&member(), &credentials())
        .await
        .unwrap_err();
    assert!(matches!(err, OpenPathError::Status { status: 403, .. }));
    assert_eq!(err.status(), Some(403));
}
