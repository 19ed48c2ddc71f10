//! GmailClient against an in-process stub of the Gmail API

use addon_server::gmail::{GmailClient, MailContext, member_email};
use axum::extract::{Path, RawQuery};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use shared::event::AddonEvent;

async fn message(
    Path(id): Path<String>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let access = headers
        .get("x-goog-gmail-access-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if bearer != "Bearer oauth" || access != "gmail-access" {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    assert!(query.unwrap_or_default().contains("format=metadata"));

    let (from, to) = match id.as_str() {
        "inbound" => (
            "\"Ada Lovelace\" <Ada@Example.org>",
            "Classes <classes@asmbly.org>",
        ),
        "outbound" => (
            "Front Desk <desk@asmbly.org>",
            "ada@example.org, other@example.org",
        ),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    Json(json!({
        "id": id,
        "payload": {"headers": [
            {"name": "From", "value": from},
            {"name": "To", "value": to}
        ]}
    }))
    .into_response()
}

async fn start() -> GmailClient {
    let app = Router::new().route("/gmail/v1/users/me/messages/{id}", get(message));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    GmailClient::new(reqwest::Client::new(), format!("http://{addr}/gmail/v1"))
}

fn event(message_id: &str) -> AddonEvent {
    serde_json::from_value(json!({
        "authorizationEventObject": {"userOAuthToken": "oauth"},
        "gmail": {"messageId": message_id, "accessToken": "gmail-access"}
    }))
    .unwrap()
}

#[tokio::test]
async fn test_headers_are_parsed() {
    let client = start().await;
    let addresses = client
        .message_addresses("inbound", "gmail-access", "oauth")
        .await
        .unwrap();
    assert_eq!(addresses.from.as_deref(), Some("ada@example.org"));
    assert_eq!(addresses.to, vec!["classes@asmbly.org".to_string()]);
}

#[tokio::test]
async fn test_inbound_message_uses_sender() {
    let client = start().await;
    let email = member_email(&client, &event("inbound"), "asmbly.org")
        .await
        .unwrap();
    assert_eq!(email, "ada@example.org");
}

#[tokio::test]
async fn test_staff_message_uses_recipient() {
    let client = start().await;
    let email = member_email(&client, &event("outbound"), "asmbly.org")
        .await
        .unwrap();
    assert_eq!(email, "ada@example.org");
}

#[tokio::test]
async fn test_missing_message_is_a_lookup_failure() {
    let client = start().await;
    let err = client
        .message_addresses("deleted", "gmail-access", "oauth")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));

    let err = member_email(&client, &event("deleted"), "asmbly.org")
        .await
        .unwrap_err();
    assert!(err.message.starts_with("<b>Error:</b>"));
}
