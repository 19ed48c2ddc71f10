//! API routes for the add-on server
//!
//! Every add-on callback is a `POST` of the event envelope and answers with a
//! render-actions document. Failures are rendered as error cards with
//! `200 OK`, so the host always has something to show.

pub mod access;
pub mod classes;
pub mod gift;
pub mod health;
pub mod home;
pub mod navigation;
pub mod pipeline;
pub mod registrations;
pub mod settings;

use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use http::{HeaderName, HeaderValue, StatusCode};
use std::time::Duration;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Callback paths, also used to build button actions
pub mod path {
    pub const HOME: &str = "/home";
    pub const CONTEXTUAL_HOME: &str = "/contextualHome";
    pub const GET_NEON_ID: &str = "/getNeonId";
    pub const CLASS_HOME_PAGE: &str = "/classHomePage";
    pub const SEARCH_CLASSES: &str = "/searchClasses";
    pub const CLASS_REG: &str = "/classReg";
    pub const LIST_CANCELABLE: &str = "/getAcctRegClassCancel";
    pub const CLASS_CANCEL: &str = "/classCancel";
    pub const CLASS_CANCEL_CONFIRM: &str = "/classCancelConfirm";
    pub const LIST_REFUNDABLE: &str = "/getAcctRegClassRefund";
    pub const CLASS_REFUND: &str = "/classRefund";
    pub const CLASS_REFUND_CONFIRM: &str = "/classRefundConfirm";
    pub const CHECK_ACCESS: &str = "/checkAccess";
    pub const UPDATE_OP: &str = "/updateOP";
    pub const GIFT_CERT_LOOKUP: &str = "/giftCertLookup";
    pub const SETTINGS: &str = "/settings";
    pub const SUBMIT_SETTINGS: &str = "/submitSettings";
    pub const POP: &str = "/pop";
    pub const POP_TO_CARD: &str = "/popToCard";
    pub const POP_TO_ROOT: &str = "/popToRoot";
    pub const HEALTH: &str = "/health";
}

const X_REQUEST_ID: &str = "x-request-id";

/// UUID v4 request ids
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let callbacks = Router::new()
        .route(path::HOME, post(home::home))
        .route(path::CONTEXTUAL_HOME, post(home::contextual_home))
        .route(path::GET_NEON_ID, post(home::get_neon_id))
        .route(path::CLASS_HOME_PAGE, post(classes::class_home_page))
        .route(path::SEARCH_CLASSES, post(classes::search_classes))
        .route(path::CLASS_REG, post(classes::class_reg))
        .route(path::LIST_CANCELABLE, post(registrations::list_cancelable))
        .route(path::CLASS_CANCEL, post(registrations::request_cancel))
        .route(path::CLASS_CANCEL_CONFIRM, post(registrations::confirm_cancel))
        .route(path::LIST_REFUNDABLE, post(registrations::list_refundable))
        .route(path::CLASS_REFUND, post(registrations::request_refund))
        .route(path::CLASS_REFUND_CONFIRM, post(registrations::confirm_refund))
        .route(path::CHECK_ACCESS, post(access::check_access))
        .route(path::UPDATE_OP, post(access::update_access))
        .route(path::GIFT_CERT_LOOKUP, post(gift::gift_cert_lookup))
        .route(path::SETTINGS, post(settings::settings))
        .route(path::SUBMIT_SETTINGS, post(settings::submit_settings))
        .route(path::POP, post(navigation::pop))
        .route(path::POP_TO_CARD, post(navigation::pop_to_card))
        .route(path::POP_TO_ROOT, post(navigation::pop_to_root))
        .layer(DefaultBodyLimit::max(1024 * 1024)); // 1MB

    let request_id = HeaderName::from_static(X_REQUEST_ID);

    Router::new()
        .route(path::HEALTH, get(health::health_check))
        .merge(callbacks)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
}
