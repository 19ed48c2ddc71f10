//! The Neon operations the add-on needs
//!
//! [`NeonApi`] is one HTTP call per method. Multi-call flows (registrant
//! counts, upcoming classes, cancel and refund) are free functions in
//! [`crate::registration`] written against the trait so they can be tested
//! with an in-memory fake.

use crate::config::NeonCredentials;
use crate::error::NeonResult;
use crate::search::EventQuery;
use crate::types::{
    AccountSummary, EventDetail, EventRegistration, EventSummary, OrderSummary, Registrant,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;

#[async_trait]
pub trait NeonApi: Send + Sync {
    /// `POST /accounts/search` with an exact email match
    async fn search_accounts_by_email(&self, email: &str) -> NeonResult<Vec<AccountSummary>>;

    /// `POST /events/search`
    async fn search_events(&self, query: &EventQuery) -> NeonResult<Vec<EventSummary>>;

    /// `GET /events/{id}/eventRegistrations`
    async fn event_registrations(&self, event_id: &str) -> NeonResult<Vec<EventRegistration>>;

    /// `GET /events/{id}`
    async fn get_event(&self, event_id: &str) -> NeonResult<EventDetail>;

    /// `POST /eventRegistrations` at zero price
    async fn register_for_event(
        &self,
        registrant: &Registrant,
        event_id: &str,
        now: NaiveDateTime,
    ) -> NeonResult<()>;

    /// `GET /accounts/{id}/eventRegistrations`, newest first, optionally
    /// narrowed to one event
    async fn account_registrations(
        &self,
        account_id: &str,
        event_id: Option<&str>,
    ) -> NeonResult<Vec<EventRegistration>>;

    /// `PATCH /eventRegistrations/{id}` setting one attendee's status
    async fn update_attendee_status(&self, update: &AttendeeStatusUpdate) -> NeonResult<()>;

    /// `POST /orders/search` by shopping cart id
    async fn search_orders_by_cart_id(&self, cart_id: &str) -> NeonResult<Vec<OrderSummary>>;
}

/// Status change for one attendee of a registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeStatusUpdate {
    pub registration_id: String,
    pub event_id: String,
    pub account_id: String,
    pub attendee_id: String,
    pub status: &'static str,
}

/// Builds a [`NeonApi`] bound to one caller's credentials
pub trait NeonConnector: Send + Sync {
    fn connect(&self, credentials: NeonCredentials) -> Arc<dyn NeonApi>;
}
