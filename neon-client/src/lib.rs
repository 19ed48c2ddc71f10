//! Neon Client - HTTP client for the Neon CRM v2 API
//!
//! Typed wrappers for the account, event, registration and order calls the
//! add-on makes, plus the multi-call registration flows built on them.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod registration;
pub mod search;
pub mod types;

pub use api::{AttendeeStatusUpdate, NeonApi, NeonConnector};
pub use config::{NeonConfig, NeonCredentials};
pub use error::{NeonError, NeonResult};
pub use http::{NeonClient, NeonHttpConnector};
pub use registration::Termination;
pub use search::EventQuery;
pub use types::{
    AccountSummary, EventDetail, EventRegistration, EventSummary, OrderSummary, Registrant,
    UpcomingRegistration,
};
