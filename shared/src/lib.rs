//! Shared types for the Asmbly Workspace add-on
//!
//! Card schema, add-on event payload, button correlation parameters and the
//! error type every endpoint renders through.

pub mod action;
pub mod card;
pub mod error;
pub mod event;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use card::RenderActions;
pub use error::{AppError, AppResult, ErrorCode};
pub use event::AddonEvent;
