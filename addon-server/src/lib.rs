//! addon-server: backend for the Asmbly Gmail add-on
//!
//! Answers add-on card callbacks by:
//! - verifying the host's and the user's Google ID tokens
//! - loading the user's Neon and OpenPath keys from Secret Manager
//! - resolving the member behind the open email in Neon
//! - registering, canceling and refunding classes, and granting door access

pub mod api;
pub mod auth;
pub mod cards;
pub mod config;
pub mod error;
pub mod gmail;
pub mod openpath;
pub mod secrets;
pub mod state;

pub use config::Config;
pub use state::AppState;
