//! Unified error system for the Asmbly add-on
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with code, message, details and an
//!   optional remediation link, rendered as an error card
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Credential store errors
//! - 3xxx: Account errors
//! - 4xxx: Class registration errors
//! - 5xxx: Access control errors
//! - 6xxx: Mail and gift certificate errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::AccountNotFound);
//!
//! // Create an error with custom message
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "Class name is required");
//!
//! // Render the card the host will display
//! let actions = err.to_render_actions();
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, NEON_MERGE_URL};
