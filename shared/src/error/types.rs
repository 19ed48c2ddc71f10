//! Error type and its card rendering

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use crate::card::{Link, RenderActions, error_card};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Where users merge duplicate CRM accounts
pub const NEON_MERGE_URL: &str = "https://app.neonsso.com/login";

/// Application error with structured error code and details
///
/// Every failure path of every endpoint ends in one of these. The add-on
/// host only renders cards, so the HTTP response is always `200 OK` with an
/// error card built by [`error_card`].
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// User-facing message (may contain the host's limited HTML)
    pub message: String,
    /// Optional additional details for logs
    pub details: Option<HashMap<String, Value>>,
    /// Optional remediation link rendered as a button under the message
    pub link: Option<Link>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
            link: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            link: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach a remediation link
    pub fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    /// Render this error as the response document the host expects
    pub fn to_render_actions(&self) -> RenderActions {
        RenderActions::push(error_card(&self.message, self.link.as_ref()))
    }

    // ==================== Convenience constructors ====================

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Caller token check failed
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// No CRM account matches the email
    pub fn account_not_found() -> Self {
        Self::new(ErrorCode::AccountNotFound)
    }

    /// Several CRM accounts match the email
    pub fn multiple_accounts(count: usize) -> Self {
        Self::new(ErrorCode::MultipleAccounts)
            .with_detail("count", count)
            .with_link(Link::new("Merge accounts in Neon", NEON_MERGE_URL))
    }

    /// Upstream failure rendered as "<action> failed", with the status when
    /// the upstream returned one
    pub fn upstream_failed(code: ErrorCode, action: &str, status: Option<u16>) -> Self {
        let message = match status {
            Some(status) => format!(
                "<b>Error:</b> {action} failed with status code {status}. Use the Neon website to finish this."
            ),
            None => code.message().to_string(),
        };
        let err = Self::with_message(code, message);
        match status {
            Some(status) => err.with_detail("status", status),
            None => err,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        if matches!(self.code.category(), ErrorCategory::Credential) {
            tracing::warn!(
                code = %self.code,
                message = %self.message,
                "Credential store error"
            );
        } else {
            tracing::debug!(code = %self.code, "Rendering error card");
        }

        (http::StatusCode::OK, Json(self.to_render_actions())).into_response()
    }
}
