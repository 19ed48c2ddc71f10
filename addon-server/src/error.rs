//! Bridge from upstream client errors to `AppError`
//!
//! Client crates return their own `thiserror` enums. Handlers turn them into
//! the "<action> failed" card with `.or_failed(code, action)` instead of
//! repeating `.map_err(|e| { tracing::warn!(...); AppError::... })`.

use crate::openpath::OpenPathError;
use neon_client::NeonError;
use shared::error::{AppError, AppResult, ErrorCode};

/// Upstream failure that may carry an HTTP status
pub trait UpstreamFailure: std::fmt::Display {
    fn upstream_status(&self) -> Option<u16>;
}

impl UpstreamFailure for NeonError {
    fn upstream_status(&self) -> Option<u16> {
        self.status()
    }
}

impl UpstreamFailure for OpenPathError {
    fn upstream_status(&self) -> Option<u16> {
        self.status()
    }
}

pub trait UpstreamResultExt<T> {
    /// Map a failure to the "<action> failed" card for `code`
    fn or_failed(self, code: ErrorCode, action: &str) -> AppResult<T>;
}

impl<T, E: UpstreamFailure> UpstreamResultExt<T> for Result<T, E> {
    fn or_failed(self, code: ErrorCode, action: &str) -> AppResult<T> {
        self.map_err(|e| {
            let status = e.upstream_status();
            tracing::warn!(error = %e, action, status, "Upstream call failed");
            AppError::upstream_failed(code, action, status)
        })
    }
}
