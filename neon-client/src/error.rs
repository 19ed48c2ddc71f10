//! Neon client error types

use thiserror::Error;

/// Neon client error type
#[derive(Debug, Error)]
pub enum NeonError {
    /// Transport failure, including timeouts
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Neon answered with a non-2xx status
    #[error("Neon returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NeonError {
    /// Upstream status code, when Neon returned one
    pub fn status(&self) -> Option<u16> {
        match self {
            NeonError::Status { status, .. } => Some(*status),
            NeonError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for Neon operations
pub type NeonResult<T> = Result<T, NeonError>;
