//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Credential store errors
/// - 3xxx: Account errors
/// - 4xxx: Class registration errors
/// - 5xxx: Access control errors
/// - 6xxx: Mail and gift certificate errors
///
/// Codes outside these ranges fall back to General.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Credential store errors (2xxx)
    Credential,
    /// Account errors (3xxx)
    Account,
    /// Class registration errors (4xxx)
    Registration,
    /// Access control errors (5xxx)
    AccessControl,
    /// Mail errors (6xxx)
    Mail,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            1000..2000 => Self::Auth,
            2000..3000 => Self::Credential,
            3000..4000 => Self::Account,
            4000..5000 => Self::Registration,
            5000..6000 => Self::AccessControl,
            6000..7000 => Self::Mail,
            _ => Self::General,
        }
    }
}

impl ErrorCode {
    /// Get the category this error code belongs to
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
