//! Unified error codes for the Asmbly add-on
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Credential store errors
//! - 3xxx: Account errors
//! - 4xxx: Class registration errors
//! - 5xxx: Access control errors
//! - 6xxx: Mail and gift certificate errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes are serialized as u16 values so they can be logged and compared
/// without depending on the Rust variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// Caller token missing or rejected
    NotAuthenticated = 1001,
    /// User token missing or rejected
    TokenInvalid = 1004,

    // ==================== 2xxx: Credentials ====================
    /// No stored credential bundle for this user
    SecretNotFound = 2001,
    /// Stored payload does not match its checksum
    ChecksumFailed = 2002,
    /// Secrets backend could not be reached
    CredentialStoreFailed = 2003,
    /// Writing a new credential bundle failed
    SettingsSaveFailed = 2004,

    // ==================== 3xxx: Account ====================
    /// No CRM account matches the email
    AccountNotFound = 3001,
    /// More than one CRM account matches the email
    MultipleAccounts = 3002,
    /// Gating dates are not all present
    AccessRequirementsIncomplete = 3003,
    /// Account search failed upstream
    AccountLookupFailed = 3004,

    // ==================== 4xxx: Classes ====================
    /// Class name was not entered
    ClassNameRequired = 4001,
    /// Event search failed upstream
    ClassSearchFailed = 4002,
    /// Event search returned nothing
    NoClassesFound = 4003,
    /// Registration call failed
    RegistrationFailed = 4004,
    /// Account has no upcoming registrations
    NoUpcomingClasses = 4005,
    /// Registration listing failed upstream
    RegistrationListFailed = 4006,
    /// Cancellation call failed
    CancellationFailed = 4007,
    /// Refund call failed
    RefundFailed = 4008,
    /// Registration is no longer active
    RegistrationAlreadyCanceled = 4009,
    /// Registration id not present on the account
    RegistrationNotFound = 4010,
    /// Date picker value is outside the calendar range
    DateInvalid = 4011,

    // ==================== 5xxx: Access control ====================
    /// Access-control update failed
    AccessUpdateFailed = 5001,

    // ==================== 6xxx: Mail ====================
    /// No open message or draft to read an address from
    MailContextUnavailable = 6001,
    /// Reading the open message failed
    MailLookupFailed = 6002,
    /// Gift certificate number is not numeric
    InvalidGiftCertificate = 6101,
    /// No order carries the certificate number
    GiftCertificateNotFound = 6102,
    /// Order search failed upstream
    GiftCertificateLookupFailed = 6103,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default message rendered on the error card for this code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "<b>Error:</b> Validation failed.",
            ErrorCode::InvalidRequest => "<b>Error:</b> Invalid request.",
            ErrorCode::RequiredField => "<b>Error:</b> A required field is missing.",

            // Auth
            ErrorCode::NotAuthenticated => "<b>Error:</b> Unauthorized.",
            ErrorCode::TokenInvalid => "<b>Error:</b> Unable to identify the current user.",

            // Credentials
            ErrorCode::SecretNotFound => {
                "<b>Error:</b> Secret not found. Open Settings and save your API keys."
            }
            ErrorCode::ChecksumFailed => {
                "<b>Error:</b> Checksum failed. Open Settings and save your API keys again."
            }
            ErrorCode::CredentialStoreFailed => {
                "<b>Error:</b> Unable to load your API keys. Open Settings and save them again."
            }
            ErrorCode::SettingsSaveFailed => "<b>Error:</b> Unable to save settings.",

            // Account
            ErrorCode::AccountNotFound => "<b>Error:</b> No Neon accounts found.",
            ErrorCode::MultipleAccounts => {
                "<b>Error:</b> Multiple Neon accounts found. Go to <a href=\"https://app.neonsso.com/login\">Neon</a> to merge duplicate accounts."
            }
            ErrorCode::AccessRequirementsIncomplete => {
                "Account has not completed all access requirements. Use the Check Access button to find out what's missing."
            }
            ErrorCode::AccountLookupFailed => {
                "<b>Error:</b> Unable to look up the Neon account. Check your authentication or use the Neon website."
            }

            // Classes
            ErrorCode::ClassNameRequired => "<b>Error:</b> Event name is required.",
            ErrorCode::ClassSearchFailed => {
                "<b>Error:</b> Unable to find classes. Check your authentication or use the Neon website."
            }
            ErrorCode::NoClassesFound => {
                "No classes found. Check your spelling or try a different date."
            }
            ErrorCode::RegistrationFailed => {
                "<b>Error:</b> Registration failed. Use Neon to register individual."
            }
            ErrorCode::NoUpcomingClasses => "No upcoming classes found.",
            ErrorCode::RegistrationListFailed => {
                "<b>Error:</b> Unable to find classes. Account may not have registered for any classes. Alternatively, check your authentication or use the Neon website."
            }
            ErrorCode::CancellationFailed => {
                "<b>Error:</b> Cancelation failed. Check your authentication or use the Neon website."
            }
            ErrorCode::RefundFailed => {
                "<b>Error:</b> Refund failed. Check your authentication or use the Neon website."
            }
            ErrorCode::RegistrationAlreadyCanceled => {
                "<b>Error:</b> Registration is already canceled."
            }
            ErrorCode::RegistrationNotFound => {
                "<b>Error:</b> Registration not found on this account."
            }
            ErrorCode::DateInvalid => "<b>Error:</b> Invalid date. Pick the date again.",

            // Access control
            ErrorCode::AccessUpdateFailed => {
                "<b>Error:</b> Openpath update failed. Check your authentication or use the Openpath website."
            }

            // Mail
            ErrorCode::MailContextUnavailable => {
                "<b>Error:</b> Open an email or draft to use this action."
            }
            ErrorCode::MailLookupFailed => "<b>Error:</b> Unable to read the open email.",
            ErrorCode::InvalidGiftCertificate => {
                "<b>Error:</b> Gift certificate number must be numeric."
            }
            ErrorCode::GiftCertificateNotFound => "<b>Error:</b> No gift certificate found.",
            ErrorCode::GiftCertificateLookupFailed => {
                "<b>Error:</b> Unable to look up gift certificate. Check your authentication or use the Neon website."
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Credentials
            2001 => Ok(ErrorCode::SecretNotFound),
            2002 => Ok(ErrorCode::ChecksumFailed),
            2003 => Ok(ErrorCode::CredentialStoreFailed),
            2004 => Ok(ErrorCode::SettingsSaveFailed),

            // Account
            3001 => Ok(ErrorCode::AccountNotFound),
            3002 => Ok(ErrorCode::MultipleAccounts),
            3003 => Ok(ErrorCode::AccessRequirementsIncomplete),
            3004 => Ok(ErrorCode::AccountLookupFailed),

            // Classes
            4001 => Ok(ErrorCode::ClassNameRequired),
            4002 => Ok(ErrorCode::ClassSearchFailed),
            4003 => Ok(ErrorCode::NoClassesFound),
            4004 => Ok(ErrorCode::RegistrationFailed),
            4005 => Ok(ErrorCode::NoUpcomingClasses),
            4006 => Ok(ErrorCode::RegistrationListFailed),
            4007 => Ok(ErrorCode::CancellationFailed),
            4008 => Ok(ErrorCode::RefundFailed),
            4009 => Ok(ErrorCode::RegistrationAlreadyCanceled),
            4010 => Ok(ErrorCode::RegistrationNotFound),
            4011 => Ok(ErrorCode::DateInvalid),

            // Access control
            5001 => Ok(ErrorCode::AccessUpdateFailed),

            // Mail
            6001 => Ok(ErrorCode::MailContextUnavailable),
            6002 => Ok(ErrorCode::MailLookupFailed),
            6101 => Ok(ErrorCode::InvalidGiftCertificate),
            6102 => Ok(ErrorCode::GiftCertificateNotFound),
            6103 => Ok(ErrorCode::GiftCertificateLookupFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
