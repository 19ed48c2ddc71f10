//! Identity checks on inbound callbacks
//!
//! The host attaches two Google ID tokens to every callback:
//! - `systemIdToken`: proves the request came from the add-on's service account
//! - `userIdToken`: identifies the Gmail user who clicked
//!
//! Both checks fail closed. A bad token is a denied result, never an error
//! the caller can observe.

pub mod google;

pub use google::{GOOGLE_JWKS_URL, GoogleClaims, GoogleTokenVerifier, TokenSettings};

use async_trait::async_trait;

/// The Gmail user behind a callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// Stable `sub` claim
    pub user_id: String,
    /// Given name, or the local part of the email when the token has none
    pub display_name: String,
    pub email: Option<String>,
}

impl UserIdentity {
    /// Build from verified claims; `None` when no display name can be derived
    pub fn from_claims(claims: &GoogleClaims) -> Option<Self> {
        let given_name = claims
            .given_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let local_part = claims
            .email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .map(str::trim)
            .filter(|part| !part.is_empty());

        let display_name = given_name.or(local_part)?.to_string();
        if claims.sub.trim().is_empty() {
            return None;
        }
        Some(Self {
            user_id: claims.sub.clone(),
            display_name,
            email: claims.email.clone(),
        })
    }
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// True only when the system token is signed by Google for our audience
    /// and names the trusted service account
    async fn verify_caller(&self, token: &str) -> bool;

    /// Verified identity of the user token, `None` on any failure
    async fn identify_user(&self, token: &str) -> Option<UserIdentity>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(given_name: Option<&str>, email: Option<&str>) -> GoogleClaims {
        GoogleClaims {
            sub: "1098".into(),
            email: email.map(Into::into),
            email_verified: Some(true),
            given_name: given_name.map(Into::into),
        }
    }

    #[test]
    fn test_identity_prefers_given_name() {
        let identity =
            UserIdentity::from_claims(&claims(Some("Grace"), Some("ghopper@asmbly.org"))).unwrap();
        assert_eq!(identity.display_name, "Grace");
        assert_eq!(identity.user_id, "1098");
    }

    #[test]
    fn test_identity_falls_back_to_email_local_part() {
        let identity =
            UserIdentity::from_claims(&claims(Some("  "), Some("ghopper@asmbly.org"))).unwrap();
        assert_eq!(identity.display_name, "ghopper");
    }

    #[test]
    fn test_identity_without_any_name_is_rejected() {
        assert!(UserIdentity::from_claims(&claims(None, None)).is_none());
    }
}
