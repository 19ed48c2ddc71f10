//! Card builders
//!
//! Pure functions from domain results to card trees. Handlers choose the
//! navigation; builders only describe what is on the card. Buttons that post
//! back carry absolute URLs built from the public base URL.

pub mod access;
pub mod classes;
pub mod gift;
pub mod home;
pub mod registrations;
pub mod settings;

use shared::card::CallbackAction;

/// Form input names shared by cards and handlers
pub mod field {
    pub const CLASS_NAME: &str = "className";
    pub const CLASS_START_DATE: &str = "classStartDate";
    pub const CLASS_END_DATE: &str = "classEndDate";
    pub const CHECK_LIST: &str = "checkList";
    pub const GIFT_CERT_NUMBER: &str = "giftCertNumber";
    pub const NEON_API_KEY: &str = "N_APIkey";
    pub const OPENPATH_USER: &str = "O_APIuser";
    pub const OPENPATH_KEY: &str = "O_APIkey";
    /// Parameter naming the card `/popToCard` returns to
    pub const CARD: &str = "card";
}

/// Card names used with `popToCard`
pub mod name {
    pub const HOME: &str = "home";
    pub const CLASS_HOME: &str = "classHome";
    pub const CLASS_LIST: &str = "classList";
    pub const REGISTRATION_LIST: &str = "registrationList";
}

/// Absolute callback URLs for button actions
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn action(&self, path: &str) -> CallbackAction {
        CallbackAction::new(self.url(path))
    }
}
