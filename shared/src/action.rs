//! Correlation data carried through button parameters
//!
//! The host keeps no server session. Anything a later callback needs is
//! written into the clicked button's `parameters` and read back from
//! `commonEventObject.parameters`.

use crate::card::ActionParameter;
use crate::error::{AppError, AppResult};
use std::collections::HashMap;

pub const KIND: &str = "kind";
pub const REGISTRATION_ID: &str = "registrationId";
pub const EVENT_ID: &str = "eventId";
pub const ACCOUNT_ID: &str = "accountId";
pub const EVENT_NAME: &str = "eventName";
pub const EVENT_DATE: &str = "eventDate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    Cancel,
    Refund,
}

impl PendingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingKind::Cancel => "cancel",
            PendingKind::Refund => "refund",
        }
    }

    /// Verb shown on buttons and headings
    pub fn label(&self) -> &'static str {
        match self {
            PendingKind::Cancel => "Cancel",
            PendingKind::Refund => "Refund",
        }
    }
}

impl std::str::FromStr for PendingKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cancel" => Ok(PendingKind::Cancel),
            "refund" => Ok(PendingKind::Refund),
            other => Err(AppError::invalid_request(format!(
                "<b>Error:</b> Unknown registration action '{other}'."
            ))),
        }
    }
}

/// A cancel or refund waiting for the user's confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRegistrationAction {
    pub kind: PendingKind,
    pub registration_id: String,
    pub event_id: String,
    pub account_id: String,
    pub event_name: String,
    pub event_date: String,
}

impl PendingRegistrationAction {
    pub fn to_parameters(&self) -> Vec<ActionParameter> {
        [
            (KIND, self.kind.as_str()),
            (REGISTRATION_ID, self.registration_id.as_str()),
            (EVENT_ID, self.event_id.as_str()),
            (ACCOUNT_ID, self.account_id.as_str()),
            (EVENT_NAME, self.event_name.as_str()),
            (EVENT_DATE, self.event_date.as_str()),
        ]
        .into_iter()
        .map(|(key, value)| ActionParameter {
            key: key.to_string(),
            value: value.to_string(),
        })
        .collect()
    }

    /// Rebuild from callback parameters. Identifiers are required; the
    /// display fields fall back to empty strings.
    pub fn from_parameters(parameters: &HashMap<String, String>) -> AppResult<Self> {
        let kind = required(parameters, KIND)?.parse()?;
        Ok(Self {
            kind,
            registration_id: required(parameters, REGISTRATION_ID)?,
            event_id: required(parameters, EVENT_ID)?,
            account_id: required(parameters, ACCOUNT_ID)?,
            event_name: parameters.get(EVENT_NAME).cloned().unwrap_or_default(),
            event_date: parameters.get(EVENT_DATE).cloned().unwrap_or_default(),
        })
    }
}

/// Event picked from the search results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterTarget {
    pub event_id: String,
    pub event_name: String,
}

impl RegisterTarget {
    pub fn to_parameters(&self) -> Vec<ActionParameter> {
        vec![
            ActionParameter {
                key: EVENT_ID.to_string(),
                value: self.event_id.clone(),
            },
            ActionParameter {
                key: EVENT_NAME.to_string(),
                value: self.event_name.clone(),
            },
        ]
    }

    pub fn from_parameters(parameters: &HashMap<String, String>) -> AppResult<Self> {
        Ok(Self {
            event_id: required(parameters, EVENT_ID)?,
            event_name: parameters.get(EVENT_NAME).cloned().unwrap_or_default(),
        })
    }
}

fn required(parameters: &HashMap<String, String>, key: &str) -> AppResult<String> {
    match parameters.get(key).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(AppError::invalid_request(format!(
            "<b>Error:</b> Missing '{key}'. Start again from the class list."
        ))
        .with_detail("parameter", key)),
    }
}
