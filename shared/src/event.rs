//! Add-on event payload
//!
//! The host posts the same envelope to every endpoint. Fields the add-on does
//! not read are ignored; fields it does read are typed so malformed payloads
//! are rejected by the JSON extractor before any handler runs.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonEvent {
    #[serde(default)]
    pub common_event_object: CommonEventObject,
    #[serde(default)]
    pub authorization_event_object: AuthorizationEventObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmail: Option<GmailEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonEventObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<TimeZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
    #[serde(default)]
    pub form_inputs: HashMap<String, FormInput>,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeZone {
    pub id: String,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_inputs: Option<StringInputs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_input: Option<DateInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringInputs {
    #[serde(default)]
    pub value: Vec<String>,
}

/// Date picker value: UTC midnight of the picked calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateInput {
    #[serde(deserialize_with = "millis_from_string_or_number")]
    pub ms_since_epoch: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationEventObject {
    #[serde(
        rename = "userOAuthToken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_oauth_token: Option<String>,
    #[serde(rename = "systemIdToken", default, skip_serializing_if = "Option::is_none")]
    pub system_id_token: Option<String>,
    #[serde(rename = "userIdToken", default, skip_serializing_if = "Option::is_none")]
    pub user_id_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub to_recipients: Vec<String>,
    #[serde(default)]
    pub cc_recipients: Vec<String>,
    #[serde(default)]
    pub bcc_recipients: Vec<String>,
}

impl AddonEvent {
    /// First non-blank value of a text input
    pub fn string_input(&self, name: &str) -> Option<&str> {
        self.common_event_object
            .form_inputs
            .get(name)?
            .string_inputs
            .as_ref()?
            .value
            .iter()
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Milliseconds since epoch of a date picker input
    pub fn date_input(&self, name: &str) -> Option<i64> {
        self.common_event_object
            .form_inputs
            .get(name)?
            .date_input
            .map(|d| d.ms_since_epoch)
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.common_event_object
            .parameters
            .get(key)
            .map(String::as_str)
    }

    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.common_event_object.parameters
    }

    pub fn system_id_token(&self) -> Option<&str> {
        self.authorization_event_object.system_id_token.as_deref()
    }

    pub fn user_id_token(&self) -> Option<&str> {
        self.authorization_event_object.user_id_token.as_deref()
    }

    pub fn user_oauth_token(&self) -> Option<&str> {
        self.authorization_event_object.user_oauth_token.as_deref()
    }

    /// True when the add-on was opened from a draft rather than a message
    pub fn is_compose(&self) -> bool {
        match &self.gmail {
            Some(gmail) => gmail.message_id.is_none(),
            None => false,
        }
    }
}

fn millis_from_string_or_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Millis {
        Number(i64),
        Text(String),
    }

    match Millis::deserialize(deserializer)? {
        Millis::Number(n) => Ok(n),
        Millis::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
