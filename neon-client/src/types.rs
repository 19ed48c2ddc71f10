//! Neon records as the add-on uses them

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Attendee status values used by the add-on
pub mod status {
    pub const SUCCEEDED: &str = "SUCCEEDED";
    pub const CANCELED: &str = "CANCELED";
    pub const REFUNDED: &str = "REFUNDED";
}

/// A row from `/accounts/search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub account_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub membership_start_date: Option<String>,
    pub waiver_date: Option<String>,
    pub facility_tour_date: Option<String>,
}

impl AccountSummary {
    pub fn from_row(row: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            account_id: cell(row, "Account ID")?,
            first_name: cell(row, "First Name").unwrap_or_default(),
            last_name: cell(row, "Last Name").unwrap_or_default(),
            email: cell(row, "Email 1"),
            membership_start_date: cell(row, "Membership Start Date"),
            waiver_date: cell(row, "WaiverDate"),
            facility_tour_date: cell(row, "FacilityTourDate"),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn has_waiver(&self) -> bool {
        self.waiver_date.is_some()
    }

    pub fn has_facility_tour(&self) -> bool {
        self.facility_tour_date.is_some()
    }

    pub fn has_active_membership(&self) -> bool {
        self.membership_start_date.is_some()
    }

    /// Waiver, facility tour and membership start are all recorded
    pub fn meets_access_requirements(&self) -> bool {
        self.has_waiver() && self.has_facility_tour() && self.has_active_membership()
    }
}

/// A row from `/events/search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    pub event_id: String,
    pub name: String,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub capacity: Option<u32>,
}

impl EventSummary {
    pub fn from_row(row: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            event_id: cell(row, "Event ID")?,
            name: cell(row, "Event Name").unwrap_or_default(),
            start_date: cell(row, "Event Start Date"),
            start_time: cell(row, "Event Start Time"),
            capacity: cell(row, "Event Capacity").and_then(|c| c.parse().ok()),
        })
    }
}

/// A row from `/orders/search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub account_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub cart_id: Option<String>,
    pub order_date: Option<String>,
}

impl OrderSummary {
    pub fn from_row(row: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            account_id: cell(row, "Account ID")?,
            first_name: cell(row, "First Name").unwrap_or_default(),
            last_name: cell(row, "Last Name").unwrap_or_default(),
            email: cell(row, "Email 1"),
            cart_id: cell(row, "Shopping Cart ID"),
            order_date: cell(row, "Order Date"),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// `GET /events/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub event_dates: EventDates,
    #[serde(default)]
    pub maximum_attendees: Option<u32>,
}

impl EventDetail {
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.event_dates
            .start_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDates {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
}

/// One entry of an `eventRegistrations` listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistration {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub event_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub registrant_account_id: Option<String>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Ticket {
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub attendee_id: Option<String>,
    #[serde(default)]
    pub registration_status: Option<String>,
}

impl EventRegistration {
    fn first_attendee(&self) -> Option<&Attendee> {
        self.tickets.first()?.attendees.first()
    }

    /// Status of the first attendee on the first ticket
    pub fn status(&self) -> Option<&str> {
        self.first_attendee()?.registration_status.as_deref()
    }

    pub fn is_succeeded(&self) -> bool {
        self.status() == Some(status::SUCCEEDED)
    }

    pub fn attendee_id(&self) -> Option<&str> {
        self.first_attendee()?.attendee_id.as_deref()
    }

    /// Attendees on the first ticket
    pub fn attendee_count(&self) -> u32 {
        self.tickets
            .first()
            .map(|t| t.attendees.len() as u32)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegistrationList {
    #[serde(default)]
    pub event_registrations: Option<Vec<EventRegistration>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub search_results: Option<Vec<Map<String, Value>>>,
}

/// Registration on the account whose class has not happened yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingRegistration {
    pub registration_id: String,
    pub event_id: String,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub status: String,
}

/// Account details needed to register someone for a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registrant {
    pub account_id: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&AccountSummary> for Registrant {
    fn from(account: &AccountSummary) -> Self {
        Self {
            account_id: account.account_id.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
        }
    }
}

/// Search result cell as text; blank strings and nulls are absent
fn cell(row: &Map<String, Value>, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    opt_id_string(deserializer)?.ok_or_else(|| serde::de::Error::custom("missing id"))
}

/// Neon returns some ids as strings and others as integers
fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_account_from_row_blank_is_absent() {
        let account = AccountSummary::from_row(&row(json!({
            "Account ID": "1234",
            "First Name": "Ada",
            "Last Name": "Lovelace",
            "Email 1": "ada@example.org",
            "Membership Start Date": "2023-04-01",
            "WaiverDate": "",
            "FacilityTourDate": null
        })))
        .unwrap();

        assert_eq!(account.account_id, "1234");
        assert_eq!(account.full_name(), "Ada Lovelace");
        assert!(account.has_active_membership());
        assert!(!account.has_waiver());
        assert!(!account.has_facility_tour());
        assert!(!account.meets_access_requirements());
    }

    #[test]
    fn test_account_requires_id() {
        assert!(AccountSummary::from_row(&row(json!({"First Name": "Ada"}))).is_none());
    }

    #[test]
    fn test_event_capacity_parses_numbers_and_text() {
        let event = EventSummary::from_row(&row(json!({
            "Event ID": 55,
            "Event Name": "Laser Cutter Basics",
            "Event Start Date": "2024-01-12",
            "Event Capacity": "10"
        })))
        .unwrap();
        assert_eq!(event.event_id, "55");
        assert_eq!(event.capacity, Some(10));
    }

    #[test]
    fn test_registration_accessors() {
        let reg: EventRegistration = serde_json::from_value(json!({
            "id": "901",
            "eventId": 55,
            "tickets": [{"attendees": [
                {"attendeeId": 7001, "registrationStatus": "SUCCEEDED"},
                {"attendeeId": 7002, "registrationStatus": "SUCCEEDED"}
            ]}]
        }))
        .unwrap();
        assert_eq!(reg.event_id.as_deref(), Some("55"));
        assert_eq!(reg.attendee_id(), Some("7001"));
        assert!(reg.is_succeeded());
        assert_eq!(reg.attendee_count(), 2);
    }

    #[test]
    fn test_registration_without_tickets() {
        let reg: EventRegistration = serde_json::from_value(json!({"id": 3})).unwrap();
        assert_eq!(reg.status(), None);
        assert_eq!(reg.attendee_count(), 0);
        assert!(!reg.is_succeeded());
    }

    #[test]
    fn test_event_detail_start_date() {
        let event: EventDetail = serde_json::from_value(json!({
            "id": "55",
            "name": "Laser Cutter Basics",
            "eventDates": {"startDate": "2024-01-12", "startTime": "18:00"},
            "maximumAttendees": 10
        }))
        .unwrap();
        assert_eq!(event.start_date(), NaiveDate::from_ymd_opt(2024, 1, 12));
        assert_eq!(event.maximum_attendees, Some(10));
    }
}
