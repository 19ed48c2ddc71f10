//! Search request construction
//!
//! Neon's `/search` endpoints take a list of predicates, a list of output
//! columns and a pagination block. Results come back as rows keyed by the
//! output column names.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

/// Neon pages results; everything here fits in one page
pub const PAGE_SIZE: u32 = 200;

/// Custom account field holding the facility tour date
pub const FACILITY_TOUR_FIELD_ID: u32 = 182;
/// Custom account field holding the waiver date
pub const WAIVER_FIELD_ID: u32 = 179;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equal,
    Contain,
    GreaterAndEqual,
    LessAndEqual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchField {
    pub field: String,
    pub operator: Operator,
    pub value: String,
}

impl SearchField {
    pub fn new(field: &str, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value: value.into(),
        }
    }
}

/// Output column, either a standard field name or a custom field id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutputField {
    Name(&'static str),
    Custom(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 0,
            page_size: PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub search_fields: Vec<SearchField>,
    pub output_fields: Vec<OutputField>,
    pub pagination: Pagination,
}

impl SearchRequest {
    pub fn new(search_fields: Vec<SearchField>, output_fields: Vec<OutputField>) -> Self {
        Self {
            search_fields,
            output_fields,
            pagination: Pagination::default(),
        }
    }
}

// ── Accounts ──

pub fn account_search(email: &str) -> SearchRequest {
    SearchRequest::new(
        vec![SearchField::new("Email", Operator::Equal, email)],
        vec![
            OutputField::Name("Account ID"),
            OutputField::Name("First Name"),
            OutputField::Name("Last Name"),
            OutputField::Name("Email 1"),
            OutputField::Name("Membership Start Date"),
            OutputField::Custom(FACILITY_TOUR_FIELD_ID),
            OutputField::Custom(WAIVER_FIELD_ID),
        ],
    )
}

// ── Events ──

/// Class search as entered on the class home card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    /// Substring matched against the event name
    pub name: String,
    /// Earliest start date, inclusive
    pub start: Option<NaiveDate>,
    /// Latest end date, inclusive
    pub end: Option<NaiveDate>,
    /// Organization-local date used when no start date is given
    pub today: NaiveDate,
}

impl EventQuery {
    /// Predicates for this query.
    ///
    /// | start   | end     | predicates                         |
    /// |---------|---------|------------------------------------|
    /// | absent  | absent  | start ≥ today                      |
    /// | present | absent  | start ≥ start                      |
    /// | absent  | present | start ≥ today, end ≤ end           |
    /// | present | present | start ≥ start, end ≤ end           |
    pub fn search_fields(&self) -> Vec<SearchField> {
        let from = self.start.unwrap_or(self.today);
        let mut fields = vec![
            SearchField::new("Event Name", Operator::Contain, self.name.clone()),
            SearchField::new("Event Start Date", Operator::GreaterAndEqual, iso(from)),
        ];
        if let Some(end) = self.end {
            fields.push(SearchField::new(
                "Event End Date",
                Operator::LessAndEqual,
                iso(end),
            ));
        }
        fields
    }

    pub fn to_request(&self) -> SearchRequest {
        SearchRequest::new(
            self.search_fields(),
            vec![
                OutputField::Name("Event ID"),
                OutputField::Name("Event Name"),
                OutputField::Name("Event Start Date"),
                OutputField::Name("Event Start Time"),
                OutputField::Name("Event Capacity"),
            ],
        )
    }
}

// ── Orders ──

pub fn order_search(cart_id: &str) -> SearchRequest {
    SearchRequest::new(
        vec![SearchField::new("Shopping Cart ID", Operator::Equal, cart_id)],
        vec![
            OutputField::Name("Account ID"),
            OutputField::Name("First Name"),
            OutputField::Name("Last Name"),
            OutputField::Name("Email 1"),
            OutputField::Name("Shopping Cart ID"),
            OutputField::Name("Order Date"),
        ],
    )
}

/// Calendar day picked in a date input.
///
/// The picker sends UTC midnight of the day the user chose, so the UTC
/// date of that instant is the local calendar day.
pub fn picker_date(ms_since_epoch: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(ms_since_epoch).map(|dt| dt.date_naive())
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
