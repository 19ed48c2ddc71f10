//! Registration flows built from single Neon calls

use crate::api::{AttendeeStatusUpdate, NeonApi};
use crate::error::NeonResult;
use crate::types::{EventRegistration, Registrant, UpcomingRegistration, status};
use chrono::{NaiveDate, NaiveDateTime};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::{Value, json};

/// Registrant lookups allowed in flight at once
const COUNT_CONCURRENCY: usize = 8;

/// Successful attendees across a set of registrations
pub fn count_registrants(registrations: &[EventRegistration]) -> u32 {
    registrations
        .iter()
        .filter(|r| r.is_succeeded())
        .map(EventRegistration::attendee_count)
        .sum()
}

pub async fn registrant_count(api: &dyn NeonApi, event_id: &str) -> NeonResult<u32> {
    let registrations = api.event_registrations(event_id).await?;
    Ok(count_registrants(&registrations))
}

/// Registrant count per event, in the order given. Lookups run
/// concurrently; the first failure fails the whole batch.
pub async fn registrant_counts<'a, I>(api: &dyn NeonApi, event_ids: I) -> NeonResult<Vec<u32>>
where
    I: IntoIterator<Item = &'a str>,
{
    // Futures are built up front (they stay lazy) so no closure is held across
    // the await, which would defeat Send inference in callers
    let lookups: Vec<_> = event_ids
        .into_iter()
        .map(|event_id| registrant_count(api, event_id))
        .collect();
    stream::iter(lookups)
        .buffered(COUNT_CONCURRENCY)
        .try_collect()
        .await
}

/// Active registrations for classes on or after `today`, soonest first
pub async fn upcoming_registrations(
    api: &dyn NeonApi,
    account_id: &str,
    today: NaiveDate,
) -> NeonResult<Vec<UpcomingRegistration>> {
    let registrations = api.account_registrations(account_id, None).await?;

    let mut upcoming = Vec::new();
    for registration in registrations.iter().filter(|r| r.is_succeeded()) {
        let Some(event_id) = registration.event_id.as_deref() else {
            continue;
        };
        let event = api.get_event(event_id).await?;
        let Some(event_date) = event.start_date() else {
            tracing::warn!(event_id, "Event has no start date, skipping");
            continue;
        };
        if event_date < today {
            continue;
        }
        upcoming.push(UpcomingRegistration {
            registration_id: registration.id.clone(),
            event_id: event_id.to_string(),
            event_name: event.name,
            event_date,
            status: registration.status().unwrap_or_default().to_string(),
        });
    }

    upcoming.sort_by(|a, b| {
        a.event_date
            .cmp(&b.event_date)
            .then_with(|| a.event_name.cmp(&b.event_name))
    });
    Ok(upcoming)
}

/// Result of a cancel or refund attempt that reached Neon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Attendee status was changed
    Applied { attendee_id: String },
    /// Registration exists but is no longer active
    AlreadyInactive { status: String },
    /// No registration with that id for this account and event
    NotFound,
}

/// Cancel one registration.
///
/// The cancel payload needs the attendee id, which only the account's
/// registration listing carries, so the registration is fetched again first.
pub async fn cancel_registration(
    api: &dyn NeonApi,
    registration_id: &str,
    event_id: &str,
    account_id: &str,
) -> NeonResult<Termination> {
    terminate(api, Some(registration_id), event_id, account_id, status::CANCELED).await
}

/// Refund one registration: the attendee is marked REFUNDED, which cancels
/// the seat and reverses the charge. Without a registration id the newest
/// registration for the event is used.
pub async fn refund_registration(
    api: &dyn NeonApi,
    event_id: &str,
    account_id: &str,
    registration_id: Option<&str>,
) -> NeonResult<Termination> {
    terminate(api, registration_id, event_id, account_id, status::REFUNDED).await
}

async fn terminate(
    api: &dyn NeonApi,
    registration_id: Option<&str>,
    event_id: &str,
    account_id: &str,
    new_status: &'static str,
) -> NeonResult<Termination> {
    let registrations = api.account_registrations(account_id, Some(event_id)).await?;
    let found = match registration_id {
        Some(id) => registrations.iter().find(|r| r.id == id),
        None => registrations.first(),
    };
    let Some(registration) = found else {
        return Ok(Termination::NotFound);
    };

    if !registration.is_succeeded() {
        return Ok(Termination::AlreadyInactive {
            status: registration.status().unwrap_or("UNKNOWN").to_string(),
        });
    }
    let Some(attendee_id) = registration.attendee_id() else {
        return Ok(Termination::NotFound);
    };

    let update = AttendeeStatusUpdate {
        registration_id: registration.id.clone(),
        event_id: event_id.to_string(),
        account_id: account_id.to_string(),
        attendee_id: attendee_id.to_string(),
        status: new_status,
    };
    api.update_attendee_status(&update).await?;

    tracing::info!(
        registration_id = %update.registration_id,
        event_id,
        status = new_status,
        "Attendee status updated"
    );
    Ok(Termination::Applied {
        attendee_id: update.attendee_id,
    })
}

// ── Request bodies ──

/// Body for `POST /eventRegistrations`: free, one attendee, confirmed
pub fn registration_body(registrant: &Registrant, event_id: &str, now: NaiveDateTime) -> Value {
    let stamp = now.format("%Y-%m-%dT%H:%M:%S").to_string();
    json!({
        "eventId": event_id,
        "sendSystemEmail": true,
        "registrationAmount": 0,
        "ignoreCapacity": false,
        "registrantAccountId": registrant.account_id,
        "registrationDateTime": format!("{stamp}Z"),
        "tickets": [{
            "attendees": [{
                "accountId": registrant.account_id,
                "firstName": registrant.first_name,
                "lastName": registrant.last_name,
                "markedAttended": false,
                "registrantAccountId": registrant.account_id,
                "registrationStatus": status::SUCCEEDED,
                "registrationDate": stamp,
            }]
        }],
        "totalCharge": 0
    })
}

/// Body for `PATCH /eventRegistrations/{id}`
pub fn status_patch_body(update: &AttendeeStatusUpdate) -> Value {
    json!({
        "eventId": update.event_id,
        "registrantAccountId": update.account_id,
        "tickets": [{
            "attendees": [{
                "attendeeId": numeric_or_text(&update.attendee_id),
                "registrationStatus": update.status,
            }]
        }]
    })
}

/// Neon issues attendee ids as integers; send them back the same way
fn numeric_or_text(id: &str) -> Value {
    id.parse::<u64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(id.to_string()))
}
