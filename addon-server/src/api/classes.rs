//! Class search and registration

use super::pipeline::{authorize, caller, member};
use crate::cards::classes::{
    EventAvailability, class_home_card, class_results_card, registered_card,
};
use crate::cards::field;
use crate::error::UpstreamResultExt;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use chrono::NaiveDate;
use neon_client::registration::registrant_counts;
use neon_client::search::picker_date;
use neon_client::{EventQuery, Registrant};
use shared::action::RegisterTarget;
use shared::card::RenderActions;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::event::AddonEvent;

pub async fn class_home_page(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    authorize(&state, &event).await?;
    Ok(Json(RenderActions::push(class_home_card(&state.endpoints))))
}

/// Events matching the name and date range, each with its registrant count
pub async fn search_classes(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    let caller = caller(&state, &event).await?;
    let name = event
        .string_input(field::CLASS_NAME)
        .ok_or_else(|| AppError::new(ErrorCode::ClassNameRequired))?;

    let query = EventQuery {
        name: name.to_string(),
        start: picked_date(&event, field::CLASS_START_DATE)?,
        end: picked_date(&event, field::CLASS_END_DATE)?,
        today: state.today(),
    };
    let neon = caller.neon(&state);
    let events = neon
        .search_events(&query)
        .await
        .or_failed(ErrorCode::ClassSearchFailed, "Class search")?;
    if events.is_empty() {
        return Err(AppError::new(ErrorCode::NoClassesFound));
    }
    tracing::debug!(name = %query.name, matches = events.len(), "Class search");

    let event_ids: Vec<&str> = events
        .iter()
        .map(|summary| summary.event_id.as_str())
        .collect();
    let counts = registrant_counts(neon.as_ref(), event_ids)
        .await
        .or_failed(ErrorCode::ClassSearchFailed, "Class search")?;
    let results: Vec<EventAvailability> = events
        .into_iter()
        .zip(counts)
        .map(|(summary, registrants)| EventAvailability {
            event: summary,
            registrants,
        })
        .collect();

    Ok(Json(RenderActions::push(class_results_card(
        &state.endpoints,
        &results,
    ))))
}

/// Calendar day from a date picker, if one was filled in
fn picked_date(event: &AddonEvent, name: &str) -> AppResult<Option<NaiveDate>> {
    event
        .date_input(name)
        .map(|ms| {
            picker_date(ms).ok_or_else(|| {
                tracing::debug!(field = name, ms, "Date picker value out of range");
                AppError::new(ErrorCode::DateInvalid)
            })
        })
        .transpose()
}

/// Register the member at zero price for the event on the clicked button
pub async fn class_reg(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    let caller = caller(&state, &event).await?;
    let target = RegisterTarget::from_parameters(event.parameters())?;
    let neon = caller.neon(&state);
    let member = member(&state, &event, neon.as_ref()).await?;

    neon.register_for_event(
        &Registrant::from(&member.account),
        &target.event_id,
        state.now_local(),
    )
    .await
    .or_failed(ErrorCode::RegistrationFailed, "Registration")?;

    tracing::info!(
        account_id = %member.account.account_id,
        event_id = %target.event_id,
        "Registered member for class"
    );
    Ok(Json(RenderActions::push(registered_card(
        &state.endpoints,
        &target.event_name,
    ))))
}
