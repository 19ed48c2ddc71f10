//! Cancel and refund
//!
//! Both run the same three steps: list upcoming registrations, confirm one,
//! then apply it. Identifiers travel in button parameters between steps;
//! nothing is kept on the server.

use super::pipeline::{authorize, caller, member};
use crate::cards::registrations::{action_complete_card, confirm_card, registrations_card};
use crate::error::UpstreamResultExt;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use neon_client::Termination;
use neon_client::registration::{cancel_registration, refund_registration, upcoming_registrations};
use shared::action::{PendingKind, PendingRegistrationAction};
use shared::card::RenderActions;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::event::AddonEvent;

pub async fn list_cancelable(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    list(&state, &event, PendingKind::Cancel).await
}

pub async fn list_refundable(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    list(&state, &event, PendingKind::Refund).await
}

pub async fn request_cancel(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    request(&state, &event, PendingKind::Cancel).await
}

pub async fn request_refund(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    request(&state, &event, PendingKind::Refund).await
}

pub async fn confirm_cancel(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    confirm(&state, &event, PendingKind::Cancel).await
}

pub async fn confirm_refund(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    confirm(&state, &event, PendingKind::Refund).await
}

async fn list(
    state: &AppState,
    event: &AddonEvent,
    kind: PendingKind,
) -> AppResult<Json<RenderActions>> {
    let caller = caller(state, event).await?;
    let neon = caller.neon(state);
    let member = member(state, event, neon.as_ref()).await?;
    let account_id = &member.account.account_id;

    let upcoming = upcoming_registrations(neon.as_ref(), account_id, state.today())
        .await
        .or_failed(ErrorCode::RegistrationListFailed, "Registration lookup")?;
    if upcoming.is_empty() {
        return Err(AppError::new(ErrorCode::NoUpcomingClasses));
    }

    Ok(Json(RenderActions::push(registrations_card(
        &state.endpoints,
        kind,
        account_id,
        &upcoming,
    ))))
}

fn pending_action(event: &AddonEvent, kind: PendingKind) -> AppResult<PendingRegistrationAction> {
    let pending = PendingRegistrationAction::from_parameters(event.parameters())?;
    if pending.kind != kind {
        return Err(AppError::invalid_request(format!(
            "<b>Error:</b> Expected a {} request.",
            kind.as_str()
        )));
    }
    Ok(pending)
}

async fn request(
    state: &AppState,
    event: &AddonEvent,
    kind: PendingKind,
) -> AppResult<Json<RenderActions>> {
    authorize(state, event).await?;
    let pending = pending_action(event, kind)?;
    Ok(Json(RenderActions::push(confirm_card(
        &state.endpoints,
        &pending,
    ))))
}

async fn confirm(
    state: &AppState,
    event: &AddonEvent,
    kind: PendingKind,
) -> AppResult<Json<RenderActions>> {
    let caller = caller(state, event).await?;
    let pending = pending_action(event, kind)?;
    let neon = caller.neon(state);

    let member = member(state, event, neon.as_ref()).await?;
    if member.account.account_id != pending.account_id {
        tracing::warn!(
            account_id = %member.account.account_id,
            requested = %pending.account_id,
            "Pending action names a different account"
        );
        return Err(AppError::invalid_request(
            "<b>Error:</b> This registration belongs to a different account. Start again from the class list.",
        ));
    }

    let outcome = match kind {
        PendingKind::Cancel => cancel_registration(
            neon.as_ref(),
            &pending.registration_id,
            &pending.event_id,
            &pending.account_id,
        )
        .await
        .or_failed(ErrorCode::CancellationFailed, "Cancelation")?,
        PendingKind::Refund => refund_registration(
            neon.as_ref(),
            &pending.event_id,
            &pending.account_id,
            Some(&pending.registration_id),
        )
        .await
        .or_failed(ErrorCode::RefundFailed, "Refund")?,
    };

    match outcome {
        Termination::Applied { attendee_id } => {
            tracing::info!(
                registration_id = %pending.registration_id,
                attendee_id = %attendee_id,
                kind = kind.as_str(),
                "Registration terminated"
            );
            Ok(Json(RenderActions::push(action_complete_card(
                &state.endpoints,
                &pending,
            ))))
        }
        Termination::AlreadyInactive { status } => {
            Err(AppError::new(ErrorCode::RegistrationAlreadyCanceled).with_detail("status", status))
        }
        Termination::NotFound => Err(AppError::new(ErrorCode::RegistrationNotFound)),
    }
}
