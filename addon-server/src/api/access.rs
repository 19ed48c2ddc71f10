//! Door access checklist and OpenPath update

use super::pipeline::{caller, member};
use crate::cards::access::{access_checklist_card, access_updated_card, missing_requirements};
use crate::error::UpstreamResultExt;
use crate::openpath::AccessMember;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use shared::card::RenderActions;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::event::AddonEvent;

pub async fn check_access(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    let caller = caller(&state, &event).await?;
    let neon = caller.neon(&state);
    let member = member(&state, &event, neon.as_ref()).await?;
    Ok(Json(RenderActions::push(access_checklist_card(
        &member.account,
    ))))
}

/// Grant door access once waiver, tour and membership are all on record.
/// The account is searched again here so the check uses current data.
pub async fn update_access(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    let caller = caller(&state, &event).await?;
    let neon = caller.neon(&state);
    let member = member(&state, &event, neon.as_ref()).await?;

    let missing = missing_requirements(&member.account);
    if !missing.is_empty() {
        let message = format!(
            "{} Missing: {}.",
            ErrorCode::AccessRequirementsIncomplete.message(),
            missing.join(", ")
        );
        return Err(
            AppError::with_message(ErrorCode::AccessRequirementsIncomplete, message)
                .with_detail("missing", missing),
        );
    }

    state
        .access
        .update_access(
            &AccessMember::new(&member.account, &member.email),
            &caller.openpath_credentials(),
        )
        .await
        .or_failed(ErrorCode::AccessUpdateFailed, "Openpath update")?;

    Ok(Json(RenderActions::push(access_updated_card())))
}
