//! Home triggers and the Neon ID lookup

use super::pipeline::{authorize, caller, member};
use crate::cards::home::{account_card, contextual_home_card, home_card};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use shared::card::RenderActions;
use shared::error::AppResult;
use shared::event::AddonEvent;

pub async fn home(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    authorize(&state, &event).await?;
    Ok(Json(RenderActions::push(home_card(&state.endpoints))))
}

pub async fn contextual_home(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    authorize(&state, &event).await?;
    Ok(Json(RenderActions::push(contextual_home_card(
        &state.endpoints,
    ))))
}

pub async fn get_neon_id(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    let caller = caller(&state, &event).await?;
    let neon = caller.neon(&state);
    let member = member(&state, &event, neon.as_ref()).await?;
    Ok(Json(RenderActions::push(account_card(&member.account))))
}
