//! Navigation-only callbacks
//!
//! These touch no data and need no credentials.

use crate::cards::field;
use axum::Json;
use shared::card::RenderActions;
use shared::error::{AppError, AppResult};
use shared::event::AddonEvent;

pub async fn pop() -> Json<RenderActions> {
    Json(RenderActions::pop())
}

pub async fn pop_to_root() -> Json<RenderActions> {
    Json(RenderActions::pop_to_root())
}

/// Pop back to the card named by the `card` parameter
pub async fn pop_to_card(Json(event): Json<AddonEvent>) -> AppResult<Json<RenderActions>> {
    let name = event
        .parameter(field::CARD)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            AppError::invalid_request("<b>Error:</b> No card to return to.")
                .with_detail("parameter", field::CARD)
        })?;
    Ok(Json(RenderActions::pop_to_card(name)))
}
