//! Per-user API key settings

use super::pipeline::{authorize, identify};
use crate::cards::field;
use crate::cards::settings::{settings_card, settings_saved_card};
use crate::secrets::CredentialBundle;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use shared::card::RenderActions;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::event::AddonEvent;

pub async fn settings(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    authorize(&state, &event).await?;
    Ok(Json(RenderActions::push(settings_card(&state.endpoints))))
}

/// Replace the caller's stored keys. All three are required.
pub async fn submit_settings(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    authorize(&state, &event).await?;
    let identity = identify(&state, &event).await?;

    let input = |name: &str| {
        event.string_input(name).map(str::to_string).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::RequiredField,
                "<b>Error:</b> Enter the Neon API key, Openpath API user and Openpath API key.",
            )
            .with_detail("field", name)
        })
    };
    let bundle = CredentialBundle {
        neon_api_key: input(field::NEON_API_KEY)?,
        openpath_user: input(field::OPENPATH_USER)?,
        openpath_key: input(field::OPENPATH_KEY)?,
    };

    state
        .credentials
        .save_user_keys(&identity, &bundle)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %identity.user_id, "Saving settings failed");
            AppError::new(ErrorCode::SettingsSaveFailed)
        })?;

    Ok(Json(RenderActions::update(settings_saved_card())))
}
