//! Gift certificate lookup

use super::pipeline::caller;
use crate::cards::field;
use crate::cards::gift::gift_certificate_card;
use crate::error::UpstreamResultExt;
use crate::gmail::parse_address_list;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use shared::card::RenderActions;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::event::AddonEvent;

/// Find the purchaser of a certificate. In a draft, the purchaser is also
/// added to CC.
pub async fn gift_cert_lookup(
    State(state): State<AppState>,
    Json(event): Json<AddonEvent>,
) -> AppResult<Json<RenderActions>> {
    let caller = caller(&state, &event).await?;
    let cart_id = event
        .string_input(field::GIFT_CERT_NUMBER)
        .filter(|n| n.chars().all(|c| c.is_ascii_digit()))
        .ok_or_else(|| AppError::new(ErrorCode::InvalidGiftCertificate))?;

    let neon = caller.neon(&state);
    let orders = neon
        .search_orders_by_cart_id(cart_id)
        .await
        .or_failed(ErrorCode::GiftCertificateLookupFailed, "Gift certificate lookup")?;
    let Some(order) = orders.first() else {
        return Err(AppError::new(ErrorCode::GiftCertificateNotFound));
    };

    let response = RenderActions::push(gift_certificate_card(cart_id, order));
    let purchaser = order
        .email
        .as_deref()
        .and_then(|email| parse_address_list(email).into_iter().next());
    match purchaser {
        Some(email) if event.is_compose() => Ok(Json(response.with_cc_recipients(vec![email]))),
        _ => Ok(Json(response)),
    }
}
