use axum::{extract::State, http::StatusCode, Json};

use lemon_core::domain::{AddToCart, CartLine};

use crate::error::ApiError;
use crate::extract::{CurrentCaller, JsonBody};
use crate::response::MessageResponse;
use crate::state::AppState;

pub async fn list_cart(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<Json<Vec<CartLine>>, ApiError> {
    Ok(Json(state.services.cart.list(&caller).await?))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    JsonBody(payload): JsonBody<AddToCart>,
) -> Result<(StatusCode, Json<CartLine>), ApiError> {
    let line = state.services.cart.add(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<Json<MessageResponse>, ApiError> {
    state.services.cart.clear(&caller).await?;
    Ok(Json(MessageResponse::new("All items removed from cart")))
}
