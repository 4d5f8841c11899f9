//! Order handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Local;

use lemon_core::domain::{Order, OrderUpdate, StatusPatch};
use lemon_core::query::OrderParams;

use crate::error::ApiError;
use crate::extract::{CurrentCaller, JsonBody, PathParam, QueryParams};
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /orders?status=&delivery_crew=&ordering=&perpage=&page=
pub async fn list_orders(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    QueryParams(params): QueryParams<OrderParams>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.services.orders.list(&caller, &params).await?))
}

/// POST /orders: drains the caller's cart into a new order dated today.
pub async fn place_order(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let today = Local::now().date_naive();
    let order = state.services.orders.place(&caller, today).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    PathParam(id): PathParam<i32>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.services.orders.get(&caller, id).await?))
}

pub async fn update_order(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<OrderUpdate>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.services.orders.update(&caller, id, payload).await?;
    Ok(Json(MessageResponse::new("Order updated successfully")))
}

pub async fn patch_order_status(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<StatusPatch>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.services.orders.set_status(&caller, id, payload).await?;
    Ok(Json(MessageResponse::new("Status changed successfully")))
}

pub async fn delete_order(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    PathParam(id): PathParam<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.services.orders.delete(&caller, id).await?;
    Ok(Json(MessageResponse::new("Order deleted successfully")))
}
