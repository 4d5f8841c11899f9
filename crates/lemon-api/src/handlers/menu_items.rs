//! Menu item handlers. Reads are open to any authenticated caller, writes
//! need a manager or superuser.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use lemon_core::domain::{MenuItemInput, MenuItemPatch};
use lemon_core::query::MenuItemParams;

use crate::dto::MenuItemResponse;
use crate::error::ApiError;
use crate::extract::{CurrentCaller, JsonBody, PathParam, QueryParams};
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /menu-items?category=&to_price=&search=&ordering=&perpage=&page=
pub async fn list_menu_items(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<MenuItemParams>,
) -> Result<Json<Vec<MenuItemResponse>>, ApiError> {
    let items = state.services.catalog.list_menu_items(&params).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

pub async fn create_menu_item(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    JsonBody(payload): JsonBody<MenuItemInput>,
) -> Result<(StatusCode, Json<MenuItemResponse>), ApiError> {
    let item = state.services.catalog.create_menu_item(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

pub async fn get_menu_item(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<MenuItemResponse>, ApiError> {
    let item = state.services.catalog.get_menu_item(id).await?;
    Ok(Json(item.into()))
}

pub async fn update_menu_item(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<MenuItemInput>,
) -> Result<Json<MenuItemResponse>, ApiError> {
    let item = state.services.catalog.update_menu_item(&caller, id, payload).await?;
    Ok(Json(item.into()))
}

pub async fn patch_menu_item(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<MenuItemPatch>,
) -> Result<Json<MenuItemResponse>, ApiError> {
    let item = state.services.catalog.patch_menu_item(&caller, id, payload).await?;
    Ok(Json(item.into()))
}

pub async fn delete_menu_item(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    PathParam(id): PathParam<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.services.catalog.delete_menu_item(&caller, id).await?;
    Ok(Json(MessageResponse::new("Item deleted successfully")))
}
