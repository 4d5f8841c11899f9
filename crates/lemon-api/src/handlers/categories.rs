use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use lemon_core::domain::{Category, NewCategory};

use crate::error::ApiError;
use crate::extract::{CurrentCaller, JsonBody, PathParam};
use crate::response::MessageResponse;
use crate::state::AppState;

pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.services.catalog.list_categories().await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.services.catalog.create_category(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.services.catalog.get_category(id).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    PathParam(id): PathParam<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.services.catalog.delete_category(&caller, id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
