//! /groups/{role}/users handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use lemon_core::access::Role;
use lemon_core::domain::UserRef;

use crate::dto::UsernameRequest;
use crate::error::ApiError;
use crate::extract::{CurrentCaller, JsonBody, PathParam};
use crate::response::MessageResponse;
use crate::state::AppState;

fn role_from_path(slug: &str) -> Result<Role, ApiError> {
    Role::from_slug(slug).ok_or_else(|| ApiError::NotFound(format!("Unknown group: {}", slug)))
}

fn group_label(role: Role) -> &'static str {
    match role {
        Role::Manager => "managers group",
        Role::DeliveryCrew => "Delivery Crew group",
    }
}

pub async fn list_members(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    PathParam(group): PathParam<String>,
) -> Result<Json<Vec<UserRef>>, ApiError> {
    let role = role_from_path(&group)?;
    Ok(Json(state.services.roles.members(&caller, role).await?))
}

pub async fn add_member(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    PathParam(group): PathParam<String>,
    JsonBody(payload): JsonBody<UsernameRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let role = role_from_path(&group)?;
    state
        .services
        .roles
        .assign(&caller, role, payload.username.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!("User added to {}", group_label(role)))),
    ))
}

pub async fn remove_member(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    PathParam((group, user_id)): PathParam<(String, i32)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let role = role_from_path(&group)?;
    state.services.roles.remove(&caller, role, user_id).await?;
    Ok(Json(MessageResponse::new(format!(
        "User removed from {}",
        group_label(role)
    ))))
}
