//! Account registration and token login

use axum::{extract::State, http::StatusCode, Json};

use lemon_core::domain::{Credentials, Registration};

use crate::dto::{CurrentUser, RegisteredUser, TokenResponse};
use crate::error::ApiError;
use crate::extract::{CurrentCaller, JsonBody};
use crate::state::AppState;

/// POST /auth/users
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Registration>,
) -> Result<(StatusCode, Json<RegisteredUser>), ApiError> {
    let user = state.services.auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /auth/token/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    let auth_token = state.services.auth.login(&credentials).await?;
    Ok(Json(TokenResponse { auth_token }))
}

/// GET /auth/users/me
pub async fn me(CurrentCaller(caller): CurrentCaller) -> Json<CurrentUser> {
    Json(CurrentUser::from(&caller))
}
