// ============================================================================
// Lemon API - Authentication Middleware
// File: crates/lemon-api/src/middleware/auth.rs
// ============================================================================
//! Bearer token authentication and throttling for protected routes

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the caller from `Authorization`, charge their throttle bucket and
/// attach the [`Caller`](lemon_core::access::Caller) to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        ApiError::Unauthorized("Authentication credentials were not provided.".to_string())
    })?;

    let caller = state.services.auth.authenticate(token).await?;

    if let Err(wait) = state.throttle.check(&caller) {
        warn!(
            "Throttled {} in scope {}",
            caller.username,
            caller.throttle_scope()
        );
        return Err(ApiError::TooManyRequests {
            retry_after_seconds: wait.as_secs().max(1),
        });
    }

    debug!("Authenticated {} ({})", caller.username, caller.user_id);
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

/// Accepts `Bearer <token>` and `Token <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if scheme.eq_ignore_ascii_case("bearer") || scheme.eq_ignore_ascii_case("token") {
        Some(token)
    } else {
        None
    }
}
