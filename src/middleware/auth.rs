use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::errors::auth_error::AuthError;
use crate::state::AppState;

/// Extract the bearer token from the `Authorization` header.
fn extract_token(request: &Request) -> Result<&str, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?;
    let value = header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;

    value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)
}

/// Rejects requests whose bearer token does not match `api_auth_key`.
///
/// Runs before the WebSocket upgrade, so a rejected caller gets a plain
/// `401` and no call session is created.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let path = request.uri().path().to_string();
    let token = extract_token(&request).inspect_err(|e| {
        tracing::warn!(path = %path, "Authentication failed: {}", e);
    })?;

    let expected = state.config.api_auth_key.as_bytes();
    if !bool::from(token.as_bytes().ct_eq(expected)) {
        tracing::warn!(path = %path, "Authentication failed: token mismatch");
        return Err(AuthError::Unauthorized("Invalid API key".to_string()));
    }

    tracing::debug!(path = %path, "Authentication successful");
    Ok(next.run(request).await)
}
