use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::error::ApiError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject the request unless `x-api-key` matches the configured shared secret.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .map(|v| v.as_bytes())
        .ok_or(ApiError::Unauthorized)?;

    let expected = state.api_key.as_bytes();
    if expected.is_empty() || !bool::from(provided.ct_eq(expected)) {
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}
