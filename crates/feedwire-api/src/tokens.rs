use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::{info, warn};
use uuid::Uuid;

use feedwire_types::api::{RegisterTokenRequest, SuccessResponse};
use feedwire_types::models::PushToken;

use crate::error::ApiError;
use crate::state::{AppState, now_millis};

/// POST /token — registers a device. Duplicates are stored as-is; fan-out
/// deduplicates when it reads them back.
pub async fn register_token(
    State(state): State<AppState>,
    payload: Result<Json<RegisterTokenRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(req) = payload?;
    let id = Uuid::new_v4();
    let creation_time = now_millis();

    let token = req.push_token.clone();
    state
        .run_db(move |db| db.insert_push_token(&id.to_string(), &req.push_token, creation_time))
        .await?;

    info!("Data stored: push token {} ({})", token, id);

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /token
pub async fn list_tokens(State(state): State<AppState>) -> Result<Json<Vec<PushToken>>, ApiError> {
    let rows = state.run_db(|db| db.list_push_tokens()).await?;

    let tokens = rows
        .into_iter()
        .map(|row| PushToken {
            id: row.id.parse().unwrap_or_else(|e| {
                warn!("Corrupt push token id '{}': {}", row.id, e);
                Uuid::default()
            }),
            push_token: row.push_token,
            creation_time: row.creation_time,
        })
        .collect();

    Ok(Json(tokens))
}
