use axum::{Json, extract::State};

use feedwire_types::api::HealthResponse;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /health — 200 as long as the database answers.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.run_db(|db| db.ping()).await?;
    Ok(Json(HealthResponse { status: "ok" }))
}
