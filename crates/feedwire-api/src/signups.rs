use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::{info, warn};
use uuid::Uuid;

use feedwire_db::models::AlphaUserRow;
use feedwire_types::api::{SignupRequest, SuccessResponse};
use feedwire_types::models::{AlphaUser, AlphaUserProfile};

use crate::error::ApiError;
use crate::state::{AppState, now_millis};

/// POST /alpha-users — stores the signup and credits the inviter, if known.
pub async fn create_alpha_user(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(req) = payload?;
    let id = Uuid::new_v4();
    let creation_time = now_millis();

    let address = req.user.clone();
    let inviter = req.inviter.clone();
    let credited = state
        .run_db(move |db| {
            db.create_alpha_user(&id.to_string(), &req.user, &req.inviter, &req.hash, creation_time)
        })
        .await?;

    info!(
        "Data stored: alpha user {} ({}), inviter '{}' credited: {}",
        address, id, inviter, credited
    );

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /alpha-users
pub async fn list_alpha_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<AlphaUser>>, ApiError> {
    let rows = state.run_db(|db| db.list_alpha_users()).await?;
    Ok(Json(rows.into_iter().map(to_alpha_user).collect()))
}

fn to_alpha_user(row: AlphaUserRow) -> AlphaUser {
    AlphaUser {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt alpha user id '{}': {}", row.id, e);
            Uuid::default()
        }),
        user: AlphaUserProfile {
            address: row.address,
            inviter: row.inviter,
            hash: row.hash,
            num_invites: row.num_invites,
        },
        creation_time: row.creation_time,
    }
}
