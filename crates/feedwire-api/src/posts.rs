use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    middleware,
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use feedwire_db::models::PostRow;
use feedwire_push::build_messages;
use feedwire_types::api::CreatePostRequest;
use feedwire_types::models::{ContentPost, FeedKind};

use crate::error::ApiError;
use crate::middleware::require_api_key;
use crate::state::{AppState, now_millis};

/// GET and POST routes for all four feeds. Only the POSTs require the key;
/// other methods fall through to 405.
pub fn routes(state: &AppState) -> Router<AppState> {
    let mut router = Router::new();
    for kind in FeedKind::ALL {
        let list = get(move |state: State<AppState>| list_posts(state, kind));
        let create = post(
            move |state: State<AppState>, payload: Result<Json<CreatePostRequest>, JsonRejection>| {
                create_post(state, kind, payload)
            },
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

        router = router.route(kind.endpoint(), list.merge(create));
    }
    router
}

/// Store the post, then notify every registered device.
///
/// The post stays stored when fan-out fails; the client still gets a 500.
pub async fn create_post(
    State(state): State<AppState>,
    kind: FeedKind,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<Json<ContentPost>, ApiError> {
    let Json(req) = payload?;

    let stored = ContentPost {
        id: Uuid::new_v4(),
        heading: req.heading,
        description: req.description,
        img: req.img,
        links: req.links,
        creation_time: now_millis(),
        endpoint: kind.endpoint().to_string(),
    };

    let row = PostRow {
        id: stored.id.to_string(),
        heading: stored.heading.clone(),
        description: stored.description.clone(),
        img: stored.img.clone(),
        links: stored.links.clone(),
        endpoint: stored.endpoint.clone(),
        creation_time: stored.creation_time,
    };
    state.run_db(move |db| db.insert_post(kind, &row)).await?;

    info!("Data stored: {} post {} '{}'", kind.endpoint(), stored.id, stored.heading);

    let tokens = state.run_db(|db| db.distinct_push_tokens()).await?;
    if tokens.is_empty() {
        info!("No push tokens registered, skipping fan-out for {}", stored.id);
        return Ok(Json(stored));
    }

    let messages = build_messages(&tokens, &stored.heading, &stored.description);
    state.push.send(&messages).await?;

    Ok(Json(stored))
}

pub async fn list_posts(
    State(state): State<AppState>,
    kind: FeedKind,
) -> Result<Json<Vec<ContentPost>>, ApiError> {
    let rows = state.run_db(move |db| db.list_posts(kind)).await?;

    let posts = rows
        .into_iter()
        .map(|row| ContentPost {
            id: row.id.parse().unwrap_or_else(|e| {
                warn!("Corrupt {} post id '{}': {}", kind.endpoint(), row.id, e);
                Uuid::default()
            }),
            heading: row.heading,
            description: row.description,
            img: row.img,
            links: row.links,
            creation_time: row.creation_time,
            endpoint: row.endpoint,
        })
        .collect();

    Ok(Json(posts))
}
