pub mod error;
pub mod health;
pub mod middleware;
pub mod posts;
pub mod signups;
pub mod state;
pub mod tokens;

use axum::{
    Router,
    routing::{get, post},
};

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// All HTTP routes. Signups, token registration and every GET are public;
/// feed POSTs require the shared secret.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/alpha-users",
            post(signups::create_alpha_user).get(signups::list_alpha_users),
        )
        .route("/token", post(tokens::register_token).get(tokens::list_tokens))
        .route("/health", get(health::health))
        .merge(posts::routes(&state))
        .with_state(state)
}
