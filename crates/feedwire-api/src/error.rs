use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use feedwire_push::PushError;
use feedwire_types::api::ErrorResponse;

/// Every handler failure. Dependency failures collapse into one generic 500
/// body; the cause only reaches the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing or invalid API key")]
    Unauthorized,

    #[error("invalid request body: {0}")]
    BadRequest(#[from] JsonRejection),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("push fan-out failed: {0}")]
    Push(#[from] PushError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) | ApiError::Join(_) | ApiError::Push(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Unauthorized => "Unauthorized",
            ApiError::BadRequest(_) => {
                warn!("{}", self);
                "Bad Request"
            }
            _ => {
                error!("{}", self);
                "Internal Server Error"
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_failures_are_generic_500s() {
        let storage = ApiError::from(anyhow::anyhow!("disk full"));
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let push = ApiError::from(PushError::MalformedResponse("eof".into()));
        assert_eq!(push.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }
}
