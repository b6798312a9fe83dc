use serde::{Deserialize, Serialize};

use crate::models::{Link, nullable_string, nullable_vec};

// -- Alpha signups --

/// `user` is the new member's address; `inviter` names an existing member's
/// address, or is empty. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default, deserialize_with = "nullable_string")]
    pub user: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub inviter: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub hash: String,
}

// -- Push tokens --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTokenRequest {
    #[serde(default, deserialize_with = "nullable_string")]
    pub push_token: String,
}

// -- Content posts --

/// Body of a feed post. Clients may echo back `creationTime` or `endpoint`;
/// unknown fields are ignored and both are overwritten by the server.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default, deserialize_with = "nullable_string")]
    pub heading: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub img: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub links: Vec<Link>,
}

// -- Generic responses --

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
