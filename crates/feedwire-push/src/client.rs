use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::message::PushMessage;

pub const EXPO_PUSH_URL: &str = "https://exp.host/--/api/v2/push/send";

/// Transport, status and decoding failures are all "the batch was not
/// delivered"; callers treat every variant the same way.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("push gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("push gateway returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed push gateway response: {0}")]
    MalformedResponse(String),
}

/// Per-device outcome counts reported by the gateway for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushReceipt {
    pub accepted: usize,
    pub rejected: usize,
}

/// An external service that delivers a batch of notifications in one call.
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send(&self, messages: &[PushMessage]) -> Result<PushReceipt, PushError>;
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    data: Vec<PushTicket>,
}

#[derive(Debug, Deserialize)]
struct PushTicket {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

/// Client for Expo's push service (`POST /--/api/v2/push/send`).
pub struct ExpoPushClient {
    http: reqwest::Client,
    url: String,
    access_token: Option<String>,
}

impl ExpoPushClient {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        access_token: Option<String>,
    ) -> Result<Self, PushError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
            access_token,
        })
    }

    async fn dispatch(&self, messages: &[PushMessage]) -> Result<PushReceipt, PushError> {
        let mut request = self
            .http
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(messages);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PushError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SendResponse = serde_json::from_str(&body)
            .map_err(|e| PushError::MalformedResponse(e.to_string()))?;

        let mut receipt = PushReceipt::default();
        for ticket in &parsed.data {
            if ticket.status == "ok" {
                receipt.accepted += 1;
            } else {
                receipt.rejected += 1;
                warn!(
                    "Push ticket rejected: {} ({})",
                    ticket.message.as_deref().unwrap_or("no message"),
                    ticket.details.as_ref().map(|d| d.to_string()).unwrap_or_default()
                );
            }
        }

        Ok(receipt)
    }
}

#[async_trait]
impl PushGateway for ExpoPushClient {
    async fn send(&self, messages: &[PushMessage]) -> Result<PushReceipt, PushError> {
        match self.dispatch(messages).await {
            Ok(receipt) => {
                info!(
                    "Push notifications sent: {} accepted, {} rejected",
                    receipt.accepted, receipt.rejected
                );
                Ok(receipt)
            }
            Err(e) => {
                error!("Error sending push notifications: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::build_messages;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEND_PATH: &str = "/--/api/v2/push/send";

    fn client(server: &MockServer, token: Option<&str>) -> ExpoPushClient {
        ExpoPushClient::new(
            format!("{}{}", server.uri(), SEND_PATH),
            Duration::from_secs(5),
            token.map(str::to_string),
        )
        .unwrap()
    }

    fn two_messages() -> Vec<PushMessage> {
        build_messages(
            &["ExponentPushToken[a]".to_string(), "ExponentPushToken[b]".to_string()],
            "Heading",
            "",
        )
    }

    #[tokio::test]
    async fn sends_whole_batch_in_one_request() {
        let server = MockServer::start().await;
        let expected = serde_json::json!([
            {
                "to": "ExponentPushToken[a]",
                "sound": "default",
                "title": "Heading",
                "body": "You have a new notification!",
                "data": { "heading": "Heading", "description": "" }
            },
            {
                "to": "ExponentPushToken[b]",
                "sound": "default",
                "title": "Heading",
                "body": "You have a new notification!",
                "data": { "heading": "Heading", "description": "" }
            }
        ]);

        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(body_json(&expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "status": "ok", "id": "1" },
                    { "status": "error", "message": "not registered",
                      "details": { "error": "DeviceNotRegistered" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = client(&server, None).send(&two_messages()).await.unwrap();
        assert_eq!(receipt, PushReceipt { accepted: 1, rejected: 1 });
    }

    #[tokio::test]
    async fn access_token_is_sent_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server, Some("secret-token")).send(&[]).await.unwrap();
    }

    #[tokio::test]
    async fn error_status_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server, None).send(&two_messages()).await.unwrap_err();
        assert!(matches!(err, PushError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn unexpected_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server, None).send(&two_messages()).await.unwrap_err();
        assert!(matches!(err, PushError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_a_request_error() {
        let client =
            ExpoPushClient::new("http://127.0.0.1:1/send", Duration::from_secs(2), None).unwrap();
        let err = client.send(&two_messages()).await.unwrap_err();
        assert!(matches!(err, PushError::Request(_)));
    }
}
