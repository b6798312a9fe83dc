use serde::Serialize;

pub const DEFAULT_SOUND: &str = "default";
pub const FALLBACK_TITLE: &str = "Howdy";
pub const FALLBACK_BODY: &str = "You have a new notification!";

/// One notification in the gateway's batch format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    #[serde(rename = "to")]
    pub destination: String,
    pub sound: &'static str,
    pub title: String,
    pub body: String,
    pub data: PushData,
}

/// The post's raw heading/description, delivered to the app untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushData {
    pub heading: String,
    pub description: String,
}

/// Builds one message per destination. Empty heading or description fall
/// back to generic text in the visible title/body only.
pub fn build_messages(destinations: &[String], heading: &str, description: &str) -> Vec<PushMessage> {
    let title = if heading.is_empty() { FALLBACK_TITLE } else { heading };
    let body = if description.is_empty() { FALLBACK_BODY } else { description };

    destinations
        .iter()
        .map(|destination| PushMessage {
            destination: destination.clone(),
            sound: DEFAULT_SOUND,
            title: title.to_string(),
            body: body.to_string(),
            data: PushData {
                heading: heading.to_string(),
                description: description.to_string(),
            },
        })
        .collect()
}
