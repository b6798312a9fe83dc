//! Push notification fan-out: payload construction and the gateway client.

pub mod client;
pub mod message;

pub use client::{EXPO_PUSH_URL, ExpoPushClient, PushError, PushGateway, PushReceipt};
pub use message::{PushMessage, build_messages};
