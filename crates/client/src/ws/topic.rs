//! Realtime topics and the payload shape each one accepts.

use greenworld_shared::{Notification, Waste};
use serde_json::Value;

/// A named relay channel together with the validator for its payloads.
pub trait Topic: Send + Sync + 'static {
    /// Channel name sent in the subscribe identifier.
    const CHANNEL: &'static str;

    type Event: Send + 'static;

    /// Turn a published `message` into an event, or `None` if it does not
    /// have the shape this topic expects.
    fn decode(message: Value) -> Option<Self::Event>;
}

/// Per-user notifications. A payload needs a title and a body.
#[derive(Debug, Clone, Copy)]
pub struct NotificationTopic;

impl Topic for NotificationTopic {
    const CHANNEL: &'static str = "NotificationChannel";
    type Event = Notification;

    fn decode(message: Value) -> Option<Notification> {
        if !has_text(&message, "title") || !has_text(&message, "body") {
            return None;
        }
        serde_json::from_value(message).ok()
    }
}

/// Status changes of the user's waste submissions. A payload needs a waste type.
#[derive(Debug, Clone, Copy)]
pub struct WasteTopic;

impl Topic for WasteTopic {
    const CHANNEL: &'static str = "WasteChannel";
    type Event = Waste;

    fn decode(message: Value) -> Option<Waste> {
        if !has_text(&message, "waste_type") {
            return None;
        }
        serde_json::from_value(message).ok()
    }
}

/// `field` is present as a non-empty string. Other fields are left to the
/// model, which reads `null` as a default.
fn has_text(message: &Value, field: &str) -> bool {
    message
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|text| !text.is_empty())
}
