//! Realtime relay protocol: subscribe command and inbound frame decoding.
//!
//! The relay speaks a channel-based protocol over a single socket. A client
//! sends one subscribe command per topic; the relay answers with an ack and
//! then streams `{"message": ...}` frames, interleaved with keep-alive pings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const COMMAND_SUBSCRIBE: &str = "subscribe";
pub const TYPE_PING: &str = "ping";
pub const TYPE_CONFIRM_SUBSCRIPTION: &str = "confirm_subscription";

/// What a subscription is scoped to. Serialized as the inner `identifier`
/// document; field order is part of the wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelIdentifier {
    pub channel: String,
    pub user_id: u64,
}

/// Outbound command frame.
///
/// `identifier` holds JSON *text*: the relay expects the channel identifier
/// encoded as a string inside the outer document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CableCommand {
    pub command: String,
    pub identifier: String,
}

impl CableCommand {
    pub fn subscribe(channel: &str, user_id: u64) -> Result<Self, serde_json::Error> {
        let identifier = serde_json::to_string(&ChannelIdentifier {
            channel: channel.to_string(),
            user_id,
        })?;
        Ok(Self {
            command: COMMAND_SUBSCRIBE.to_string(),
            identifier,
        })
    }

    /// Decode the inner identifier document.
    pub fn channel_identifier(&self) -> Result<ChannelIdentifier, serde_json::Error> {
        serde_json::from_str(&self.identifier)
    }

    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// One decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    /// Relay heartbeat.
    Keepalive,
    /// The relay accepted a subscribe command.
    SubscriptionAck,
    /// A published payload, not yet validated against any topic.
    Data(Value),
    /// Other typed protocol frames (`welcome`, `disconnect`,
    /// `reject_subscription`, ...).
    Control(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame is not a JSON object")]
    NotAnObject,
    #[error("frame has neither a type nor a message")]
    Empty,
}

impl InboundFrame {
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, FrameError> {
        let Value::Object(mut map) = value else {
            return Err(FrameError::NotAnObject);
        };

        let kind = map.get("type").and_then(Value::as_str).map(str::to_string);

        match kind.as_deref() {
            Some(TYPE_PING) => return Ok(InboundFrame::Keepalive),
            Some(TYPE_CONFIRM_SUBSCRIPTION) => return Ok(InboundFrame::SubscriptionAck),
            _ => {}
        }

        match (map.remove("message"), kind) {
            (Some(message), _) if !message.is_null() => Ok(InboundFrame::Data(message)),
            (_, Some(kind)) => Ok(InboundFrame::Control(kind)),
            (_, None) => Err(FrameError::Empty),
        }
    }

    pub fn is_protocol(&self) -> bool {
        !matches!(self, InboundFrame::Data(_))
    }
}
