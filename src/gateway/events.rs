use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::session::{GatewayUser, Session};
use super::GatewayError;
use crate::models::message::ChannelMessage;

/// Opcodes for gateway frames.
pub mod opcode {
    pub const DISPATCH: u8 = 0;
    pub const HEARTBEAT: u8 = 1;
    pub const IDENTIFY: u8 = 2;
    pub const RESUME: u8 = 4;
    pub const RECONNECT: u8 = 6;
    pub const INVALID_SESSION: u8 = 9;
    pub const HELLO: u8 = 10;
    pub const HEARTBEAT_ACK: u8 = 11;
    pub const HTTP_CALLBACK_ACK: u8 = 12;
}

/// Event-type strings the client decodes eagerly.
pub mod event_type {
    pub const READY: &str = "READY";
    pub const AT_MESSAGE_CREATE: &str = "AT_MESSAGE_CREATE";
}

/// Wire envelope for one gateway frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub op: u8,
    #[serde(rename = "s", skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    #[serde(rename = "t", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(rename = "d", skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Original frame text, retained so payloads can be re-decoded per event
    /// type without re-serializing.
    #[serde(skip)]
    pub raw: String,
}

impl Envelope {
    /// Parses one text frame. Unknown fields are ignored; anything that is
    /// not a JSON envelope is a `Decode` error and the frame must be skipped.
    pub fn decode(text: &str) -> Result<Envelope, GatewayError> {
        let mut envelope: Envelope = serde_json::from_str(text).map_err(GatewayError::Decode)?;
        envelope.raw = text.to_string();
        Ok(envelope)
    }

    pub fn encode(&self) -> Result<String, GatewayError> {
        serde_json::to_string(self).map_err(GatewayError::Decode)
    }

    /// Decodes the `d` payload into a concrete shape.
    pub fn data_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, GatewayError> {
        let data = self.data.clone().unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(GatewayError::Decode)
    }

    /// Heartbeat frame: fixed opcode, no payload.
    pub fn heartbeat() -> Envelope {
        Envelope {
            op: opcode::HEARTBEAT,
            seq: None,
            event_type: None,
            data: None,
            raw: String::new(),
        }
    }

    /// Identify frame carrying the rendered credential, the capability mask
    /// and this connection's shard pair.
    pub fn identify(session: &Session) -> Result<Envelope, GatewayError> {
        let data = serde_json::to_value(IdentifyData {
            token: session.token.render(),
            intents: session.intents,
            shard: [session.shards.shard_id, session.shards.shard_count],
        })
        .map_err(GatewayError::Decode)?;
        Ok(Envelope {
            op: opcode::IDENTIFY,
            seq: None,
            event_type: None,
            data: Some(data),
            raw: String::new(),
        })
    }
}

/// HELLO payload (opcode 10), carrying the heartbeat interval in
/// milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloData {
    pub heartbeat_interval: u64,
}

/// IDENTIFY payload (opcode 2).
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentifyData {
    pub token: String,
    pub intents: super::intents::Intents,
    pub shard: [u32; 2],
}

/// READY payload, delivered as the first dispatch after authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyData {
    pub version: Option<u32>,
    pub session_id: String,
    pub user: GatewayUser,
    #[serde(default)]
    pub shard: Vec<u32>,
}

/// Business payload decoded from an envelope, keyed by its event type.
#[derive(Debug, Clone)]
pub enum Event {
    Ready(ReadyData),
    AtMessageCreate(Box<ChannelMessage>),
    /// Event type without a known shape; the payload stays in the envelope
    /// for callers that want to decode it themselves.
    Unknown(String),
}

impl Event {
    /// Lazily decodes the payload for the envelope's event type. Returns
    /// `None` for frames without an event type (protocol acks and other
    /// control traffic).
    pub fn from_envelope(envelope: &Envelope) -> Result<Option<Event>, GatewayError> {
        let Some(ty) = envelope.event_type.as_deref() else {
            return Ok(None);
        };
        let event = match ty {
            event_type::READY => Event::Ready(envelope.data_as()?),
            event_type::AT_MESSAGE_CREATE => Event::AtMessageCreate(Box::new(envelope.data_as()?)),
            other => Event::Unknown(other.to_string()),
        };
        Ok(Some(event))
    }
}
