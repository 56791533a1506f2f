//! Wire envelope exchanged between the host page and the embedded client.
//!
//! Every message crossing the frame boundary is a JSON object of the form
//! `{ type, scope, action, name, payload, version }`. `type` carries the
//! protocol namespace so receivers can ignore unrelated `postMessage`
//! traffic on the same window.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol tag carried in the `type` field of every envelope.
pub const NAMESPACE: &str = "mirotalk.iframe";

/// Protocol version carried in every envelope.
pub const PROTOCOL_VERSION: u32 = 1;

/// Target origin meaning "any origin" for outbound posts.
pub const WILDCARD_ORIGIN: &str = "*";

/// Handshake message names.
pub mod handshake {
    /// Child → host: the embedded client is listening.
    pub const READY: &str = "ready";
    /// Host → child: the host saw `ready`.
    pub const ACK: &str = "ack";
}

/// Event names, child → host.
pub mod events {
    /// Emitted locally on the host once the handshake completes.
    pub const READY: &str = "ready";
    pub const JOINED: &str = "joined";
    pub const TOOLBAR_CLICK: &str = "toolbar.click";
    pub const SCREEN_SHARE: &str = "screen.share";
}

/// Which side of the frame boundary sent the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Parent,
    Child,
}

/// Sub-protocol of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Handshake,
    Command,
    Event,
}

/// Why an inbound message was not accepted as an envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("message is not an object")]
    NotObject,
    #[error("foreign namespace")]
    ForeignNamespace,
    #[error("malformed envelope: {0}")]
    Malformed(String),
    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(u32),
}

fn empty_payload() -> Value {
    Value::Object(serde_json::Map::new())
}

/// A single protocol message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub namespace: String,
    pub scope: Scope,
    pub action: Action,
    pub name: String,
    /// Missing or `null` on the wire reads as `{}`.
    #[serde(default = "empty_payload")]
    pub payload: Value,
    pub version: u32,
}

impl Envelope {
    /// Build an envelope in the current namespace and version. A `null`
    /// payload is normalized to an empty object.
    pub fn new(scope: Scope, action: Action, name: impl Into<String>, payload: Value) -> Self {
        let payload = if payload.is_null() {
            empty_payload()
        } else {
            payload
        };
        Self {
            namespace: NAMESPACE.to_string(),
            scope,
            action,
            name: name.into(),
            payload,
            version: PROTOCOL_VERSION,
        }
    }

    /// Host → child command.
    pub fn command(name: impl Into<String>, payload: Value) -> Self {
        Self::new(Scope::Parent, Action::Command, name, payload)
    }

    /// Child → host event.
    pub fn event(name: impl Into<String>, payload: Value) -> Self {
        Self::new(Scope::Child, Action::Event, name, payload)
    }

    /// Handshake message from either side. Handshakes carry no payload.
    pub fn handshake(scope: Scope, name: impl Into<String>) -> Self {
        Self::new(scope, Action::Handshake, name, Value::Null)
    }

    /// Validate and decode an inbound message.
    ///
    /// The namespace is checked before anything else so unrelated page
    /// traffic is rejected cheaply.
    pub fn parse(data: &Value) -> Result<Self, Rejection> {
        let object = data.as_object().ok_or(Rejection::NotObject)?;
        if object.get("type").and_then(Value::as_str) != Some(NAMESPACE) {
            return Err(Rejection::ForeignNamespace);
        }
        let mut envelope =
            Envelope::deserialize(data).map_err(|e| Rejection::Malformed(e.to_string()))?;
        if envelope.version != PROTOCOL_VERSION {
            return Err(Rejection::UnsupportedVersion(envelope.version));
        }
        if envelope.payload.is_null() {
            envelope.payload = empty_payload();
        }
        Ok(envelope)
    }

    /// Encode for `postMessage`.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn is(&self, action: Action, name: &str) -> bool {
        self.action == action && self.name == name
    }
}
