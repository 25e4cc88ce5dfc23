//! JSON frames exchanged with clients.
//!
//! Server to client: `{"type": "output", "data": <message>}` and
//! `{"type": "disconnect", "data": null}`.
//! Client to server: `{"type": "message", "data": "<command>"}` and
//! `{"type": "disconnect"}`.

use mr_core::Message;
use serde::{Deserialize, Serialize};

use crate::error::RuntimeResult;

/// What a server frame carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    /// A message to display.
    Output,
    /// The server is closing this connection.
    Disconnect,
}

/// A frame sent to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Frame type.
    #[serde(rename = "type")]
    pub kind: FrameKind,
    /// The message, for output frames.
    pub data: Option<Message>,
}

impl Frame {
    /// An output frame.
    pub fn output(message: Message) -> Self {
        Self {
            kind: FrameKind::Output,
            data: Some(message),
        }
    }

    /// A disconnect frame.
    pub fn disconnect() -> Self {
        Self {
            kind: FrameKind::Disconnect,
            data: None,
        }
    }

    /// Encode as JSON text.
    pub fn to_json(&self) -> RuntimeResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A frame received from a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ClientFrame {
    /// A line of command text.
    Message(String),
    /// The client is leaving.
    Disconnect,
}

impl ClientFrame {
    /// Decode from JSON text.
    pub fn from_json(json: &str) -> RuntimeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
