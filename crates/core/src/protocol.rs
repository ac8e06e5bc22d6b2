//! Event protocol types
//!
//! Every message on the persistent connection is a tagged JSON envelope
//! `{"event": ..., "data": ...}`. Frame bytes travel base64-encoded inside
//! the envelope. The protocol is fire-and-forget: no event carries an
//! acknowledgment, and a dropped frame is visible only as the absence of a
//! corresponding broadcast.

use crate::sessions::SessionId;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Events a client sends to the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Set the global detection mode
    ModeChange {
        enabled: bool,
    },
    /// One encoded frame; detection is applied iff the mode is enabled
    Frame {
        #[serde(with = "base64_bytes")]
        data: Bytes,
    },
    /// One-shot detection request, answered only to the requester and
    /// independent of the global mode
    DetectFrame {
        #[serde(with = "base64_bytes")]
        data: Bytes,
    },
}

/// Events the relay sends to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Echo of the new mode to every session, including the requester, so
    /// each client holds the authoritative value
    ModeChanged {
        enabled: bool,
    },
    /// Relayed frame with its detection verdict
    StreamFrame {
        #[serde(with = "base64_bytes")]
        data: Bytes,
        #[serde(rename = "objectDetected")]
        object_detected: bool,
    },
    /// Reply to a `detect-frame` request
    DetectionResult {
        #[serde(rename = "objectDetected")]
        object_detected: bool,
    },
    /// A new participant joined the stream
    SessionConnected {
        #[serde(rename = "sessionId")]
        session_id: SessionId,
    },
    /// A participant left the stream
    SessionDisconnected {
        #[serde(rename = "sessionId")]
        session_id: SessionId,
    },
}

/// Base64 transport encoding for opaque frame bytes inside JSON envelopes
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
