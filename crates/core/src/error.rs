//! Error types for the Streamlens relay

use thiserror::Error;

/// Result type alias for Streamlens operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while relaying a stream.
///
/// Propagation policy: nothing here crosses session boundaries. A failure
/// while processing one session's message is logged and the message dropped;
/// other sessions' streams continue. Only an unrecoverable startup failure
/// (e.g. the listen address cannot be bound) terminates the process.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure, surfaced only to the affected session
    #[error("Connection error: {0}")]
    Connection(String),

    /// Missing or empty frame/mode field in an inbound event
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Frame codec could not decode the payload
    #[error("Decode error: {0}")]
    Decode(String),

    /// Detector could not process the pixel buffer
    #[error("Inference error: {0}")]
    Inference(String),

    /// Gate precondition violation: zero-sized frame dimensions
    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidFrameDimensions {
        /// Reported frame width in pixels
        width: u32,
        /// Reported frame height in pixels
        height: u32,
    },

    /// Startup configuration error
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
