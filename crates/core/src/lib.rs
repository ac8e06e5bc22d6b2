//! Core library for the Streamlens frame relay.
//!
//! Streamlens relays a live video stream, frame by frame, from any connected
//! session to every other connected session, optionally annotating each frame
//! with a detection verdict ("an object of interest above a minimum size is
//! present"). This crate holds everything transport-agnostic:
//!
//! - the data model ([`SessionId`], [`Detection`], [`PixelBuffer`], ...)
//! - the [`gate::DetectionGate`] size-threshold policy
//! - the [`sessions::SessionRegistry`] connection tracker
//! - the [`relay::Relay`] event engine and its [`relay::Broadcaster`] seam
//! - the collaborator contracts ([`detector::Detector`], [`codec::FrameCodec`])
//!
//! Transports (see `streamlens-ws`) own the wire and implement `Broadcaster`;
//! the object-detection model stays behind the `Detector` trait.

pub mod codec;
pub mod detector;
pub mod error;
pub mod frame;
pub mod gate;
pub mod mode;
pub mod protocol;
pub mod relay;
pub mod sessions;

pub use codec::{FrameCodec, ImageCodec};
pub use detector::{Detector, StubDetector};
pub use error::{Error, Result};
pub use frame::{BoundingBox, Detection, PixelBuffer};
pub use gate::{DetectionGate, GateConfig};
pub use mode::StreamMode;
pub use protocol::{ClientEvent, ServerEvent};
pub use relay::{Broadcaster, Relay};
pub use sessions::{Session, SessionId, SessionRegistry};
