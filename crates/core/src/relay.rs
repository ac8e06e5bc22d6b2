//! Streaming relay: the event-driven protocol engine
//!
//! The relay receives mode-change events and frames, routes frames through
//! the detector and gate when the mode requires it, and fans the results out
//! through the [`Broadcaster`] seam the transport implements. It has no
//! terminal state: sessions come and go while the shared mode persists until
//! process shutdown.

use crate::codec::FrameCodec;
use crate::detector::Detector;
use crate::error::Result;
use crate::gate::DetectionGate;
use crate::mode::StreamMode;
use crate::protocol::ServerEvent;
use crate::sessions::SessionId;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Publish primitive the transport provides: best-effort fan-out to all
/// currently connected sessions, or delivery to one.
///
/// A session that disconnects between snapshot and delivery simply misses
/// the message; no error reaches the publisher. No acknowledgment, no retry,
/// no ordering guarantee across distinct receivers.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Deliver `event` to every active session except `exclude`
    async fn publish(&self, event: ServerEvent, exclude: Option<SessionId>);

    /// Deliver `event` to a single session, if it is still connected
    async fn publish_to(&self, target: SessionId, event: ServerEvent);
}

/// The protocol engine.
///
/// Each inbound event is an independent unit of work; the only shared state
/// is the stream mode, read atomically once per frame. Per-frame decode +
/// detect + gate work holds no locks and runs fully in parallel across
/// senders. Errors never escape: every failure path ends in a log entry and
/// a dropped message, so no session's mistake can stall another's stream.
pub struct Relay {
    mode: StreamMode,
    gate: DetectionGate,
    codec: Arc<dyn FrameCodec>,
    detector: Arc<dyn Detector>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl Relay {
    pub fn new(
        gate: DetectionGate,
        codec: Arc<dyn FrameCodec>,
        detector: Arc<dyn Detector>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        Self {
            mode: StreamMode::new(),
            gate,
            codec,
            detector,
            broadcaster,
        }
    }

    /// Current detection mode (idle default: disabled)
    pub fn detection_enabled(&self) -> bool {
        self.mode.detection_enabled()
    }

    /// Handle a mode-change event: store the new mode, then echo it to every
    /// active session including the requester.
    pub async fn on_mode_change(&self, requester: SessionId, enabled: bool) {
        let previous = self.mode.set_detection_enabled(enabled);
        info!(%requester, enabled, previous, "stream mode changed");
        self.broadcaster
            .publish(ServerEvent::ModeChanged { enabled }, None)
            .await;
    }

    /// Handle one inbound frame.
    ///
    /// Mode disabled: straight relay, no detection cost. Mode enabled:
    /// decode, detect, gate, then relay with the verdict. A frame that is
    /// empty or fails decoding/inference is dropped without a broadcast; the
    /// raw frame is still relayed (verdict false) when the object is merely
    /// absent or undersized, keeping the video stream continuous.
    pub async fn on_frame(&self, sender: SessionId, data: Bytes) {
        if data.is_empty() {
            warn!(%sender, "dropping frame with empty payload");
            return;
        }

        // Single atomic read per frame; concurrent mode changes apply to
        // subsequent frames, never mid-frame.
        let object_detected = if self.mode.detection_enabled() {
            match self.evaluate_frame(&data).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    warn!(%sender, error = %e, "dropping undecodable frame");
                    return;
                }
            }
        } else {
            false
        };

        debug!(%sender, bytes = data.len(), object_detected, "relaying frame");
        self.broadcaster
            .publish(
                ServerEvent::StreamFrame {
                    data,
                    object_detected,
                },
                None,
            )
            .await;
    }

    /// Handle a one-shot detection request: run the detection pipeline
    /// regardless of the global mode and answer only the requester.
    pub async fn on_detect_request(&self, requester: SessionId, data: Bytes) {
        if data.is_empty() {
            warn!(%requester, "dropping detect request with empty payload");
            return;
        }

        match self.evaluate_frame(&data).await {
            Ok(object_detected) => {
                self.broadcaster
                    .publish_to(requester, ServerEvent::DetectionResult { object_detected })
                    .await;
            }
            Err(e) => {
                warn!(%requester, error = %e, "dropping undecodable detect request");
            }
        }
    }

    async fn evaluate_frame(&self, data: &[u8]) -> Result<bool> {
        let pixels = self.codec.decode(data)?;
        let detections = self.detector.detect(&pixels).await?;
        self.gate.evaluate(&detections, pixels.width, pixels.height)
    }
}
