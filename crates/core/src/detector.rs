//! Object detector seam
//!
//! The detection model is a black box to the relay: given a decoded frame it
//! returns labeled bounding boxes, nothing more. How the model is trained or
//! executed is not this crate's concern.

use crate::error::Result;
use crate::frame::{Detection, PixelBuffer};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Detector contract consumed by the relay.
///
/// Fails with [`crate::Error::Inference`] if the model cannot process the
/// buffer (e.g. wrong channel count); the relay logs and drops the frame.
/// No timeout is imposed on a single invocation at this layer.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, frame: &PixelBuffer) -> Result<Vec<Detection>>;
}

/// Placeholder detector returning a fixed detection list.
///
/// Stands in until a model backend is wired up, and doubles as the test
/// double: the call counter lets tests assert the detector was (or was not)
/// invoked.
#[derive(Debug, Default)]
pub struct StubDetector {
    detections: Vec<Detection>,
    calls: AtomicUsize,
}

impl StubDetector {
    /// Detector that reports nothing in any frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector that reports the given detections for every frame
    pub fn with_detections(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `detect` has been invoked
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Detector for StubDetector {
    async fn detect(&self, _frame: &PixelBuffer) -> Result<Vec<Detection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.detections.clone())
    }
}
