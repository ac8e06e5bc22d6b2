//! Process-wide stream mode
//!
//! The protocol's "set once, observed by all" semantics call for a single
//! global flag. It lives behind an atomic so concurrent frame handlers can
//! never observe a torn value; each frame reads it exactly once at the start
//! of processing.

use std::sync::atomic::{AtomicBool, Ordering};

/// Whether incoming frames are run through the detector.
///
/// Mutated only by a mode-change event from any connected session; read by
/// the relay on every frame. Readers always observe the most recently set
/// value.
#[derive(Debug, Default)]
pub struct StreamMode {
    detection_enabled: AtomicBool,
}

impl StreamMode {
    /// New mode with detection disabled (the relay's idle default)
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace the mode, returning the previous value
    pub fn set_detection_enabled(&self, enabled: bool) -> bool {
        self.detection_enabled.swap(enabled, Ordering::SeqCst)
    }

    /// Atomically read the current mode
    pub fn detection_enabled(&self) -> bool {
        self.detection_enabled.load(Ordering::SeqCst)
    }
}
