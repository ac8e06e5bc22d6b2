//! Frame and detection data types

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in pixel coordinates.
///
/// Invariant: `xmin < xmax` and `ymin < ymax`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: u32,
    pub ymin: u32,
    pub xmax: u32,
    pub ymax: u32,
}

impl BoundingBox {
    /// Create a bounding box. Returns `None` if the corners are not ordered.
    pub fn new(xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> Option<Self> {
        if xmin < xmax && ymin < ymax {
            Some(Self {
                xmin,
                ymin,
                xmax,
                ymax,
            })
        } else {
            None
        }
    }

    /// Box area in square pixels
    pub fn area(&self) -> u64 {
        u64::from(self.xmax - self.xmin) * u64::from(self.ymax - self.ymin)
    }
}

/// One labeled bounding box output by the detector for a single frame.
///
/// Produced transiently per frame and never persisted past the gate decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Class label, e.g. "car"
    pub label: String,
    /// Detector confidence in [0, 1]
    pub confidence: f32,
    /// Box location in pixel coordinates
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }
}

/// Decoded frame: raw RGB8 pixels with known dimensions.
///
/// Output of the frame codec, input to the detector.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    /// Interleaved RGB8 pixel data, `width * height * 3` bytes
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_area() {
        let bbox = BoundingBox::new(0, 0, 400, 400).unwrap();
        assert_eq!(bbox.area(), 160_000);
    }

    #[test]
    fn test_bounding_box_rejects_unordered_corners() {
        assert!(BoundingBox::new(400, 0, 400, 400).is_none());
        assert!(BoundingBox::new(0, 300, 400, 300).is_none());
        assert!(BoundingBox::new(10, 10, 5, 20).is_none());
    }
}
