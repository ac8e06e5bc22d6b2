//! Detection gate: size-thresholded filtering policy
//!
//! A raw "is the class present at all" check fires on distant, irrelevant
//! objects. The gate instead requires the detected box to cover a minimum
//! fraction of the frame area, approximating "close / significant enough
//! to matter".

use crate::error::{Error, Result};
use crate::frame::Detection;
use serde::{Deserialize, Serialize};

/// Configuration for the detection gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Class label that counts as the object of interest
    #[serde(default = "default_target_label")]
    pub target_label: String,
    /// Minimum box area as a fraction of frame area, in (0, 1]
    #[serde(default = "default_min_area_fraction")]
    pub min_area_fraction: f64,
}

fn default_target_label() -> String {
    "car".to_string()
}

fn default_min_area_fraction() -> f64 {
    0.1
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            target_label: default_target_label(),
            min_area_fraction: default_min_area_fraction(),
        }
    }
}

impl GateConfig {
    /// Validate configuration bounds
    pub fn validate(&self) -> Result<()> {
        if self.target_label.is_empty() {
            return Err(Error::InvalidConfig("target_label must not be empty".into()));
        }
        if !(self.min_area_fraction > 0.0 && self.min_area_fraction <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "min_area_fraction must lie in (0, 1], got {}",
                self.min_area_fraction
            )));
        }
        Ok(())
    }
}

/// Applies the size-threshold policy to a detector's raw output, producing
/// a single boolean "object-of-interest present" verdict per frame.
#[derive(Debug, Clone)]
pub struct DetectionGate {
    config: GateConfig,
}

impl DetectionGate {
    pub fn new(config: GateConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Evaluate one frame's detections against the size threshold.
    ///
    /// Returns true as soon as any detection matches the target label with
    /// `box_area >= frame_area * min_area_fraction`; the order of the
    /// detection list never changes the result. Zero frame dimensions are a
    /// precondition violation and fail the request, not the process.
    pub fn evaluate(
        &self,
        detections: &[Detection],
        frame_width: u32,
        frame_height: u32,
    ) -> Result<bool> {
        if frame_width == 0 || frame_height == 0 {
            return Err(Error::InvalidFrameDimensions {
                width: frame_width,
                height: frame_height,
            });
        }

        let frame_area = f64::from(frame_width) * f64::from(frame_height);
        let min_area = frame_area * self.config.min_area_fraction;

        Ok(detections
            .iter()
            .filter(|d| d.label == self.config.target_label)
            .any(|d| d.bbox.area() as f64 >= min_area))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::BoundingBox;

    fn gate() -> DetectionGate {
        DetectionGate::new(GateConfig::default()).unwrap()
    }

    fn car(xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> Detection {
        Detection::new("car", 0.9, BoundingBox::new(xmin, ymin, xmax, ymax).unwrap())
    }

    #[test]
    fn test_empty_detections_is_false() {
        assert!(!gate().evaluate(&[], 1000, 1000).unwrap());
    }

    #[test]
    fn test_qualifying_detection_is_true() {
        // 1000x1000 frame, threshold 100,000 px²; 400x400 box = 160,000 px²
        let detections = vec![car(0, 0, 400, 400)];
        assert!(gate().evaluate(&detections, 1000, 1000).unwrap());
    }

    #[test]
    fn test_undersized_detection_is_false() {
        // 200x200 box = 40,000 px², below the 100,000 px² threshold
        let detections = vec![car(0, 0, 200, 200)];
        assert!(!gate().evaluate(&detections, 1000, 1000).unwrap());
    }

    #[test]
    fn test_wrong_label_never_qualifies() {
        let detections = vec![Detection::new(
            "person",
            0.99,
            BoundingBox::new(0, 0, 1000, 1000).unwrap(),
        )];
        assert!(!gate().evaluate(&detections, 1000, 1000).unwrap());
    }

    #[test]
    fn test_qualifying_detection_wins_among_noise() {
        let detections = vec![
            Detection::new("person", 0.8, BoundingBox::new(0, 0, 50, 50).unwrap()),
            car(0, 0, 100, 100),
            car(100, 100, 600, 600),
        ];
        assert!(gate().evaluate(&detections, 1000, 1000).unwrap());
    }

    #[test]
    fn test_order_independence() {
        let mut detections = vec![
            car(0, 0, 150, 150),
            Detection::new("dog", 0.7, BoundingBox::new(5, 5, 900, 900).unwrap()),
            car(0, 0, 450, 450),
        ];
        let forward = gate().evaluate(&detections, 1000, 1000).unwrap();
        detections.reverse();
        let reversed = gate().evaluate(&detections, 1000, 1000).unwrap();
        assert_eq!(forward, reversed);
        assert!(forward);
    }

    #[test]
    fn test_exact_threshold_qualifies() {
        // Box area exactly equal to the threshold counts as qualifying
        let detections = vec![car(0, 0, 100, 1000)];
        assert!(gate().evaluate(&detections, 1000, 1000).unwrap());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let err = gate().evaluate(&[], 0, 1080).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidFrameDimensions { width: 0, height: 1080 }
        ));
    }

    #[test]
    fn test_config_validation() {
        let mut config = GateConfig::default();
        assert!(config.validate().is_ok());

        config.min_area_fraction = 0.0;
        assert!(config.validate().is_err());

        config.min_area_fraction = 1.5;
        assert!(config.validate().is_err());

        config.min_area_fraction = 1.0;
        assert!(config.validate().is_ok());

        config.target_label = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_custom_target_label() {
        let gate = DetectionGate::new(GateConfig {
            target_label: "bicycle".to_string(),
            min_area_fraction: 0.05,
        })
        .unwrap();
        let detections = vec![Detection::new(
            "bicycle",
            0.6,
            BoundingBox::new(0, 0, 300, 300).unwrap(),
        )];
        assert!(gate.evaluate(&detections, 1000, 1000).unwrap());
    }
}
