//! Detector-facing input types.
//!
//! Marker detection itself (corner finding, ID decoding, PnP) runs outside
//! this crate; the system consumes its output as one [`DetectionFrame`]
//! per image.

use crate::geometry::Rigid3;
use crate::registry::MarkerId;

/// A single detected marker: decoded ID plus the marker's pose expressed
/// in the camera frame (T_camera_marker).
#[derive(Debug, Clone, Copy)]
pub struct Detection {
    pub id: MarkerId,
    pub pose: Rigid3,
}

/// All detections from one image, sorted ascending by ID by the detector.
#[derive(Debug, Clone, Default)]
pub struct DetectionFrame {
    pub timestamp_ns: u64,
    pub detections: Vec<Detection>,
}

impl DetectionFrame {
    pub fn new(timestamp_ns: u64, detections: Vec<Detection>) -> Self {
        Self {
            timestamp_ns,
            detections,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}
