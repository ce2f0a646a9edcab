//! Pose-graph construction from per-frame marker detections.

pub mod builder;

pub use builder::PoseGraphBuilder;
