//! System orchestration: configuration, pipeline and run loop.

pub mod positioning;

pub use positioning::{PositioningSystem, FRAME_CHANNEL_CAPACITY};
