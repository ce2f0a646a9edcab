//! Marker registry: the fixed-capacity store of pose-graph slots.
//!
//! This module contains:
//! - [`MarkerRecord`] - Per-marker state: visibility, camera pose, frozen chain poses
//! - [`MarkerRegistry`] - Arena container keyed by marker ID
//! - [`MarkerId`] / [`SlotId`] - Lightweight typed handles
//!
//! Slots form a tree through [`Parent`] edges: exactly one slot is parented
//! to the world frame (the origin) and every other resolved slot chains to
//! an earlier-resolved one. Parent edges are set once and never change.

pub mod record;
pub mod registry;
pub mod types;

pub use record::{MarkerRecord, Parent};
pub use registry::{MarkerRegistry, RegistryError};
pub use types::{MarkerId, SlotId};
