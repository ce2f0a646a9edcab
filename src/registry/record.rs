//! Per-marker bookkeeping: pose state machine and frozen chain poses.

use crate::geometry::Rigid3;

use super::types::{MarkerId, SlotId};

/// The parent frame a resolved marker is chained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// Defined directly against the world frame (the origin marker).
    World,
    /// Chained onto the marker held in the given slot.
    Slot(SlotId),
}

/// Resolution state of a slot.
///
/// A slot is created `Pending` and moves to `Resolved` exactly once; the
/// parent edge and both frozen poses live inside the `Resolved` variant so
/// they cannot exist, or change, outside it.
#[derive(Debug, Clone)]
enum Resolution {
    Pending,
    Resolved {
        parent: Parent,
        /// Pose of this marker in the parent's frame, fixed at resolution.
        relative: Rigid3,
        /// Pose of this marker in the world frame, fixed at resolution.
        global: Rigid3,
    },
}

/// One registry slot: a distinct qualifying marker and everything known
/// about it.
#[derive(Debug, Clone)]
pub struct MarkerRecord {
    /// Decoded tag ID.
    pub id: MarkerId,

    /// True iff the marker was detected in the current frame.
    /// Cleared by `MarkerRegistry::begin_frame`.
    pub active: bool,

    /// Camera pose in this marker's frame (T_marker_camera) once the slot
    /// is resolved. While the slot is pending it transiently holds the raw
    /// detector pose (T_camera_marker), which is the resolution input.
    pub camera_pose: Rigid3,

    resolution: Resolution,
}

impl MarkerRecord {
    /// New unresolved record for a first-sighted marker.
    pub(crate) fn new(id: MarkerId) -> Self {
        Self {
            id,
            active: false,
            camera_pose: Rigid3::identity(),
            resolution: Resolution::Pending,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.resolution, Resolution::Resolved { .. })
    }

    /// Parent frame, if resolved.
    pub fn parent(&self) -> Option<Parent> {
        match self.resolution {
            Resolution::Pending => None,
            Resolution::Resolved { parent, .. } => Some(parent),
        }
    }

    /// Frozen pose relative to the parent frame, if resolved.
    pub fn relative_pose(&self) -> Option<&Rigid3> {
        match &self.resolution {
            Resolution::Pending => None,
            Resolution::Resolved { relative, .. } => Some(relative),
        }
    }

    /// Frozen pose in the world frame, if resolved.
    pub fn global_pose(&self) -> Option<&Rigid3> {
        match &self.resolution {
            Resolution::Pending => None,
            Resolution::Resolved { global, .. } => Some(global),
        }
    }

    /// Fix the parent edge and both chain poses. Must be called at most
    /// once per slot; the poses never change afterwards.
    pub(crate) fn resolve(&mut self, parent: Parent, relative: Rigid3, global: Rigid3) {
        debug_assert!(!self.is_resolved(), "slot resolved twice");
        self.resolution = Resolution::Resolved {
            parent,
            relative,
            global,
        };
    }
}
