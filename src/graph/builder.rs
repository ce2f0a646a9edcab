//! Pose-graph construction: origin bootstrap, per-frame ingestion and
//! anchor-based resolution of newly sighted markers.
//!
//! The builder is driven once per frame with the detector output. It keeps
//! no state of its own; the whole pose graph lives in the registry. Each
//! frame runs in two passes:
//!
//! 1. refresh: every qualifying detection finds or allocates its slot,
//!    is marked visible and gets its camera pose updated;
//! 2. resolve: slots that do not yet have a place in the tree are chained
//!    onto the first visible resolved slot, fixing their relative and
//!    global poses permanently.
//!
//! Splitting the passes guarantees resolution always composes with the
//! anchor's camera pose from the *current* frame, regardless of detection
//! order.

use tracing::{debug, info, warn};

use crate::config::{SpaceMode, SystemConfig};
use crate::detect::Detection;
use crate::geometry::{project_to_plane, Rigid3};
use crate::registry::{MarkerId, MarkerRegistry, Parent, SlotId};

/// Per-frame pose-graph orchestration.
pub struct PoseGraphBuilder {
    id_modulus: u32,
    space: SpaceMode,
}

impl PoseGraphBuilder {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            id_modulus: config.id_modulus,
            space: config.space,
        }
    }

    /// A detection takes part in chaining only if its ID is a multiple of
    /// the configured modulus. A modulus of zero admits every ID.
    fn qualifies(&self, id: MarkerId) -> bool {
        self.id_modulus == 0 || id.0 % self.id_modulus == 0
    }

    /// Ingest one frame of detections into the registry.
    ///
    /// `registry.begin_frame()` must have been called for this frame.
    pub fn ingest(&self, registry: &mut MarkerRegistry, detections: &[Detection]) {
        let mut qualifying: Vec<Detection> = detections
            .iter()
            .copied()
            .filter(|det| self.qualifies(det.id))
            .collect();
        qualifying.sort_by_key(|det| det.id);

        if qualifying.is_empty() {
            debug!("no qualifying markers in frame");
            return;
        }

        self.bootstrap_origin(registry, &qualifying);

        let mut unresolved: Vec<SlotId> = Vec::new();
        for det in &qualifying {
            let slot = match registry.find(det.id) {
                Some(slot) => slot,
                None => match registry.allocate(det.id) {
                    Ok(slot) => {
                        info!(id = det.id.0, %slot, "new marker sighted");
                        slot
                    }
                    Err(err) => {
                        warn!(id = det.id.0, "{err}; detection ignored");
                        continue;
                    }
                },
            };
            let Some(record) = registry.get_mut(slot) else {
                continue;
            };
            record.active = true;
            if record.is_resolved() {
                // Detector reports T_camera_marker; resolved slots store
                // the camera-in-marker convention.
                record.camera_pose = det.pose.inverse();
            } else {
                // Pending slots keep the raw pose; it is the resolution
                // input and gets inverted once the slot is chained.
                record.camera_pose = det.pose;
                unresolved.push(slot);
            }
        }

        for slot in unresolved {
            self.try_resolve(registry, slot);
        }
    }

    /// Seed the pose tree on the first frame with a qualifying detection:
    /// the minimum-ID marker becomes the origin, aligned with the world
    /// frame.
    fn bootstrap_origin(&self, registry: &mut MarkerRegistry, qualifying: &[Detection]) {
        if registry.origin().is_some() {
            return;
        }
        // `qualifying` is sorted, so the first entry carries the lowest ID.
        let Some(first) = qualifying.first() else {
            return;
        };
        let slot = match registry.allocate(first.id) {
            Ok(slot) => slot,
            Err(err) => {
                warn!(id = first.id.0, "{err}; cannot seed origin");
                return;
            }
        };
        if let Some(record) = registry.get_mut(slot) {
            record.resolve(Parent::World, Rigid3::identity(), Rigid3::identity());
            record.active = true;
            info!(id = first.id.0, %slot, "origin marker fixed");
        }
    }

    /// Chain an unresolved slot onto an anchor, fixing its relative and
    /// global poses. If no anchor is visible this frame, the slot stays
    /// pending and retries on a later frame.
    fn try_resolve(&self, registry: &mut MarkerRegistry, slot: SlotId) {
        // Ascending-index scan; the first slot that is both visible and
        // resolved becomes the parent.
        let anchor = registry.iter().find_map(|(candidate, rec)| {
            if !rec.active {
                return None;
            }
            let global = rec.global_pose()?;
            Some((candidate, rec.camera_pose, *global))
        });
        let Some((parent, parent_camera, parent_global)) = anchor else {
            debug!(%slot, "no visible resolved anchor; resolution deferred");
            return;
        };

        let Some(record) = registry.get(slot) else {
            return;
        };
        let id = record.id;
        // T_camera_marker, stored by the refresh pass while pending.
        let reported = record.camera_pose;

        // T_parent_marker = T_parent_camera ∘ T_camera_marker
        let mut relative = parent_camera.compose(&reported);
        if self.space == SpaceMode::Plane {
            relative = project_to_plane(&relative);
        }
        let global = parent_global.compose(&relative);

        if let Some(record) = registry.get_mut(slot) {
            record.resolve(Parent::Slot(parent), relative, global);
            record.camera_pose = reported.inverse();
            info!(id = id.0, %slot, %parent, "marker resolved");
        }
    }
}
