//! Camera localization against the nearest visible resolved marker.
//!
//! Detection noise grows with distance, so of all markers visible in the
//! frame the closest one gives the lowest-noise camera estimate.

use crate::geometry::Rigid3;
use crate::registry::{MarkerRegistry, SlotId};

/// A successful camera fix for one frame.
#[derive(Debug, Clone, Copy)]
pub struct CameraFix {
    /// Slot used as the localization anchor.
    pub anchor: SlotId,
    /// Device pose in the world frame (T_world_camera).
    pub pose: Rigid3,
}

/// Derive the device's global pose from the nearest visible resolved
/// marker. Ties on distance go to the lowest slot index. Returns `None`
/// when no visible marker has a global pose to chain from.
pub fn localize(registry: &MarkerRegistry) -> Option<CameraFix> {
    let mut best: Option<(SlotId, f64)> = None;

    for (slot, record) in registry.active() {
        if !record.is_resolved() {
            continue;
        }
        let distance = record.camera_pose.translation_norm();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((slot, distance)),
        }
    }

    let (anchor, _) = best?;
    let record = registry.get(anchor)?;
    let global = record.global_pose()?;

    // T_world_camera = T_world_marker ∘ T_marker_camera
    Some(CameraFix {
        anchor,
        pose: global.compose(&record.camera_pose),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{UnitQuaternion, Vector3};

    use crate::registry::{MarkerId, Parent};

    fn translation(x: f64, y: f64, z: f64) -> Rigid3 {
        Rigid3::new(UnitQuaternion::identity(), Vector3::new(x, y, z))
    }

    /// Registry with a resolved slot at the given world position, seeing
    /// the camera at the given offset in its own frame.
    fn add_resolved(
        registry: &mut MarkerRegistry,
        id: u32,
        world: Rigid3,
        camera_in_marker: Rigid3,
        active: bool,
    ) -> SlotId {
        let slot = registry.allocate(MarkerId::new(id)).unwrap();
        let record = registry.get_mut(slot).unwrap();
        record.resolve(Parent::World, world, world);
        record.camera_pose = camera_in_marker;
        record.active = active;
        slot
    }

    #[test]
    fn test_no_active_slot_means_no_fix() {
        let mut registry = MarkerRegistry::with_capacity(4);
        add_resolved(
            &mut registry,
            10,
            Rigid3::identity(),
            translation(0.0, 0.0, -1.0),
            false,
        );

        assert!(localize(&registry).is_none());
    }

    #[test]
    fn test_pending_slots_cannot_anchor_localization() {
        let mut registry = MarkerRegistry::with_capacity(4);
        let slot = registry.allocate(MarkerId::new(20)).unwrap();
        let record = registry.get_mut(slot).unwrap();
        record.active = true;
        record.camera_pose = translation(0.2, 0.0, 0.5);

        assert!(localize(&registry).is_none());
    }

    #[test]
    fn test_nearest_marker_wins() {
        let mut registry = MarkerRegistry::with_capacity(4);
        add_resolved(
            &mut registry,
            10,
            Rigid3::identity(),
            translation(0.0, 0.0, -2.0),
            true,
        );
        let near = add_resolved(
            &mut registry,
            20,
            translation(1.0, 0.0, 0.0),
            translation(0.0, 0.0, -0.5),
            true,
        );

        let fix = localize(&registry).unwrap();
        assert_eq!(fix.anchor, near);
        assert_relative_eq!(
            fix.pose.translation,
            Vector3::new(1.0, 0.0, -0.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_distance_tie_goes_to_lowest_slot_index() {
        let mut registry = MarkerRegistry::with_capacity(4);
        let first = add_resolved(
            &mut registry,
            10,
            Rigid3::identity(),
            translation(0.0, 0.0, -1.0),
            true,
        );
        add_resolved(
            &mut registry,
            20,
            translation(1.0, 0.0, 0.0),
            translation(0.0, 0.0, 1.0),
            true,
        );

        let fix = localize(&registry).unwrap();
        assert_eq!(fix.anchor, first);
    }

    #[test]
    fn test_pose_composition_uses_anchor_chain() {
        let mut registry = MarkerRegistry::with_capacity(4);
        let world = Rigid3::new(
            UnitQuaternion::from_euler_angles(0.0, 0.0, std::f64::consts::FRAC_PI_2),
            Vector3::new(2.0, 0.0, 0.0),
        );
        add_resolved(&mut registry, 10, world, translation(1.0, 0.0, 0.0), true);

        let fix = localize(&registry).unwrap();
        // The marker's +x axis points along world +y.
        assert_relative_eq!(
            fix.pose.translation,
            Vector3::new(2.0, 1.0, 0.0),
            epsilon = 1e-12
        );
    }
}
