//! Planarity projection for marker deployments on a single physical plane.
//!
//! When every marker is mounted on one plane, a marker-to-marker transform
//! can only rotate about the plane normal and translate within the plane.
//! Projecting the estimate onto that subspace trades a small modeling bias
//! for a large reduction in detection noise.

use nalgebra::{UnitQuaternion, Vector3};

use super::Rigid3;

/// Project a transform onto the marker plane: roll and pitch are zeroed so
/// only yaw remains, and the out-of-plane (z) translation is dropped.
pub fn project_to_plane(pose: &Rigid3) -> Rigid3 {
    let (_roll, _pitch, yaw) = pose.rotation.euler_angles();
    Rigid3 {
        rotation: UnitQuaternion::from_euler_angles(0.0, 0.0, yaw),
        translation: Vector3::new(pose.translation.x, pose.translation.y, 0.0),
    }
}
