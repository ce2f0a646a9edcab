//! Per-frame output record for the external publisher.
//!
//! Field names on the wire match the published message of the deployed
//! system, so downstream consumers keep working unchanged.

use anyhow::Result;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::geometry::Rigid3;
use crate::localizer::CameraFix;
use crate::registry::MarkerRegistry;

/// Wire representation of a 3D point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point3Msg {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Wire representation of an orientation quaternion (x, y, z, w).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuaternionMsg {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// Wire representation of a pose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoseMsg {
    pub position: Point3Msg,
    pub orientation: QuaternionMsg,
}

impl From<&Rigid3> for PoseMsg {
    fn from(pose: &Rigid3) -> Self {
        Self {
            position: Point3Msg {
                x: pose.translation.x,
                y: pose.translation.y,
                z: pose.translation.z,
            },
            orientation: QuaternionMsg {
                x: pose.rotation.i,
                y: pose.rotation.j,
                z: pose.rotation.k,
                w: pose.rotation.w,
            },
        }
    }
}

impl From<&PoseMsg> for Rigid3 {
    fn from(msg: &PoseMsg) -> Self {
        Rigid3::new(
            UnitQuaternion::from_quaternion(Quaternion::new(
                msg.orientation.w,
                msg.orientation.x,
                msg.orientation.y,
                msg.orientation.z,
            )),
            Vector3::new(msg.position.x, msg.position.y, msg.position.z),
        )
    }
}

/// Everything the system reports about one processed frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    /// Frame timestamp in nanoseconds.
    pub timestamp: u64,
    #[serde(rename = "frameID")]
    pub frame_id: String,
    #[serde(rename = "numberOfMarkers")]
    pub number_of_markers: usize,
    /// True iff at least one resolved marker was visible, i.e. the device
    /// pose could be derived.
    pub visibility: bool,
    /// Device pose in the world frame; absent when not visible.
    #[serde(rename = "globalPose", skip_serializing_if = "Option::is_none")]
    pub global_pose: Option<PoseMsg>,
    /// IDs of visible resolved markers, in slot order.
    #[serde(rename = "markersID")]
    pub markers_id: Vec<u32>,
    /// World pose of each listed marker.
    #[serde(rename = "markersPose")]
    pub markers_pose: Vec<PoseMsg>,
    /// Camera pose in each listed marker's frame.
    #[serde(rename = "cameraPose")]
    pub camera_pose: Vec<PoseMsg>,
}

/// Assemble the report for the frame just processed.
pub fn assemble(timestamp: u64, registry: &MarkerRegistry, fix: Option<&CameraFix>) -> FrameReport {
    let mut report = FrameReport {
        timestamp,
        frame_id: "world".to_string(),
        number_of_markers: 0,
        visibility: fix.is_some(),
        global_pose: fix.map(|f| PoseMsg::from(&f.pose)),
        markers_id: Vec::new(),
        markers_pose: Vec::new(),
        camera_pose: Vec::new(),
    };

    if fix.is_none() {
        return report;
    }

    for (_, record) in registry.active() {
        let Some(global) = record.global_pose() else {
            continue;
        };
        report.markers_id.push(record.id.0);
        report.markers_pose.push(PoseMsg::from(global));
        report.camera_pose.push(PoseMsg::from(&record.camera_pose));
    }
    report.number_of_markers = report.markers_id.len();

    report
}

/// Destination for assembled reports. Delivery (transport, visualization,
/// persistence) is the implementor's concern.
pub trait ReportSink {
    fn publish(&mut self, report: &FrameReport) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    use crate::registry::{MarkerId, Parent, SlotId};

    #[test]
    fn test_pose_msg_roundtrip() {
        let pose = Rigid3::new(
            UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
            Vector3::new(1.0, 2.0, 3.0),
        );

        let msg = PoseMsg::from(&pose);
        let back = Rigid3::from(&msg);

        assert_relative_eq!(back.translation, pose.translation, epsilon = 1e-12);
        assert_relative_eq!(back.rotation.angle_to(&pose.rotation), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_not_visible_report_is_empty() {
        let registry = MarkerRegistry::with_capacity(4);
        let report = assemble(42, &registry, None);

        assert_eq!(report.timestamp, 42);
        assert_eq!(report.frame_id, "world");
        assert!(!report.visibility);
        assert_eq!(report.number_of_markers, 0);
        assert!(report.global_pose.is_none());
        assert!(report.markers_id.is_empty());
        assert!(report.markers_pose.is_empty());
        assert!(report.camera_pose.is_empty());
    }

    #[test]
    fn test_visible_report_lists_active_resolved_markers() {
        let mut registry = MarkerRegistry::with_capacity(4);

        let origin = registry.allocate(MarkerId::new(10)).unwrap();
        {
            let record = registry.get_mut(origin).unwrap();
            record.resolve(Parent::World, Rigid3::identity(), Rigid3::identity());
            record.active = true;
            record.camera_pose = Rigid3::new(
                UnitQuaternion::identity(),
                Vector3::new(0.0, 0.0, -1.0),
            );
        }

        // A visible but pending marker must not appear in the lists.
        let pending = registry.allocate(MarkerId::new(20)).unwrap();
        registry.get_mut(pending).unwrap().active = true;

        let fix = CameraFix {
            anchor: SlotId::new(0),
            pose: Rigid3::new(UnitQuaternion::identity(), Vector3::new(0.0, 0.0, -1.0)),
        };
        let report = assemble(7, &registry, Some(&fix));

        assert!(report.visibility);
        assert_eq!(report.number_of_markers, 1);
        assert_eq!(report.markers_id, vec![10]);
        assert_relative_eq!(report.camera_pose[0].position.z, -1.0, epsilon = 1e-12);
        assert_relative_eq!(
            report.global_pose.unwrap().position.z,
            -1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_report_serializes_with_wire_field_names() {
        let registry = MarkerRegistry::with_capacity(1);
        let report = assemble(0, &registry, None);
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("\"frameID\""));
        assert!(json.contains("\"numberOfMarkers\""));
        assert!(json.contains("\"markersID\""));
        assert!(json.contains("\"markersPose\""));
        assert!(json.contains("\"cameraPose\""));
        assert!(!json.contains("globalPose"));
    }
}
