//! Top-level system: per-frame pipeline and the frame admission loop.

use anyhow::Result;
use crossbeam_channel::Receiver;
use tracing::debug;

use crate::config::SystemConfig;
use crate::detect::DetectionFrame;
use crate::graph::PoseGraphBuilder;
use crate::localizer;
use crate::registry::MarkerRegistry;
use crate::report::{self, FrameReport, ReportSink};

/// Recommended capacity for the channel feeding [`PositioningSystem::run`]:
/// one frame is processed fully before the next is accepted.
pub const FRAME_CHANNEL_CAPACITY: usize = 1;

/// The marker positioning system.
///
/// Owns the registry and runs the whole per-frame pipeline on the calling
/// thread: visibility reset, pose-graph ingestion, camera localization,
/// report assembly. Frames never overlap, so the registry has exactly one
/// writer and needs no locking.
pub struct PositioningSystem {
    config: SystemConfig,
    registry: MarkerRegistry,
    builder: PoseGraphBuilder,
    frame_count: u64,
}

impl PositioningSystem {
    pub fn new(config: SystemConfig) -> Self {
        let registry = MarkerRegistry::with_capacity(config.capacity);
        let builder = PoseGraphBuilder::new(&config);
        Self {
            config,
            registry,
            builder,
            frame_count: 0,
        }
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Read access to the pose graph, e.g. for inspection or export.
    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Process one frame of detections and return the report to publish.
    pub fn process_frame(&mut self, frame: &DetectionFrame) -> FrameReport {
        self.frame_count += 1;
        if frame.is_empty() {
            debug!(frame = self.frame_count, "no markers in frame");
        }

        self.registry.begin_frame();
        self.builder.ingest(&mut self.registry, &frame.detections);
        let fix = localizer::localize(&self.registry);

        report::assemble(frame.timestamp_ns, &self.registry, fix.as_ref())
    }

    /// Drain frames from a channel until the sender hangs up, publishing
    /// one report per frame. Use a bounded channel of
    /// [`FRAME_CHANNEL_CAPACITY`] so the producer blocks while a frame is
    /// in flight.
    pub fn run(
        &mut self,
        frames: Receiver<DetectionFrame>,
        sink: &mut dyn ReportSink,
    ) -> Result<()> {
        for frame in frames.iter() {
            let report = self.process_frame(&frame);
            sink.publish(&report)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use nalgebra::{UnitQuaternion, Vector3};

    use crate::detect::Detection;
    use crate::geometry::Rigid3;
    use crate::registry::MarkerId;

    fn frame(timestamp_ns: u64, ids: &[u32]) -> DetectionFrame {
        let detections = ids
            .iter()
            .map(|&id| Detection {
                id: MarkerId::new(id),
                pose: Rigid3::new(
                    UnitQuaternion::identity(),
                    Vector3::new(id as f64 * 0.1, 0.0, 1.0),
                ),
            })
            .collect();
        DetectionFrame::new(timestamp_ns, detections)
    }

    struct CollectSink(Vec<FrameReport>);

    impl ReportSink for CollectSink {
        fn publish(&mut self, report: &FrameReport) -> Result<()> {
            self.0.push(report.clone());
            Ok(())
        }
    }

    #[test]
    fn test_empty_frames_report_not_visible() {
        let mut system = PositioningSystem::new(SystemConfig::default());

        let report = system.process_frame(&frame(1, &[]));
        assert!(!report.visibility);
        assert!(system.registry().is_empty());
    }

    #[test]
    fn test_visibility_appears_with_first_marker() {
        let mut system = PositioningSystem::new(SystemConfig::default());

        assert!(!system.process_frame(&frame(1, &[])).visibility);
        let report = system.process_frame(&frame(2, &[10]));
        assert!(report.visibility);
        assert_eq!(report.number_of_markers, 1);
        assert_eq!(report.markers_id, vec![10]);
    }

    #[test]
    fn test_run_drains_channel_and_publishes() {
        let mut system = PositioningSystem::new(SystemConfig::default());
        let (tx, rx) = bounded(FRAME_CHANNEL_CAPACITY);

        let producer = std::thread::spawn(move || {
            for (i, ids) in [&[][..], &[10][..], &[10, 20][..]].iter().enumerate() {
                tx.send(frame(i as u64 + 1, ids)).unwrap();
            }
        });

        let mut sink = CollectSink(Vec::new());
        system.run(rx, &mut sink).unwrap();
        producer.join().unwrap();

        assert_eq!(sink.0.len(), 3);
        assert!(!sink.0[0].visibility);
        assert!(sink.0[1].visibility);
        assert_eq!(sink.0[2].number_of_markers, 2);
    }
}
