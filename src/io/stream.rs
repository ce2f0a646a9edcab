//! Detection-log replay and report publishing over line-delimited JSON.
//!
//! One line per frame:
//!
//! ```text
//! {"timestamp": 1000, "markers": [{"id": 10, "pose": {"position": {...}, "orientation": {...}}}]}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Stdout, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::detect::{Detection, DetectionFrame};
use crate::geometry::Rigid3;
use crate::registry::MarkerId;
use crate::report::{FrameReport, PoseMsg, ReportSink};

#[derive(Deserialize)]
struct FrameLine {
    timestamp: u64,
    #[serde(default)]
    markers: Vec<MarkerLine>,
}

#[derive(Deserialize)]
struct MarkerLine {
    id: u32,
    pose: PoseMsg,
}

impl From<FrameLine> for DetectionFrame {
    fn from(line: FrameLine) -> Self {
        let detections = line
            .markers
            .iter()
            .map(|m| Detection {
                id: MarkerId::new(m.id),
                pose: Rigid3::from(&m.pose),
            })
            .collect();
        DetectionFrame::new(line.timestamp, detections)
    }
}

/// Read a whole detection log. Blank lines are skipped.
pub fn read_detection_log<P: AsRef<Path>>(path: P) -> Result<Vec<DetectionFrame>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("opening detection log {}", path.display()))?;

    let mut frames = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: FrameLine = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", path.display(), lineno + 1))?;
        frames.push(parsed.into());
    }
    Ok(frames)
}

/// Publishes each report as one JSON line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl JsonLinesSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ReportSink for JsonLinesSink<W> {
    fn publish(&mut self, report: &FrameReport) -> Result<()> {
        serde_json::to_writer(&mut self.writer, report)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
