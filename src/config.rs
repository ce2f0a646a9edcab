//! Runtime configuration for the positioning system.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Geometry of the marker deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceMode {
    /// All markers share one physical plane; marker-to-marker transforms
    /// are projected onto it (zero roll/pitch, zero out-of-plane offset).
    Plane,
    /// Markers are placed freely in 3D; transforms are stored as estimated.
    Volume,
}

/// System configuration. Every field has a deployment default, so a config
/// file only needs to state what differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Physical marker edge length in meters. Consumed by the external
    /// detector and visualization; carried here so one file configures the
    /// whole pipeline.
    pub marker_size: f64,

    /// Only detections whose ID is a multiple of this value take part in
    /// pose-graph chaining. The deployment convention reserves other IDs
    /// for purposes outside the chain.
    pub id_modulus: u32,

    /// Maximum number of distinct chained markers.
    pub capacity: usize,

    pub space: SpaceMode,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            marker_size: 0.1,
            id_modulus: 10,
            capacity: 35,
            space: SpaceMode::Plane,
        }
    }
}

impl SystemConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}
