use anyhow::{Context, Result};
use crossbeam_channel::bounded;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use marker_nav::config::SystemConfig;
use marker_nav::io::{self, JsonLinesSink};
use marker_nav::system::{PositioningSystem, FRAME_CHANNEL_CAPACITY};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let log_path = args
        .next()
        .context("usage: marker-nav <detections.jsonl> [config.json] [calibration.txt]")?;
    let config_path = args.next();
    let calibration_path = args.next();

    let config = match config_path {
        Some(path) => SystemConfig::from_file(&path)?,
        None => SystemConfig::default(),
    };
    info!(
        marker_size = config.marker_size,
        capacity = config.capacity,
        "starting positioning system"
    );

    // The calibration belongs to the upstream detector; load it here only
    // to surface problems at startup.
    if let Some(path) = calibration_path {
        if let Err(err) = io::load_calibration(&path) {
            warn!("calibration unavailable: {:#}", err);
        }
    }

    let frames = io::read_detection_log(&log_path)?;
    info!(frames = frames.len(), "loaded detection log");

    let (tx, rx) = bounded(FRAME_CHANNEL_CAPACITY);
    let producer = std::thread::spawn(move || {
        for frame in frames {
            if tx.send(frame).is_err() {
                break;
            }
        }
    });

    let mut system = PositioningSystem::new(config);
    let mut sink = JsonLinesSink::stdout();
    system.run(rx, &mut sink)?;

    producer
        .join()
        .map_err(|_| anyhow::anyhow!("frame producer panicked"))?;

    info!(frames = system.frame_count(), "done");
    Ok(())
}
