//! Camera calibration file loading.
//!
//! The deployed calibration tool writes a plain-text file with an
//! `[image]` section (`width`/`height` labels, value on the next line) and
//! `camera matrix` / `distortion` section headers followed by
//! whitespace-separated numbers. The intrinsics are consumed by the
//! external detector; this crate only loads and sanity-checks them.

use std::path::Path;

use anyhow::{bail, Context, Result};
use nalgebra::Matrix3;
use tracing::{info, warn};

/// Intrinsic calibration of the camera feeding the detector.
#[derive(Debug, Clone)]
pub struct CameraCalibration {
    /// 3x3 camera matrix.
    pub intrinsics: Matrix3<f64>,
    /// Radial/tangential distortion coefficients.
    pub distortion: [f64; 5],
    /// Image (width, height) in pixels.
    pub image_size: (u32, u32),
}

impl CameraCalibration {
    /// A plausibly-formed calibration has a unit homogeneous term and a
    /// zero fifth distortion coefficient. Failing the check is worth a
    /// warning but not an abort.
    pub fn looks_sane(&self) -> bool {
        self.intrinsics[(2, 2)] == 1.0 && self.distortion[4] == 0.0
    }
}

pub fn load_calibration<P: AsRef<Path>>(path: P) -> Result<CameraCalibration> {
    let path = path.as_ref();
    info!("reading calibration file from {}", path.display());
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading calibration file {}", path.display()))?;
    let calibration = parse_calibration(&text)
        .with_context(|| format!("parsing calibration file {}", path.display()))?;

    if calibration.looks_sane() {
        info!("calibration file loaded successfully");
    } else {
        warn!("suspicious calibration data");
    }
    Ok(calibration)
}

/// Parse the calibration text format. Numbers following a section header
/// may be spread over any number of lines.
pub fn parse_calibration(text: &str) -> Result<CameraCalibration> {
    let mut intrinsics = None;
    let mut distortion = None;
    let mut width = None;
    let mut height = None;

    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        match line.trim() {
            "camera matrix" => {
                let values = take_numbers(&mut lines, 9).context("camera matrix")?;
                intrinsics = Some(Matrix3::from_row_slice(&values));
            }
            "distortion" => {
                let values = take_numbers(&mut lines, 5).context("distortion")?;
                let mut coeffs = [0.0; 5];
                coeffs.copy_from_slice(&values);
                distortion = Some(coeffs);
            }
            "width" => {
                width = Some(take_numbers(&mut lines, 1).context("width")?[0] as u32);
            }
            "height" => {
                height = Some(take_numbers(&mut lines, 1).context("height")?[0] as u32);
            }
            _ => {}
        }
    }

    let Some(intrinsics) = intrinsics else {
        bail!("missing 'camera matrix' section");
    };
    let Some(distortion) = distortion else {
        bail!("missing 'distortion' section");
    };

    Ok(CameraCalibration {
        intrinsics,
        distortion,
        image_size: (width.unwrap_or(0), height.unwrap_or(0)),
    })
}

/// Consume lines until `count` numbers have been read.
fn take_numbers<'a, I>(lines: &mut I, count: usize) -> Result<Vec<f64>>
where
    I: Iterator<Item = &'a str>,
{
    let mut values = Vec::with_capacity(count);
    while values.len() < count {
        let Some(line) = lines.next() else {
            bail!("expected {} numbers, found {}", count, values.len());
        };
        for token in line.split_whitespace() {
            let value: f64 = token
                .parse()
                .with_context(|| format!("invalid number '{}'", token))?;
            values.push(value);
            if values.len() == count {
                break;
            }
        }
    }
    Ok(values)
}
