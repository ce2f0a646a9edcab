//! File formats consumed and produced by the binary: calibration files,
//! detection logs, report streams.

pub mod calibration;
pub mod stream;

pub use calibration::{load_calibration, CameraCalibration};
pub use stream::{read_detection_log, JsonLinesSink};
