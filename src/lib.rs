//! Camera localization from printed fiducial markers.
//!
//! The system incrementally builds a tree of marker poses anchored at the
//! first marker it ever sees, chains newly observed markers onto already
//! resolved ones, and reports the camera's global pose together with the
//! global pose of every marker visible in the current frame. Not all
//! markers need to be visible at once: the chain extends whenever a new
//! marker shares a frame with a resolved one.
//!
//! Marker detection, image capture and message transport live outside this
//! crate; see [`detect`] for the input boundary and [`report`] for the
//! output boundary.

pub mod config;
pub mod detect;
pub mod geometry;
pub mod graph;
pub mod io;
pub mod localizer;
pub mod registry;
pub mod report;
pub mod system;
