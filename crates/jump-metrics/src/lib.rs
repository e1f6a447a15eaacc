//! High-level facade crate for the `jump-metrics-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core, detector and annotation crates
//! - the [`LandmarkSource`] seam through which pose frames reach the detector
//! - a JSON landmark stream format ([`LandmarkStream`]) and its source
//! - [`JumpAnalysis`], the per-video driver that keeps frames in order
//! - (feature `cli`) the `jump-metrics` command-line tool
//!
//! ## Quickstart
//!
//! ```no_run
//! use jump_metrics::{analyze, LandmarkStream};
//! use jump_metrics::detector::JumpParams;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut source = LandmarkStream::load_json("landmarks.json")?.into_source();
//! let run = analyze(&mut source, JumpParams::default())?;
//! println!("{}", run.report);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `jump_metrics::core`: body points, landmark frames, joint angles, logging.
//! - `jump_metrics::detector`: calibration, phase state machine, metrics, reports.
//! - `jump_metrics::annotate`: HUD overlay model and frame painting.

pub use jump_metrics_annotate as annotate;
pub use jump_metrics_core as core;
pub use jump_metrics_detector as detector;

pub use jump_metrics_detector::{JumpConfig, JumpParams, JumpPhase, JumpReport};

mod analysis;
mod source;
mod stream;

pub use analysis::{analyze, analyze_with, AnalysisError, AnalysisRun, FrameOutcome, JumpAnalysis};
pub use source::{FrameInput, LandmarkSource, SourceError, VideoInfo};
pub use stream::{LandmarkStream, StreamFrame, StreamLandmarks, StreamSource};
