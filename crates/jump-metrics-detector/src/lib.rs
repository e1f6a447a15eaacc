//! Vertical-jump event detector built on top of `jump-metrics-core`.
//!
//! ## Quickstart
//!
//! ```
//! use jump_metrics_core::FrameGeometry;
//! use jump_metrics_detector::{JumpDetector, JumpParams, JumpPhase};
//!
//! let mut detector = JumpDetector::new(JumpParams::default(), 30.0, FrameGeometry::new(1080, 1920))
//!     .expect("default params are valid");
//!
//! // Frames where the pose estimator found nobody still advance the clock.
//! detector.skip_frame();
//! assert_eq!(detector.phase(), JumpPhase::Ground);
//!
//! let report = detector.finish();
//! assert!(!report.is_complete());
//! assert_eq!(report.jump_height_or_zero(), 0.0);
//! ```
//!
//! Per-frame algorithm:
//! 1. Knee angle at the left knee (hip, knee, ankle) in pixel space.
//! 2. Foot height = lowest on screen of the two toe tips.
//! 3. During the first `calibration_frames` frames only record foot heights.
//! 4. Ground level = lowest recorded foot height, resolved once.
//! 5. `Ground`: track the deepest knee angle and the first frame below the
//!    dip-onset threshold; take off once the foot rises past the takeoff margin.
//! 6. `Airborne`: count flight frames, sample knee extension during the first
//!    frames of flight, land once the foot is back within the landing margin.
//! 7. `Landed` is terminal.

mod calibration;
mod detector;
mod io;
mod kinematics;
mod measure;
mod metrics;
mod params;
mod report;

pub use calibration::GroundCalibration;
pub use detector::{JumpDetectError, JumpDetector, JumpEvent, JumpPhase, JumpSnapshot};
pub use io::{JumpConfig, JumpIoError};
pub use kinematics::{
    contraction_time_s, flight_time_s, jump_height_cm, FLIGHT_HEIGHT_COEFF_CM,
};
pub use measure::FrameMeasurement;
pub use metrics::{JumpMetrics, MaxTracker, MinTracker, WriteOnce};
pub use params::{sanitize_fps, JumpParams, ParamsError, DEFAULT_FPS};
pub use report::{JumpReport, EXTENSION_SENTINEL_DEG, KNEE_ANGLE_SENTINEL_DEG};
