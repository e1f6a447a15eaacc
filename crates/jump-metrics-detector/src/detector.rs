//! Jump phase state machine.

use jump_metrics_core::{BodyPoint, FrameGeometry, LandmarkError, LandmarkFrame};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::calibration::GroundCalibration;
use crate::kinematics::{contraction_time_s, flight_time_s, jump_height_cm};
use crate::measure::FrameMeasurement;
use crate::metrics::JumpMetrics;
use crate::params::{sanitize_fps, JumpParams, ParamsError};
use crate::report::JumpReport;

/// Where the foot is relative to the calibrated ground level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpPhase {
    #[default]
    Ground,
    Airborne,
    /// Terminal: frames after landing are ignored.
    Landed,
}

/// Something the detector observed on a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JumpEvent {
    GroundCalibrated {
        frame: u64,
        ground_level: f32,
    },
    DipOnset {
        frame: u64,
        knee_angle_deg: f32,
    },
    Takeoff {
        frame: u64,
        contraction_time_s: Option<f32>,
    },
    Landing {
        frame: u64,
        airborne_frames: u32,
        jump_height_cm: f32,
    },
}

/// Errors returned by [`JumpDetector::update`].
///
/// The offending frame has already been counted as a frame without pose when
/// one of these is returned; the detector stays usable.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum JumpDetectError {
    #[error("frame {frame}: body point `{point}` is missing")]
    MissingLandmark { frame: u64, point: BodyPoint },
    #[error("frame {frame}: body point `{point}` has a non-finite coordinate")]
    NonFiniteLandmark { frame: u64, point: BodyPoint },
    #[error("frame {frame}: size {got} differs from the video's {expected}")]
    GeometryMismatch {
        frame: u64,
        expected: FrameGeometry,
        got: FrameGeometry,
    },
    #[error("frame {frame}: {source}")]
    Landmarks {
        frame: u64,
        #[source]
        source: LandmarkError,
    },
}

impl JumpDetectError {
    /// Attach the frame index to a landmark error.
    pub fn at_frame(frame: u64, err: LandmarkError) -> Self {
        match err {
            LandmarkError::MissingPoint(point) => Self::MissingLandmark { frame, point },
            LandmarkError::NonFinite(point) => Self::NonFiniteLandmark { frame, point },
            other => Self::Landmarks {
                frame,
                source: other,
            },
        }
    }
}

/// Read-only view of the detector state, taken once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JumpSnapshot {
    /// Index of the last frame fed in, `None` before the first one.
    pub frame: Option<u64>,
    pub phase: JumpPhase,
    /// True until the ground level is known.
    pub calibrating: bool,
    pub ground_level: Option<f32>,
    pub metrics: JumpMetrics,
}

/// Detects one vertical jump in a stream of landmark frames.
///
/// Frames must be fed in order, one call per video frame, including frames
/// where no pose was found.
#[derive(Clone, Debug)]
pub struct JumpDetector {
    params: JumpParams,
    fps: f32,
    geometry: FrameGeometry,
    calibration: GroundCalibration,
    phase: JumpPhase,
    metrics: JumpMetrics,
    next_frame: u64,
    warned_uncalibrated: bool,
}

impl JumpDetector {
    /// Create a detector for a video with the given frame rate and size.
    ///
    /// An unusable `fps` is replaced by [`crate::DEFAULT_FPS`].
    pub fn new(params: JumpParams, fps: f32, geometry: FrameGeometry) -> Result<Self, ParamsError> {
        params.validate()?;
        if geometry.height == 0 {
            return Err(ParamsError::EmptyFrame);
        }
        let calibration = GroundCalibration::new(params.calibration_frames);
        Ok(Self {
            params,
            fps: sanitize_fps(fps),
            geometry,
            calibration,
            phase: JumpPhase::Ground,
            metrics: JumpMetrics::default(),
            next_frame: 0,
            warned_uncalibrated: false,
        })
    }

    pub fn params(&self) -> &JumpParams {
        &self.params
    }

    /// Effective frame rate (after the fallback).
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    pub fn metrics(&self) -> &JumpMetrics {
        &self.metrics
    }

    pub fn calibration(&self) -> &GroundCalibration {
        &self.calibration
    }

    /// Frame size every fed frame must have.
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    fn frame_height(&self) -> f32 {
        self.geometry.height as f32
    }

    /// Number of frames fed so far; also the index the next frame gets.
    pub fn frames_processed(&self) -> u64 {
        self.next_frame
    }

    /// True while the next frame still falls inside the calibration window.
    pub fn is_calibrating(&self) -> bool {
        self.calibration.is_calibrating(self.next_frame)
    }

    /// Feed the next frame. `None` means no pose was detected in it.
    ///
    /// Returns the events observed on this frame (usually none). A frame
    /// whose size differs from the video's is rejected, since the takeoff and
    /// landing margins are fractions of the video height.
    pub fn update(
        &mut self,
        frame: Option<&LandmarkFrame>,
    ) -> Result<Vec<JumpEvent>, JumpDetectError> {
        let index = self.next_frame;
        self.next_frame += 1;

        let Some(frame) = frame else {
            return Ok(Vec::new());
        };
        if self.phase == JumpPhase::Landed {
            return Ok(Vec::new());
        }
        if frame.geometry != self.geometry {
            return Err(JumpDetectError::GeometryMismatch {
                frame: index,
                expected: self.geometry,
                got: frame.geometry,
            });
        }

        let measurement =
            FrameMeasurement::from_frame(frame).map_err(|e| JumpDetectError::at_frame(index, e))?;
        Ok(self.step(index, measurement))
    }

    /// Feed a frame in which no pose was detected.
    pub fn skip_frame(&mut self) {
        self.next_frame += 1;
    }

    /// Feed an already measured frame.
    pub fn update_measured(&mut self, measurement: FrameMeasurement) -> Vec<JumpEvent> {
        let index = self.next_frame;
        self.next_frame += 1;
        if self.phase == JumpPhase::Landed {
            return Vec::new();
        }
        self.step(index, measurement)
    }

    pub fn snapshot(&self) -> JumpSnapshot {
        JumpSnapshot {
            frame: self.next_frame.checked_sub(1),
            phase: self.phase,
            calibrating: self.calibration.ground_level().is_none(),
            ground_level: self.calibration.ground_level(),
            metrics: self.metrics,
        }
    }

    /// Report of the metrics gathered so far.
    pub fn report(&self) -> JumpReport {
        JumpReport::from_state(
            self.fps,
            self.next_frame,
            self.phase,
            self.calibration.ground_level(),
            &self.metrics,
        )
    }

    /// Finish the attempt and produce the final report.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self), fields(frames = self.next_frame, phase = ?self.phase))
    )]
    pub fn finish(self) -> JumpReport {
        if self.phase != JumpPhase::Landed {
            debug!(
                "attempt ended in phase {:?} after {} frames",
                self.phase, self.next_frame
            );
        }
        self.report()
    }

    fn step(&mut self, index: u64, m: FrameMeasurement) -> Vec<JumpEvent> {
        let mut events = Vec::new();

        if self.calibration.is_calibrating(index) {
            self.calibration.record(m.foot_y);
            return events;
        }

        let Some(ground) = self.ground_level(index, &mut events) else {
            return events;
        };

        match self.phase {
            JumpPhase::Ground => self.step_ground(index, m, ground, &mut events),
            JumpPhase::Airborne => self.step_airborne(index, m, ground, &mut events),
            JumpPhase::Landed => {}
        }
        events
    }

    fn ground_level(&mut self, index: u64, events: &mut Vec<JumpEvent>) -> Option<f32> {
        if let Some(level) = self.calibration.ground_level() {
            return Some(level);
        }
        match self.calibration.resolve() {
            Some(level) => {
                debug!(
                    "ground level {level:.1}px from {} samples",
                    self.calibration.samples().len()
                );
                events.push(JumpEvent::GroundCalibrated {
                    frame: index,
                    ground_level: level,
                });
                Some(level)
            }
            None => {
                if !self.warned_uncalibrated {
                    warn!(
                        "no pose detected during the first {} frames; ground level unknown",
                        self.calibration.window()
                    );
                    self.warned_uncalibrated = true;
                }
                None
            }
        }
    }

    fn step_ground(
        &mut self,
        index: u64,
        m: FrameMeasurement,
        ground: f32,
        events: &mut Vec<JumpEvent>,
    ) {
        self.metrics.min_knee_angle.observe(m.knee_angle_deg);

        if m.knee_angle_deg < self.params.dip_onset_deg && self.metrics.dip_onset_frame.set(index)
        {
            debug!("dip onset at frame {index} ({:.1} deg)", m.knee_angle_deg);
            events.push(JumpEvent::DipOnset {
                frame: index,
                knee_angle_deg: m.knee_angle_deg,
            });
        }

        let takeoff_line = ground - self.frame_height() * self.params.takeoff_margin;
        if m.foot_y < takeoff_line {
            self.phase = JumpPhase::Airborne;
            self.metrics.takeoff_frame.set(index);
            let contraction = self
                .metrics
                .dip_onset_frame
                .get()
                .map(|dip| contraction_time_s(dip, index, self.fps));
            if let Some(t) = contraction {
                self.metrics.contraction_time_s.set(t);
            }
            debug!("takeoff at frame {index} (foot {:.1}px)", m.foot_y);
            events.push(JumpEvent::Takeoff {
                frame: index,
                contraction_time_s: contraction,
            });
        }
    }

    fn step_airborne(
        &mut self,
        index: u64,
        m: FrameMeasurement,
        ground: f32,
        events: &mut Vec<JumpEvent>,
    ) {
        self.metrics.airborne_frames += 1;
        if self.metrics.airborne_frames < self.params.extension_window {
            self.metrics.max_extension_angle.observe(m.knee_angle_deg);
        }

        let landing_line = ground - self.frame_height() * self.params.landing_margin;
        if m.foot_y >= landing_line {
            self.phase = JumpPhase::Landed;
            let airborne_frames = self.metrics.airborne_frames;
            let t = flight_time_s(airborne_frames, self.fps);
            let height = jump_height_cm(t);
            self.metrics.landing_frame.set(index);
            self.metrics.flight_time_s.set(t);
            self.metrics.jump_height_cm.set(height);
            debug!("landing at frame {index}: {airborne_frames} frames airborne, {height:.1} cm");
            events.push(JumpEvent::Landing {
                frame: index,
                airborne_frames,
                jump_height_cm: height,
            });
        }
    }
}
