//! Per-video analysis driver.
//!
//! [`JumpAnalysis`] owns one detector and enforces frame ordering: indices
//! skipped by the source are fed as frames without pose, indices that go
//! backwards are rejected.

use jump_metrics_annotate::{build_overlay, HudOverlay, HudStyle};
use jump_metrics_detector::{
    JumpDetectError, JumpDetector, JumpEvent, JumpIoError, JumpParams, JumpReport, JumpSnapshot,
    ParamsError,
};
use log::{debug, info, warn};

use crate::source::{FrameInput, LandmarkSource, SourceError, VideoInfo};

/// Errors returned by the analysis driver.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error("frame {got} arrived out of order (next expected index is {expected})")]
    OutOfOrder { expected: u64, got: u64 },
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Io(#[from] JumpIoError),
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(JumpIoError::Io(err))
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(JumpIoError::Json(err))
    }
}

/// What happened on one input frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutcome {
    pub index: u64,
    /// Frames without pose inserted before this one to close an index gap.
    pub gap_filled: u64,
    pub events: Vec<JumpEvent>,
    /// Malformed landmarks; the frame was treated as having no pose.
    pub error: Option<JumpDetectError>,
    /// Detector state after the gap frames, before this one. `None` without a gap.
    pub gap_snapshot: Option<JumpSnapshot>,
    pub snapshot: JumpSnapshot,
}

impl FrameOutcome {
    pub fn overlay(&self, style: &HudStyle) -> HudOverlay {
        build_overlay(&self.snapshot, style)
    }

    /// One overlay per gap-filled frame, in index order.
    ///
    /// Each overlay shows [`Self::gap_snapshot`] under its own frame index.
    pub fn gap_overlays<'a>(
        &'a self,
        style: &'a HudStyle,
    ) -> impl Iterator<Item = HudOverlay> + 'a {
        let first = self.index - self.gap_filled;
        self.gap_snapshot.iter().flat_map(move |snapshot| {
            (first..self.index).map(move |frame| HudOverlay {
                frame: Some(frame),
                ..build_overlay(snapshot, style)
            })
        })
    }
}

/// Jump analysis of one video.
#[derive(Clone, Debug)]
pub struct JumpAnalysis {
    detector: JumpDetector,
}

impl JumpAnalysis {
    pub fn new(info: &VideoInfo, params: JumpParams) -> Result<Self, AnalysisError> {
        let detector = JumpDetector::new(params, info.fps, info.geometry)?;
        Ok(Self { detector })
    }

    pub fn detector(&self) -> &JumpDetector {
        &self.detector
    }

    /// Index the next input frame is expected to have.
    pub fn next_index(&self) -> u64 {
        self.detector.frames_processed()
    }

    /// Feed one frame.
    ///
    /// Malformed landmarks are not an error here: they are logged, reported in
    /// [`FrameOutcome::error`] and the frame counts as one without pose. The
    /// same holds for [`FrameInput::Malformed`] frames from the source.
    pub fn push(&mut self, input: FrameInput) -> Result<FrameOutcome, AnalysisError> {
        let index = input.index();
        let expected = self.next_index();
        if index < expected {
            return Err(AnalysisError::OutOfOrder {
                expected,
                got: index,
            });
        }

        let gap_filled = index - expected;
        let gap_snapshot = (gap_filled > 0).then(|| {
            debug!("frames {expected}..{index} missing from the source; treating as no pose");
            for _ in 0..gap_filled {
                self.detector.skip_frame();
            }
            self.detector.snapshot()
        });

        let result = match input {
            FrameInput::Malformed { index, error } => {
                self.detector.skip_frame();
                Err(JumpDetectError::at_frame(index, error))
            }
            other => self.detector.update(other.landmarks()),
        };
        let (events, error) = match result {
            Ok(events) => (events, None),
            Err(err) => {
                warn!("{err}; frame skipped");
                (Vec::new(), Some(err))
            }
        };
        for event in &events {
            info!("{}", describe(event));
        }

        Ok(FrameOutcome {
            index,
            gap_filled,
            events,
            error,
            gap_snapshot,
            snapshot: self.detector.snapshot(),
        })
    }

    pub fn snapshot(&self) -> JumpSnapshot {
        self.detector.snapshot()
    }

    pub fn report(&self) -> JumpReport {
        self.detector.report()
    }

    pub fn finish(self) -> JumpReport {
        self.detector.finish()
    }
}

fn describe(event: &JumpEvent) -> String {
    match *event {
        JumpEvent::GroundCalibrated {
            frame,
            ground_level,
        } => format!("frame {frame}: ground level {ground_level:.1}px"),
        JumpEvent::DipOnset {
            frame,
            knee_angle_deg,
        } => format!("frame {frame}: dip onset at {knee_angle_deg:.0} deg"),
        JumpEvent::Takeoff {
            frame,
            contraction_time_s: Some(t),
        } => format!("frame {frame}: takeoff after {t:.2}s contraction"),
        JumpEvent::Takeoff { frame, .. } => format!("frame {frame}: takeoff"),
        JumpEvent::Landing {
            frame,
            airborne_frames,
            jump_height_cm,
        } => format!("frame {frame}: landing after {airborne_frames} frames, {jump_height_cm:.1} cm"),
    }
}

/// Result of running a whole source through the detector.
#[derive(Debug)]
pub struct AnalysisRun {
    pub report: JumpReport,
    pub events: Vec<JumpEvent>,
    /// Frames whose landmarks could not be measured.
    pub malformed_frames: u64,
    /// Frames dropped because their index went backwards.
    pub rejected_frames: u64,
    /// Source failure that ended the run early; the report covers the frames
    /// seen until then.
    pub aborted: Option<SourceError>,
}

/// Run every frame of `source` through a fresh detector.
pub fn analyze<S: LandmarkSource>(
    source: &mut S,
    params: JumpParams,
) -> Result<AnalysisRun, AnalysisError> {
    analyze_with(source, params, |_| Ok(()))
}

/// Like [`analyze`], calling `on_frame` after every accepted frame.
///
/// Only parameter errors and errors from `on_frame` fail the call. A failing
/// source ends the run and is reported in [`AnalysisRun::aborted`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip_all, fields(fps = source.video_info().fps))
)]
pub fn analyze_with<S, F>(
    source: &mut S,
    params: JumpParams,
    mut on_frame: F,
) -> Result<AnalysisRun, AnalysisError>
where
    S: LandmarkSource,
    F: FnMut(&FrameOutcome) -> Result<(), AnalysisError>,
{
    let info = source.video_info();
    let mut analysis = JumpAnalysis::new(&info, params)?;
    let mut events = Vec::new();
    let mut malformed_frames = 0;
    let mut rejected_frames = 0;
    let mut aborted = None;

    while let Some(next) = source.next_frame() {
        let input = match next {
            Ok(input) => input,
            Err(err) => {
                warn!("landmark source failed after {} frames: {err}", analysis.next_index());
                aborted = Some(err);
                break;
            }
        };
        let outcome = match analysis.push(input) {
            Ok(outcome) => outcome,
            Err(AnalysisError::OutOfOrder { expected, got }) => {
                warn!("dropping frame {got}: expected index {expected} or later");
                rejected_frames += 1;
                continue;
            }
            Err(err) => return Err(err),
        };
        if outcome.error.is_some() {
            malformed_frames += 1;
        }
        on_frame(&outcome)?;
        events.extend(outcome.events);
    }

    let report = analysis.finish();
    debug!(
        "analysis done: {} frames, phase {:?}",
        report.frames_processed, report.phase
    );
    Ok(AnalysisRun {
        report,
        events,
        malformed_frames,
        rejected_frames,
        aborted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jump_metrics_core::{BodyPoint, FrameGeometry, Landmark, LandmarkError, LandmarkFrame};
    use jump_metrics_detector::JumpPhase;

    fn info() -> VideoInfo {
        VideoInfo::new(30.0, FrameGeometry::new(1000, 1000))
    }

    fn standing(index: u64, foot: f32) -> FrameInput {
        let frame = LandmarkFrame::new(index, FrameGeometry::new(1000, 1000))
            .with_landmark(BodyPoint::LeftHip, Landmark::new(0.5, 0.3))
            .with_landmark(BodyPoint::LeftKnee, Landmark::new(0.5, 0.5))
            .with_landmark(BodyPoint::LeftAnkle, Landmark::new(0.5, 0.7))
            .with_landmark(BodyPoint::LeftFootIndex, Landmark::new(0.5, foot))
            .with_landmark(BodyPoint::RightFootIndex, Landmark::new(0.6, foot));
        FrameInput::Detected(frame)
    }

    #[test]
    fn gaps_become_missing_frames() {
        let mut analysis = JumpAnalysis::new(&info(), JumpParams::default()).unwrap();
        analysis.push(standing(0, 0.9)).unwrap();
        let outcome = analysis.push(standing(5, 0.9)).unwrap();
        assert_eq!(outcome.gap_filled, 4);
        assert_eq!(outcome.snapshot.frame, Some(5));
        assert_eq!(analysis.next_index(), 6);
        assert_eq!(analysis.detector().calibration().samples().len(), 2);
    }

    #[test]
    fn backwards_index_is_rejected_without_side_effects() {
        let mut analysis = JumpAnalysis::new(&info(), JumpParams::default()).unwrap();
        analysis.push(standing(0, 0.9)).unwrap();
        analysis.push(FrameInput::Missing { index: 1 }).unwrap();
        let err = analysis.push(standing(1, 0.9)).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::OutOfOrder {
                expected: 2,
                got: 1
            }
        ));
        assert_eq!(analysis.next_index(), 2);
    }

    #[test]
    fn malformed_frame_is_reported_not_fatal() {
        let mut analysis = JumpAnalysis::new(&info(), JumpParams::default()).unwrap();
        let broken = LandmarkFrame::new(0, FrameGeometry::new(1000, 1000))
            .with_landmark(BodyPoint::LeftKnee, Landmark::new(0.5, 0.5));
        let outcome = analysis.push(FrameInput::Detected(broken)).unwrap();
        assert!(matches!(
            outcome.error,
            Some(JumpDetectError::MissingLandmark {
                frame: 0,
                point: BodyPoint::LeftHip
            })
        ));
        assert_eq!(analysis.next_index(), 1);
        assert_eq!(outcome.snapshot.phase, JumpPhase::Ground);
    }

    #[test]
    fn invalid_params_fail_up_front() {
        let params = JumpParams {
            calibration_frames: 0,
            ..JumpParams::default()
        };
        assert!(matches!(
            JumpAnalysis::new(&info(), params),
            Err(AnalysisError::Params(ParamsError::EmptyCalibrationWindow))
        ));
    }

    #[test]
    fn unreadable_source_frame_counts_as_missing() {
        let mut analysis = JumpAnalysis::new(&info(), JumpParams::default()).unwrap();
        let outcome = analysis
            .push(FrameInput::Malformed {
                index: 0,
                error: LandmarkError::UnexpectedCount {
                    expected: 33,
                    got: 32,
                },
            })
            .unwrap();
        assert!(matches!(
            outcome.error,
            Some(JumpDetectError::Landmarks { frame: 0, .. })
        ));
        assert!(outcome.events.is_empty());
        assert_eq!(analysis.next_index(), 1);
        assert!(analysis.detector().calibration().samples().is_empty());
        analysis.push(standing(1, 0.9)).unwrap();
        assert_eq!(analysis.detector().calibration().samples().len(), 1);
    }

    #[test]
    fn gap_frames_get_their_own_overlays() {
        let mut analysis = JumpAnalysis::new(&info(), JumpParams::default()).unwrap();
        let first = analysis.push(standing(0, 0.9)).unwrap();
        assert!(first.gap_snapshot.is_none());
        assert_eq!(first.gap_overlays(&HudStyle::default()).count(), 0);

        let outcome = analysis.push(standing(4, 0.9)).unwrap();
        let style = HudStyle::default();
        let frames: Vec<_> = outcome.gap_overlays(&style).map(|hud| hud.frame).collect();
        assert_eq!(frames, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(outcome.overlay(&style).frame, Some(4));
    }

    #[test]
    fn outcome_overlay_reflects_calibration() {
        let mut analysis = JumpAnalysis::new(&info(), JumpParams::default()).unwrap();
        let outcome = analysis.push(standing(0, 0.9)).unwrap();
        let hud = outcome.overlay(&HudStyle::default());
        assert!(hud.calibrating);
        assert_eq!(hud.frame, Some(0));
    }
}
