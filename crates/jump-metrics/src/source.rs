//! Where landmark frames come from.

use jump_metrics_core::{FrameGeometry, LandmarkError, LandmarkFrame};

/// Per-video constants, known before the first frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoInfo {
    /// Frame rate as reported by the container; may be unusable (0, NaN).
    pub fps: f32,
    pub geometry: FrameGeometry,
}

impl VideoInfo {
    pub fn new(fps: f32, geometry: FrameGeometry) -> Self {
        Self { fps, geometry }
    }

    /// Same video, analyzed at a different frame rate.
    pub fn with_fps(self, fps: f32) -> Self {
        Self { fps, ..self }
    }
}

/// One video frame as seen by the pose estimator.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameInput {
    Detected(LandmarkFrame),
    /// The estimator found no person in this frame.
    Missing { index: u64 },
    /// The estimator output for this frame could not be read as a pose.
    Malformed { index: u64, error: LandmarkError },
}

impl FrameInput {
    pub fn index(&self) -> u64 {
        match self {
            FrameInput::Detected(frame) => frame.index,
            FrameInput::Missing { index } | FrameInput::Malformed { index, .. } => *index,
        }
    }

    pub fn landmarks(&self) -> Option<&LandmarkFrame> {
        match self {
            FrameInput::Detected(frame) => Some(frame),
            FrameInput::Missing { .. } | FrameInput::Malformed { .. } => None,
        }
    }
}

/// Failures of a frame source. These end the stream; per-frame problems are
/// reported as [`FrameInput::Malformed`] instead.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("frame source failed: {0}")]
    Backend(String),
}

/// A stream of pose frames for one video.
///
/// Implemented by anything that can hand over landmark frames in order: a
/// recorded JSON stream, a live pose estimator, a test fixture.
pub trait LandmarkSource {
    fn video_info(&self) -> VideoInfo;

    /// Next frame, `None` once the video is exhausted.
    fn next_frame(&mut self) -> Option<Result<FrameInput, SourceError>>;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for &mut S {
    fn video_info(&self) -> VideoInfo {
        (**self).video_info()
    }

    fn next_frame(&mut self) -> Option<Result<FrameInput, SourceError>> {
        (**self).next_frame()
    }
}
