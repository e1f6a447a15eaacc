//! Recorded landmark streams (JSON).
//!
//! ```json
//! {
//!   "fps": 30.0, "width": 1080, "height": 1920,
//!   "frames": [
//!     { "index": 0, "landmarks": { "left_hip": { "x": 0.51, "y": 0.48 }, ... } },
//!     { "index": 1, "landmarks": null }
//!   ]
//! }
//! ```
//!
//! `landmarks` may also be the estimator's flat 33-element array. An array of
//! any other length yields a [`FrameInput::Malformed`] frame; the stream goes on.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::vec;

use jump_metrics_core::{BodyPoint, FrameGeometry, Landmark, LandmarkFrame};
use serde::{Deserialize, Serialize};

use crate::source::{FrameInput, LandmarkSource, SourceError, VideoInfo};

/// Landmarks of one frame, keyed by body point or in estimator order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamLandmarks {
    Named(BTreeMap<BodyPoint, Landmark>),
    Indexed(Vec<Landmark>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamFrame {
    pub index: u64,
    /// `None` when no person was detected.
    #[serde(default)]
    pub landmarks: Option<StreamLandmarks>,
}

impl StreamFrame {
    pub fn missing(index: u64) -> Self {
        Self {
            index,
            landmarks: None,
        }
    }

    pub fn detected(frame: &LandmarkFrame) -> Self {
        let named = frame.iter().map(|(p, l)| (p, *l)).collect();
        Self {
            index: frame.index,
            landmarks: Some(StreamLandmarks::Named(named)),
        }
    }

    fn into_input(self, geometry: FrameGeometry) -> FrameInput {
        let index = self.index;
        match self.landmarks {
            None => FrameInput::Missing { index },
            Some(StreamLandmarks::Named(points)) => {
                FrameInput::Detected(LandmarkFrame::from_landmarks(index, geometry, points))
            }
            Some(StreamLandmarks::Indexed(points)) => {
                match LandmarkFrame::from_pose_array(index, geometry, &points) {
                    Ok(frame) => FrameInput::Detected(frame),
                    Err(error) => FrameInput::Malformed { index, error },
                }
            }
        }
    }
}

/// A whole recorded video worth of landmarks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkStream {
    pub fps: f32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub frames: Vec<StreamFrame>,
}

impl LandmarkStream {
    pub fn new(fps: f32, geometry: FrameGeometry) -> Self {
        Self {
            fps,
            width: geometry.width,
            height: geometry.height,
            frames: Vec::new(),
        }
    }

    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry::new(self.width, self.height)
    }

    pub fn video_info(&self) -> VideoInfo {
        VideoInfo::new(self.fps, self.geometry())
    }

    pub fn push(&mut self, frame: StreamFrame) {
        self.frames.push(frame);
    }

    /// Load a stream from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this stream to disk as JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SourceError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn into_source(self) -> StreamSource {
        StreamSource {
            info: self.video_info(),
            frames: self.frames.into_iter(),
        }
    }
}

/// [`LandmarkSource`] over a [`LandmarkStream`].
#[derive(Debug)]
pub struct StreamSource {
    info: VideoInfo,
    frames: vec::IntoIter<StreamFrame>,
}

impl LandmarkSource for StreamSource {
    fn video_info(&self) -> VideoInfo {
        self.info
    }

    fn next_frame(&mut self) -> Option<Result<FrameInput, SourceError>> {
        let frame = self.frames.next()?;
        Some(Ok(frame.into_input(self.info.geometry)))
    }
}
