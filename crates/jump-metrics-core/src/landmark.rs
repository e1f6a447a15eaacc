//! Per-frame pose landmarks.

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::geometry::pixel_point;

/// Number of body points produced by the 33-point (BlazePose) topology.
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Named body point of the 33-point pose topology.
///
/// The discriminant is the index the pose estimator uses for the point in its
/// flat output array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BodyPoint {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    /// Index 23; proximal end of the tracked thigh.
    LeftHip = 23,
    RightHip = 24,
    /// Index 25; vertex of the tracked knee angle.
    LeftKnee = 25,
    RightKnee = 26,
    /// Index 27; distal end of the tracked shank.
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    /// Index 31; left toe tip, one of the two foot-height samples.
    LeftFootIndex = 31,
    /// Index 32; right toe tip, one of the two foot-height samples.
    RightFootIndex = 32,
}

impl BodyPoint {
    /// All body points, ordered by pose-estimator index.
    pub const ALL: [BodyPoint; POSE_LANDMARK_COUNT] = [
        BodyPoint::Nose,
        BodyPoint::LeftEyeInner,
        BodyPoint::LeftEye,
        BodyPoint::LeftEyeOuter,
        BodyPoint::RightEyeInner,
        BodyPoint::RightEye,
        BodyPoint::RightEyeOuter,
        BodyPoint::LeftEar,
        BodyPoint::RightEar,
        BodyPoint::MouthLeft,
        BodyPoint::MouthRight,
        BodyPoint::LeftShoulder,
        BodyPoint::RightShoulder,
        BodyPoint::LeftElbow,
        BodyPoint::RightElbow,
        BodyPoint::LeftWrist,
        BodyPoint::RightWrist,
        BodyPoint::LeftPinky,
        BodyPoint::RightPinky,
        BodyPoint::LeftIndex,
        BodyPoint::RightIndex,
        BodyPoint::LeftThumb,
        BodyPoint::RightThumb,
        BodyPoint::LeftHip,
        BodyPoint::RightHip,
        BodyPoint::LeftKnee,
        BodyPoint::RightKnee,
        BodyPoint::LeftAnkle,
        BodyPoint::RightAnkle,
        BodyPoint::LeftHeel,
        BodyPoint::RightHeel,
        BodyPoint::LeftFootIndex,
        BodyPoint::RightFootIndex,
    ];

    /// Pose-estimator array index of this point.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`BodyPoint::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Snake-case name, identical to the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            BodyPoint::Nose => "nose",
            BodyPoint::LeftEyeInner => "left_eye_inner",
            BodyPoint::LeftEye => "left_eye",
            BodyPoint::LeftEyeOuter => "left_eye_outer",
            BodyPoint::RightEyeInner => "right_eye_inner",
            BodyPoint::RightEye => "right_eye",
            BodyPoint::RightEyeOuter => "right_eye_outer",
            BodyPoint::LeftEar => "left_ear",
            BodyPoint::RightEar => "right_ear",
            BodyPoint::MouthLeft => "mouth_left",
            BodyPoint::MouthRight => "mouth_right",
            BodyPoint::LeftShoulder => "left_shoulder",
            BodyPoint::RightShoulder => "right_shoulder",
            BodyPoint::LeftElbow => "left_elbow",
            BodyPoint::RightElbow => "right_elbow",
            BodyPoint::LeftWrist => "left_wrist",
            BodyPoint::RightWrist => "right_wrist",
            BodyPoint::LeftPinky => "left_pinky",
            BodyPoint::RightPinky => "right_pinky",
            BodyPoint::LeftIndex => "left_index",
            BodyPoint::RightIndex => "right_index",
            BodyPoint::LeftThumb => "left_thumb",
            BodyPoint::RightThumb => "right_thumb",
            BodyPoint::LeftHip => "left_hip",
            BodyPoint::RightHip => "right_hip",
            BodyPoint::LeftKnee => "left_knee",
            BodyPoint::RightKnee => "right_knee",
            BodyPoint::LeftAnkle => "left_ankle",
            BodyPoint::RightAnkle => "right_ankle",
            BodyPoint::LeftHeel => "left_heel",
            BodyPoint::RightHeel => "right_heel",
            BodyPoint::LeftFootIndex => "left_foot_index",
            BodyPoint::RightFootIndex => "right_foot_index",
        }
    }
}

impl fmt::Display for BodyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One landmark in normalized image coordinates (`0..1` on both axes, `y` down).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Optional detector visibility score. Carried through, not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Pixel dimensions of the video frames, fixed for a whole video.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
}

impl FrameGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Convert a normalized landmark into pixel coordinates.
    #[inline]
    pub fn to_pixels(&self, landmark: &Landmark) -> Point2<f32> {
        pixel_point(landmark.x, landmark.y, self.width, self.height)
    }
}

impl fmt::Display for FrameGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Errors raised while reading body points out of a frame.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("body point `{0}` is missing from the frame")]
    MissingPoint(BodyPoint),
    #[error("body point `{0}` has a non-finite coordinate")]
    NonFinite(BodyPoint),
    #[error("expected {expected} landmarks, got {got}")]
    UnexpectedCount { expected: usize, got: usize },
}

/// Landmarks detected in one video frame.
///
/// Built once by the pose-estimation stage and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Zero-based position of the frame in the video.
    pub index: u64,
    pub geometry: FrameGeometry,
    landmarks: BTreeMap<BodyPoint, Landmark>,
}

impl LandmarkFrame {
    /// Empty frame; add points with [`LandmarkFrame::with_landmark`].
    pub fn new(index: u64, geometry: FrameGeometry) -> Self {
        Self {
            index,
            geometry,
            landmarks: BTreeMap::new(),
        }
    }

    pub fn from_landmarks(
        index: u64,
        geometry: FrameGeometry,
        landmarks: BTreeMap<BodyPoint, Landmark>,
    ) -> Self {
        Self {
            index,
            geometry,
            landmarks,
        }
    }

    /// Build a frame from the estimator's flat, index-ordered output.
    pub fn from_pose_array(
        index: u64,
        geometry: FrameGeometry,
        points: &[Landmark],
    ) -> Result<Self, LandmarkError> {
        if points.len() != POSE_LANDMARK_COUNT {
            return Err(LandmarkError::UnexpectedCount {
                expected: POSE_LANDMARK_COUNT,
                got: points.len(),
            });
        }
        let landmarks = BodyPoint::ALL.iter().copied().zip(points.iter().copied());
        Ok(Self::from_landmarks(index, geometry, landmarks.collect()))
    }

    pub fn with_landmark(mut self, point: BodyPoint, landmark: Landmark) -> Self {
        self.landmarks.insert(point, landmark);
        self
    }

    pub fn get(&self, point: BodyPoint) -> Option<&Landmark> {
        self.landmarks.get(&point)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyPoint, &Landmark)> + '_ {
        self.landmarks.iter().map(|(p, l)| (*p, l))
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Pixel position of `point`, failing if the point is absent or not finite.
    pub fn pixel(&self, point: BodyPoint) -> Result<Point2<f32>, LandmarkError> {
        let landmark = self
            .landmarks
            .get(&point)
            .ok_or(LandmarkError::MissingPoint(point))?;
        if !landmark.is_finite() {
            return Err(LandmarkError::NonFinite(point));
        }
        Ok(self.geometry.to_pixels(landmark))
    }
}
