//! Per-frame measurements: knee angle and foot height in pixels.

use jump_metrics_core::{angle_at, BodyPoint, LandmarkError, LandmarkFrame};
use serde::{Deserialize, Serialize};

/// The two scalars the detector reads from a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameMeasurement {
    /// Left knee angle (hip, knee, ankle) in degrees.
    pub knee_angle_deg: f32,
    /// Lowest on-screen toe tip, in pixel rows.
    pub foot_y: f32,
}

impl FrameMeasurement {
    pub const HIP: BodyPoint = BodyPoint::LeftHip;
    pub const KNEE: BodyPoint = BodyPoint::LeftKnee;
    pub const ANKLE: BodyPoint = BodyPoint::LeftAnkle;
    pub const TOES: [BodyPoint; 2] = [BodyPoint::LeftFootIndex, BodyPoint::RightFootIndex];

    /// Measure a frame; fails if any required body point is missing.
    pub fn from_frame(frame: &LandmarkFrame) -> Result<Self, LandmarkError> {
        let hip = frame.pixel(Self::HIP)?;
        let knee = frame.pixel(Self::KNEE)?;
        let ankle = frame.pixel(Self::ANKLE)?;
        let [left_toe, right_toe] = Self::TOES;
        let foot_y = frame.pixel(left_toe)?.y.max(frame.pixel(right_toe)?.y);
        Ok(Self {
            knee_angle_deg: angle_at(hip, knee, ankle),
            foot_y,
        })
    }
}
