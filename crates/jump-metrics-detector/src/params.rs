use log::warn;
use serde::{Deserialize, Serialize};

/// Frame rate assumed when the video reports none (zero, negative or NaN).
pub const DEFAULT_FPS: f32 = 30.0;

/// Tunables of the jump detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpParams {
    /// Number of leading frames used to calibrate the ground level.
    pub calibration_frames: u32,
    /// Fraction of the frame height the foot must rise above ground level
    /// to count as takeoff.
    pub takeoff_margin: f32,
    /// Fraction of the frame height within which the foot counts as back on
    /// the ground. Kept tighter than `takeoff_margin` so the flight window is
    /// not cut short.
    pub landing_margin: f32,
    /// Knee extension is sampled while the airborne frame count is below this.
    pub extension_window: u32,
    /// Knee angle (degrees) below which the countermovement is considered started.
    pub dip_onset_deg: f32,
}

impl Default for JumpParams {
    fn default() -> Self {
        Self {
            calibration_frames: 20,
            takeoff_margin: 0.03,
            landing_margin: 0.01,
            extension_window: 10,
            dip_onset_deg: 170.0,
        }
    }
}

/// Parameter validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("calibration_frames must be >= 1")]
    EmptyCalibrationWindow,
    #[error("{name} must be in [0, 1), got {value}")]
    InvalidMargin { name: &'static str, value: f32 },
    #[error("landing_margin ({landing}) must not exceed takeoff_margin ({takeoff})")]
    MarginOrder { takeoff: f32, landing: f32 },
    #[error("extension_window must be >= 1")]
    EmptyExtensionWindow,
    #[error("dip_onset_deg must be in (0, 180], got {0}")]
    InvalidDipThreshold(f32),
    #[error("frame height must be > 0")]
    EmptyFrame,
}

impl JumpParams {
    /// Check every field; the detector refuses to start with invalid params.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.calibration_frames == 0 {
            return Err(ParamsError::EmptyCalibrationWindow);
        }
        check_margin("takeoff_margin", self.takeoff_margin)?;
        check_margin("landing_margin", self.landing_margin)?;
        if self.landing_margin > self.takeoff_margin {
            return Err(ParamsError::MarginOrder {
                takeoff: self.takeoff_margin,
                landing: self.landing_margin,
            });
        }
        if self.extension_window == 0 {
            return Err(ParamsError::EmptyExtensionWindow);
        }
        if !self.dip_onset_deg.is_finite() || self.dip_onset_deg <= 0.0 || self.dip_onset_deg > 180.0
        {
            return Err(ParamsError::InvalidDipThreshold(self.dip_onset_deg));
        }
        Ok(())
    }
}

fn check_margin(name: &'static str, value: f32) -> Result<(), ParamsError> {
    if !value.is_finite() || !(0.0..1.0).contains(&value) {
        return Err(ParamsError::InvalidMargin { name, value });
    }
    Ok(())
}

/// Replace an unusable frame rate with [`DEFAULT_FPS`].
pub fn sanitize_fps(fps: f32) -> f32 {
    if fps.is_finite() && fps > 0.0 {
        fps
    } else {
        warn!("invalid frame rate {fps}, assuming {DEFAULT_FPS} fps");
        DEFAULT_FPS
    }
}
