//! Final report of one jump attempt.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detector::JumpPhase;
use crate::metrics::JumpMetrics;

/// Knee angle reported when no dip was measured.
pub const KNEE_ANGLE_SENTINEL_DEG: f32 = 180.0;
/// Extension angle reported when no extension was measured.
pub const EXTENSION_SENTINEL_DEG: f32 = 0.0;

/// Final metrics of one jump attempt.
///
/// Unmeasured values are `None` (`null` in JSON).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JumpReport {
    pub fps: f32,
    pub frames_processed: u64,
    pub phase: JumpPhase,
    pub ground_level_px: Option<f32>,
    pub jump_height_cm: Option<f32>,
    pub flight_time_s: Option<f32>,
    pub airborne_frames: u32,
    pub min_knee_angle_deg: Option<f32>,
    pub max_extension_angle_deg: Option<f32>,
    pub contraction_time_s: Option<f32>,
    pub dip_onset_frame: Option<u64>,
    pub takeoff_frame: Option<u64>,
    pub landing_frame: Option<u64>,
}

impl JumpReport {
    pub(crate) fn from_state(
        fps: f32,
        frames_processed: u64,
        phase: JumpPhase,
        ground_level_px: Option<f32>,
        metrics: &JumpMetrics,
    ) -> Self {
        Self {
            fps,
            frames_processed,
            phase,
            ground_level_px,
            jump_height_cm: metrics.jump_height_cm(),
            flight_time_s: metrics.flight_time_s(),
            airborne_frames: metrics.airborne_frames(),
            min_knee_angle_deg: metrics.min_knee_angle(),
            max_extension_angle_deg: metrics.max_extension_angle(),
            contraction_time_s: metrics.contraction_time_s(),
            dip_onset_frame: metrics.dip_onset_frame(),
            takeoff_frame: metrics.takeoff_frame(),
            landing_frame: metrics.landing_frame(),
        }
    }

    /// True if the jump was followed all the way to the landing.
    pub fn is_complete(&self) -> bool {
        self.phase == JumpPhase::Landed
    }

    /// Jump height, `0.0` if the landing was never seen.
    pub fn jump_height_or_zero(&self) -> f32 {
        self.jump_height_cm.unwrap_or(0.0)
    }

    /// Deepest knee angle, or [`KNEE_ANGLE_SENTINEL_DEG`].
    pub fn min_knee_angle_or_sentinel(&self) -> f32 {
        self.min_knee_angle_deg.unwrap_or(KNEE_ANGLE_SENTINEL_DEG)
    }

    /// Peak takeoff extension, or [`EXTENSION_SENTINEL_DEG`].
    pub fn max_extension_angle_or_sentinel(&self) -> f32 {
        self.max_extension_angle_deg.unwrap_or(EXTENSION_SENTINEL_DEG)
    }
}

struct Measured<'a>(Option<f32>, &'a str, usize);

impl fmt::Display for Measured<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.*} {}", self.2, v, self.1),
            None => f.write_str("--"),
        }
    }
}

impl fmt::Display for JumpReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(40);
        writeln!(f, "{rule}")?;
        writeln!(f, "FINAL METRICS:")?;
        writeln!(f, "Height: {}", Measured(self.jump_height_cm, "cm", 1))?;
        writeln!(f, "Dip: {}", Measured(self.min_knee_angle_deg, "deg", 0))?;
        writeln!(
            f,
            "Extension: {}",
            Measured(self.max_extension_angle_deg, "deg", 0)
        )?;
        writeln!(
            f,
            "Contraction time: {}",
            Measured(self.contraction_time_s, "s", 2)
        )?;
        write!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> JumpReport {
        JumpReport::from_state(30.0, 0, JumpPhase::Ground, None, &JumpMetrics::default())
    }

    #[test]
    fn incomplete_report_uses_sentinels() {
        let r = empty();
        assert!(!r.is_complete());
        assert_eq!(r.jump_height_or_zero(), 0.0);
        assert_eq!(r.min_knee_angle_or_sentinel(), 180.0);
        assert_eq!(r.max_extension_angle_or_sentinel(), 0.0);
    }

    #[test]
    fn display_shows_placeholders_and_values() {
        let mut r = empty();
        let text = r.to_string();
        assert!(text.contains("Height: --"));
        assert!(text.contains("Contraction time: --"));

        r.jump_height_cm = Some(30.65);
        r.min_knee_angle_deg = Some(90.4);
        r.contraction_time_s = Some(5.0 / 30.0);
        let text = r.to_string();
        assert!(text.contains("Height: 30.6 cm") || text.contains("Height: 30.7 cm"));
        assert!(text.contains("Dip: 90 deg"));
        assert!(text.contains("Contraction time: 0.17 s"));
    }

    #[test]
    fn unmeasured_fields_serialize_as_null() {
        let json = serde_json::to_value(empty()).unwrap();
        assert!(json["jump_height_cm"].is_null());
        assert_eq!(json["phase"], "ground");
        assert_eq!(json["airborne_frames"], 0);
    }
}
