//! Metric panel model.

use jump_metrics_detector::{JumpPhase, JumpSnapshot};
use serde::{Deserialize, Serialize};

/// 8-bit RGB color.
pub type Rgb = [u8; 3];

const LABEL_GRAY: Rgb = [200, 200, 200];
const GREEN: Rgb = [0, 255, 0];
const YELLOW: Rgb = [255, 255, 0];
const RED: Rgb = [255, 0, 0];
const TEMPO_BLUE: Rgb = [0, 200, 255];

const PLACEHOLDER: &str = "--";

/// Thresholds and layout of the metric panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudStyle {
    /// Dip angles inside `[min, max]` (degrees) are shown as on target.
    pub dip_band_deg: [f32; 2],
    /// Dips at or above this angle are not shown.
    pub dip_display_limit_deg: f32,
    /// Extensions above this angle are shown as good.
    pub extension_good_deg: f32,
    /// Side of the square panel in the top-left corner (px).
    pub panel_size: u32,
    /// Weight of the original pixels inside the panel.
    pub panel_keep: f32,
}

impl Default for HudStyle {
    fn default() -> Self {
        Self {
            dip_band_deg: [80.0, 110.0],
            dip_display_limit_deg: 179.0,
            extension_good_deg: 165.0,
            panel_size: 300,
            panel_keep: 0.2,
        }
    }
}

/// One positioned text line. `origin` is the baseline start in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HudLine {
    pub text: String,
    pub origin: [i32; 2],
    pub scale: f32,
    pub color: Rgb,
}

impl HudLine {
    fn new(text: impl Into<String>, origin: [i32; 2], scale: f32, color: Rgb) -> Self {
        Self {
            text: text.into(),
            origin,
            scale,
            color,
        }
    }
}

/// Everything drawn on the metric panel for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HudOverlay {
    pub frame: Option<u64>,
    pub phase: JumpPhase,
    pub calibrating: bool,
    pub lines: Vec<HudLine>,
}

impl HudOverlay {
    /// Line whose text starts with `prefix`, if any.
    pub fn line(&self, prefix: &str) -> Option<&HudLine> {
        self.lines.iter().find(|l| l.text.starts_with(prefix))
    }
}

/// Build the panel for a detector snapshot.
pub fn build_overlay(snapshot: &JumpSnapshot, style: &HudStyle) -> HudOverlay {
    let metrics = &snapshot.metrics;
    let mut lines = Vec::with_capacity(9);

    lines.push(HudLine::new("HEIGHT:", [20, 40], 0.6, LABEL_GRAY));
    let height = metrics
        .jump_height_cm()
        .map(|h| format!("{h:.1} cm"))
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    lines.push(HudLine::new(height, [20, 80], 1.2, GREEN));

    lines.push(HudLine::new("DIP:", [20, 120], 0.5, LABEL_GRAY));
    let dip = metrics.min_knee_angle();
    let [band_lo, band_hi] = style.dip_band_deg;
    let dip_color = match dip {
        Some(a) if (band_lo..=band_hi).contains(&a) => YELLOW,
        _ => RED,
    };
    let dip_text = match dip {
        Some(a) if a < style.dip_display_limit_deg => format!("{} deg", a as i32),
        _ => PLACEHOLDER.to_string(),
    };
    lines.push(HudLine::new(dip_text, [20, 145], 0.8, dip_color));

    lines.push(HudLine::new("EXTENSION:", [20, 180], 0.5, LABEL_GRAY));
    let ext = metrics.max_extension_angle();
    let ext_color = match ext {
        Some(a) if a > style.extension_good_deg => GREEN,
        _ => RED,
    };
    let ext_text = ext
        .map(|a| format!("{} deg", a as i32))
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    lines.push(HudLine::new(ext_text, [20, 205], 0.8, ext_color));

    if snapshot.calibrating {
        lines.push(HudLine::new("CALIBRATING...", [20, 250], 0.8, YELLOW));
    }

    if let Some(t) = metrics.contraction_time_s() {
        lines.push(HudLine::new(
            format!("TEMPO: {t:.2}s"),
            [20, 280],
            0.6,
            TEMPO_BLUE,
        ));
    }

    HudOverlay {
        frame: snapshot.frame,
        phase: snapshot.phase,
        calibrating: snapshot.calibrating,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jump_metrics_core::{BodyPoint, FrameGeometry, Landmark, LandmarkFrame};
    use jump_metrics_detector::{FrameMeasurement, JumpDetector, JumpParams};

    fn detector() -> JumpDetector {
        let params = JumpParams {
            calibration_frames: 1,
            ..JumpParams::default()
        };
        JumpDetector::new(params, 30.0, FrameGeometry::new(1000, 1000)).unwrap()
    }

    fn m(knee_angle_deg: f32, foot_y: f32) -> FrameMeasurement {
        FrameMeasurement {
            knee_angle_deg,
            foot_y,
        }
    }

    fn text(hud: &HudOverlay, line: usize) -> &str {
        &hud.lines[line].text
    }

    #[test]
    fn fresh_detector_shows_placeholders() {
        let det = detector();
        let hud = build_overlay(&det.snapshot(), &HudStyle::default());
        assert!(hud.calibrating);
        assert_eq!(text(&hud, 1), "--");
        assert_eq!(text(&hud, 3), "--");
        assert_eq!(text(&hud, 5), "--");
        assert_eq!(hud.lines[3].color, RED);
        assert!(hud.line("CALIBRATING").is_some());
        assert!(hud.line("TEMPO").is_none());
    }

    #[test]
    fn shallow_dip_is_hidden_and_deep_dip_in_band_is_yellow() {
        let mut det = detector();
        det.update_measured(m(178.0, 100.0));
        det.update_measured(m(179.5, 100.0));
        let hud = build_overlay(&det.snapshot(), &HudStyle::default());
        assert!(!hud.calibrating);
        assert_eq!(text(&hud, 3), "--");

        det.update_measured(m(95.7, 100.0));
        let hud = build_overlay(&det.snapshot(), &HudStyle::default());
        assert_eq!(text(&hud, 3), "95 deg");
        assert_eq!(hud.lines[3].color, YELLOW);

        det.update_measured(m(60.0, 100.0));
        let hud = build_overlay(&det.snapshot(), &HudStyle::default());
        assert_eq!(hud.lines[3].color, RED);
    }

    #[test]
    fn full_jump_fills_every_line() {
        let mut det = detector();
        det.update_measured(m(178.0, 100.0));
        det.update_measured(m(160.0, 100.0));
        det.update_measured(m(100.0, 100.0));
        det.update_measured(m(100.0, 40.0));
        for _ in 0..14 {
            det.update_measured(m(170.0, 40.0));
        }
        det.update_measured(m(170.0, 99.5));

        let hud = build_overlay(&det.snapshot(), &HudStyle::default());
        assert_eq!(hud.phase, JumpPhase::Landed);
        assert_eq!(text(&hud, 1), "30.6 cm");
        assert_eq!(text(&hud, 5), "170 deg");
        assert_eq!(hud.lines[5].color, GREEN);
        let tempo = hud.line("TEMPO").unwrap();
        assert_eq!(tempo.text, "TEMPO: 0.07s");
        assert_eq!(tempo.origin, [20, 280]);
    }

    #[test]
    fn overlay_is_built_from_a_copy() {
        let mut det = detector();
        let frame = LandmarkFrame::new(0, FrameGeometry::new(1000, 1000))
            .with_landmark(BodyPoint::LeftHip, Landmark::new(0.5, 0.3))
            .with_landmark(BodyPoint::LeftKnee, Landmark::new(0.5, 0.5))
            .with_landmark(BodyPoint::LeftAnkle, Landmark::new(0.5, 0.7))
            .with_landmark(BodyPoint::LeftFootIndex, Landmark::new(0.5, 0.9))
            .with_landmark(BodyPoint::RightFootIndex, Landmark::new(0.6, 0.9));
        det.update(Some(&frame)).unwrap();
        let snap = det.snapshot();
        let before = *det.metrics();
        let _ = build_overlay(&snap, &HudStyle::default());
        assert_eq!(*det.metrics(), before);
        assert_eq!(snap.frame, Some(0));
    }

    #[test]
    fn overlay_serializes_for_json_lines() {
        let det = detector();
        let hud = build_overlay(&det.snapshot(), &HudStyle::default());
        let json = serde_json::to_string(&hud).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"phase\":\"ground\""));
    }
}
