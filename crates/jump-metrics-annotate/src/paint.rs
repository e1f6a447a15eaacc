//! Pixel painting on RGB frames.
//!
//! Lines use Bresenham's algorithm; everything is clipped to the image, so
//! landmarks slightly outside the frame are safe to draw.

use image::{Rgb as Pixel, RgbImage};
use jump_metrics_core::{pixel_point, LandmarkFrame};
use jump_metrics_detector::JumpSnapshot;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::hud::{build_overlay, HudOverlay, HudStyle, Rgb};
use crate::skeleton::LOWER_BODY_EDGES;

/// Colors and sizes used for the skeleton.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintStyle {
    pub bone_color: Rgb,
    pub joint_color: Rgb,
    pub joint_radius: i32,
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self {
            bone_color: [255, 255, 255],
            joint_color: [255, 0, 0],
            joint_radius: 3,
        }
    }
}

/// Blend the top-left `size`×`size` square toward black, keeping `keep` of
/// the original intensity.
pub fn darken_panel(img: &mut RgbImage, size: u32, keep: f32) {
    let keep = keep.clamp(0.0, 1.0);
    let w = size.min(img.width());
    let h = size.min(img.height());
    for y in 0..h {
        for x in 0..w {
            let px = img.get_pixel_mut(x, y);
            for c in px.0.iter_mut() {
                *c = (*c as f32 * keep).round() as u8;
            }
        }
    }
}

/// Draw the lower-body skeleton of `frame`, scaled to the image size.
///
/// Bones with a missing or non-finite endpoint are skipped.
pub fn draw_skeleton(img: &mut RgbImage, frame: &LandmarkFrame, style: &PaintStyle) {
    let (w, h) = img.dimensions();
    let to_px = |p| {
        frame
            .get(p)
            .filter(|l| l.is_finite())
            .map(|l| pixel_point(l.x, l.y, w, h))
    };

    for (a, b) in LOWER_BODY_EDGES {
        if let (Some(pa), Some(pb)) = (to_px(a), to_px(b)) {
            draw_line(img, pa, pb, style.bone_color);
        }
    }

    let mut joints: Vec<_> = LOWER_BODY_EDGES.iter().flat_map(|&(a, b)| [a, b]).collect();
    joints.sort();
    joints.dedup();
    for p in joints.into_iter().filter_map(to_px) {
        draw_disc(img, p, style.joint_radius, style.joint_color);
    }
}

/// Darken the metric panel, draw the skeleton (when a pose was found) and
/// return the text overlay for the frame.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip_all, fields(frame = snapshot.frame))
)]
pub fn annotate_frame(
    img: &mut RgbImage,
    landmarks: Option<&LandmarkFrame>,
    snapshot: &JumpSnapshot,
    hud: &HudStyle,
    paint: &PaintStyle,
) -> HudOverlay {
    darken_panel(img, hud.panel_size, hud.panel_keep);
    if let Some(frame) = landmarks {
        draw_skeleton(img, frame, paint);
    }
    build_overlay(snapshot, hud)
}

fn round_px(p: Point2<f32>) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: Rgb) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Pixel(color));
    }
}

fn draw_line(img: &mut RgbImage, from: Point2<f32>, to: Point2<f32>, color: Rgb) {
    let (mut x, mut y) = round_px(from);
    let (x1, y1) = round_px(to);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(img, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn draw_disc(img: &mut RgbImage, center: Point2<f32>, radius: i32, color: Rgb) {
    let (cx, cy) = round_px(center);
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jump_metrics_core::{BodyPoint, FrameGeometry, Landmark};
    use jump_metrics_detector::{JumpDetector, JumpParams};

    fn gray(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, Pixel([100, 150, 200]))
    }

    #[test]
    fn darkening_touches_only_the_panel() {
        let mut img = gray(400, 350);
        darken_panel(&mut img, 300, 0.2);
        assert_eq!(img.get_pixel(0, 0).0, [20, 30, 40]);
        assert_eq!(img.get_pixel(299, 299).0, [20, 30, 40]);
        assert_eq!(img.get_pixel(300, 0).0, [100, 150, 200]);
        assert_eq!(img.get_pixel(0, 300).0, [100, 150, 200]);
        assert_eq!(img.get_pixel(399, 349).0, [100, 150, 200]);
    }

    #[test]
    fn panel_larger_than_image_is_clipped() {
        let mut img = gray(50, 40);
        darken_panel(&mut img, 300, 0.0);
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn line_covers_both_endpoints_and_is_clipped() {
        let mut img = RgbImage::new(20, 20);
        draw_line(
            &mut img,
            Point2::new(2.0, 3.0),
            Point2::new(15.0, 11.0),
            [9, 9, 9],
        );
        assert_eq!(img.get_pixel(2, 3).0, [9, 9, 9]);
        assert_eq!(img.get_pixel(15, 11).0, [9, 9, 9]);

        draw_line(
            &mut img,
            Point2::new(-10.0, -10.0),
            Point2::new(30.0, 30.0),
            [7, 7, 7],
        );
        assert_eq!(img.get_pixel(19, 19).0, [7, 7, 7]);
    }

    #[test]
    fn skeleton_skips_missing_points() {
        let mut img = RgbImage::new(100, 100);
        let frame = LandmarkFrame::new(0, FrameGeometry::new(100, 100))
            .with_landmark(BodyPoint::LeftHip, Landmark::new(0.5, 0.2))
            .with_landmark(BodyPoint::LeftKnee, Landmark::new(0.5, 0.5))
            .with_landmark(BodyPoint::LeftAnkle, Landmark::new(f32::NAN, 0.8));
        let style = PaintStyle::default();
        draw_skeleton(&mut img, &frame, &style);

        assert_eq!(img.get_pixel(50, 20).0, style.joint_color);
        assert_eq!(img.get_pixel(50, 35).0, style.bone_color);
        // Nothing below the knee.
        assert!((60..100).all(|y| img.get_pixel(50, y).0 == [0, 0, 0]));
    }

    #[test]
    fn annotate_frame_returns_overlay_for_snapshot() {
        let det = JumpDetector::new(JumpParams::default(), 30.0, FrameGeometry::new(320, 320))
            .unwrap();
        let mut img = gray(320, 320);
        let hud = annotate_frame(
            &mut img,
            None,
            &det.snapshot(),
            &HudStyle::default(),
            &PaintStyle::default(),
        );
        assert!(hud.calibrating);
        assert_eq!(img.get_pixel(10, 10).0, [20, 30, 40]);
        assert_eq!(img.get_pixel(310, 310).0, [100, 150, 200]);
    }
}
