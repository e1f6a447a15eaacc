//! Frame annotation for jump analysis.
//!
//! The annotator never touches the detector; it reads a
//! [`jump_metrics_detector::JumpSnapshot`] per frame and produces:
//! - a [`HudOverlay`]: positioned, colored text lines for the metric panel,
//! - optionally, pixels: the darkened panel and the leg skeleton painted onto an
//!   `image::RgbImage`.
//!
//! Glyph rendering is left to whoever draws the overlay text.

mod hud;
mod paint;
mod skeleton;

pub use hud::{build_overlay, HudLine, HudOverlay, HudStyle, Rgb};
pub use paint::{annotate_frame, darken_panel, draw_skeleton, PaintStyle};
pub use skeleton::{SkeletonEdge, LOWER_BODY_EDGES};
