//! Planar joint geometry.

use nalgebra::Point2;

/// Interior angle at vertex `b` of the polyline `a - b - c`, in degrees.
///
/// Computed as the difference of the polar angles of the rays `b -> c` and
/// `b -> a`, folded into `[0, 180]`. Coincident points do not panic: `atan2(0, 0)`
/// is `0`, so a degenerate ray contributes a polar angle of zero and the
/// result stays deterministic.
pub fn angle_at(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> f32 {
    let to_c = (c.y - b.y).atan2(c.x - b.x);
    let to_a = (a.y - b.y).atan2(a.x - b.x);
    let angle = (to_c - to_a).to_degrees().abs();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Scale a normalized `(x, y)` position into pixel coordinates.
#[inline]
pub fn pixel_point(x: f32, y: f32, width: u32, height: u32) -> Point2<f32> {
    Point2::new(x * width as f32, y * height as f32)
}
