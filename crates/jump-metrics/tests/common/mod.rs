#![allow(dead_code)]

use jump_metrics::core::{BodyPoint, FrameGeometry, Landmark, LandmarkFrame};
use jump_metrics::{LandmarkStream, StreamFrame};

pub const SIZE: u32 = 1000;

pub fn geometry() -> FrameGeometry {
    FrameGeometry::new(SIZE, SIZE)
}

/// Both legs in side view: given knee angle, toes on row `foot_y_px`.
pub fn leg_frame(index: u64, knee_angle_deg: f32, foot_y_px: f32) -> LandmarkFrame {
    let s = SIZE as f32;
    let rad = knee_angle_deg.to_radians();
    let (ankle_x, ankle_y) = (500.0 + 200.0 * rad.sin(), 500.0 - 200.0 * rad.cos());
    let point = |x: f32, y: f32| Landmark::new(x / s, y / s).with_visibility(0.99);
    LandmarkFrame::new(index, geometry())
        .with_landmark(BodyPoint::LeftHip, point(500.0, 300.0))
        .with_landmark(BodyPoint::RightHip, point(520.0, 300.0))
        .with_landmark(BodyPoint::LeftKnee, point(500.0, 500.0))
        .with_landmark(BodyPoint::RightKnee, point(520.0, 500.0))
        .with_landmark(BodyPoint::LeftAnkle, point(ankle_x, ankle_y))
        .with_landmark(BodyPoint::RightAnkle, point(ankle_x + 20.0, ankle_y))
        .with_landmark(BodyPoint::LeftFootIndex, point(450.0, foot_y_px))
        .with_landmark(BodyPoint::RightFootIndex, point(550.0, foot_y_px - 5.0))
}

/// Knee angle and toe row for each of the 60 frames of a countermovement
/// jump: stand, dip from frame 20, take off at 25, land at 40.
pub fn scenario_pose(i: u64) -> (f32, f32) {
    const DIP: [f32; 5] = [169.0, 150.0, 130.0, 110.0, 90.0];
    match i {
        0..=19 => (178.0, 100.0),
        20..=24 => (DIP[(i - 20) as usize], 100.0),
        25 => (90.0, 60.0),
        26..=34 => (90.0 + (i - 25) as f32 * 85.0 / 9.0, 60.0),
        35..=39 => (178.0, 60.0),
        40 => (170.0, 99.0),
        _ => (120.0, 100.0),
    }
}

pub fn scenario_stream(fps: f32) -> LandmarkStream {
    let mut stream = LandmarkStream::new(fps, geometry());
    for i in 0..60 {
        let (angle, foot) = scenario_pose(i);
        stream.push(StreamFrame::detected(&leg_frame(i, angle, foot)));
    }
    stream
}
