//! Flight-time kinematics.

/// Height coefficient in cm/s² for `h = C · t²`, with `t` the flight time.
///
/// Projectile motion with equal takeoff and landing height gives
/// `h = g · t² / 8`, i.e. `100 · 9.8 / 8 = 122.5` cm/s². The detector uses the
/// empirically calibrated 122.6 instead; reports stay comparable only as long
/// as this literal is kept.
pub const FLIGHT_HEIGHT_COEFF_CM: f32 = 122.6;

/// Flight time in seconds for `airborne_frames` frames at `fps`.
#[inline]
pub fn flight_time_s(airborne_frames: u32, fps: f32) -> f32 {
    airborne_frames as f32 / fps
}

/// Jump height in centimeters for a flight time in seconds.
#[inline]
pub fn jump_height_cm(flight_time_s: f32) -> f32 {
    FLIGHT_HEIGHT_COEFF_CM * flight_time_s * flight_time_s
}

/// Seconds between the dip-onset frame and the takeoff frame.
#[inline]
pub fn contraction_time_s(dip_onset_frame: u64, takeoff_frame: u64, fps: f32) -> f32 {
    takeoff_frame.saturating_sub(dip_onset_frame) as f32 / fps
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn half_second_flight() {
        let t = flight_time_s(15, 30.0);
        assert_abs_diff_eq!(t, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(jump_height_cm(t), 30.65, epsilon = 1e-4);
    }

    #[test]
    fn no_flight_no_height() {
        assert_eq!(jump_height_cm(flight_time_s(0, 30.0)), 0.0);
    }

    #[test]
    fn contraction_between_frames() {
        assert_abs_diff_eq!(contraction_time_s(20, 25, 30.0), 5.0 / 30.0, epsilon = 1e-6);
        assert_eq!(contraction_time_s(25, 25, 30.0), 0.0);
    }
}
