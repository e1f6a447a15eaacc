//! Ground-level calibration from the first frames of a video.

use serde::{Deserialize, Serialize};

use crate::metrics::WriteOnce;

/// Collects foot heights (pixel rows, larger = lower on screen) during the
/// calibration window and resolves the ground level from them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundCalibration {
    window: u32,
    samples: Vec<f32>,
    ground_level: WriteOnce<f32>,
}

impl GroundCalibration {
    pub fn new(window: u32) -> Self {
        Self {
            window,
            samples: Vec::with_capacity(window as usize),
            ground_level: WriteOnce::unset(),
        }
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    /// True while `frame_index` falls inside the calibration window.
    #[inline]
    pub fn is_calibrating(&self, frame_index: u64) -> bool {
        frame_index < u64::from(self.window)
    }

    /// Record one foot-height sample. Ignored once the level is resolved.
    pub fn record(&mut self, foot_y: f32) {
        if self.ground_level.is_set() {
            return;
        }
        self.samples.push(foot_y);
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// The resolved ground level, `None` until [`GroundCalibration::resolve`]
    /// has succeeded.
    pub fn ground_level(&self) -> Option<f32> {
        self.ground_level.get()
    }

    /// Resolve the ground level (maximum sample) on first call and return it.
    ///
    /// Later calls return the stored value without looking at the samples
    /// again. Returns `None` while no sample has been recorded.
    pub fn resolve(&mut self) -> Option<f32> {
        if let Some(level) = self.ground_level.get() {
            return Some(level);
        }
        let level = self.samples.iter().copied().reduce(f32::max)?;
        self.ground_level.set(level);
        Some(level)
    }
}
