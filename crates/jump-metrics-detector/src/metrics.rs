//! Per-attempt metric accumulators.
//!
//! "Unmeasured" is `None` everywhere; nothing here uses magic numbers.

use serde::{Deserialize, Serialize};

/// A value that can be written once and never overwritten.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WriteOnce<T>(Option<T>);

impl<T> Default for WriteOnce<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T: Copy> WriteOnce<T> {
    pub const fn unset() -> Self {
        Self(None)
    }

    pub fn get(&self) -> Option<T> {
        self.0
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Store `value` if nothing is stored yet. Returns whether it was written.
    pub fn set(&mut self, value: T) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(value);
        true
    }
}

/// Running minimum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinTracker(Option<f32>);

impl MinTracker {
    /// Fold `value` in; returns true if it became the new minimum.
    pub fn observe(&mut self, value: f32) -> bool {
        match self.0 {
            Some(current) if value >= current => false,
            _ => {
                self.0 = Some(value);
                true
            }
        }
    }

    pub fn value(&self) -> Option<f32> {
        self.0
    }
}

/// Running maximum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaxTracker(Option<f32>);

impl MaxTracker {
    /// Fold `value` in; returns true if it became the new maximum.
    pub fn observe(&mut self, value: f32) -> bool {
        match self.0 {
            Some(current) if value <= current => false,
            _ => {
                self.0 = Some(value);
                true
            }
        }
    }

    pub fn value(&self) -> Option<f32> {
        self.0
    }
}

/// Metrics accumulated over one jump attempt.
///
/// Only the detector writes into this; everyone else gets a copy through
/// [`crate::JumpSnapshot`] or the final [`crate::JumpReport`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JumpMetrics {
    pub(crate) min_knee_angle: MinTracker,
    pub(crate) max_extension_angle: MaxTracker,
    pub(crate) dip_onset_frame: WriteOnce<u64>,
    pub(crate) takeoff_frame: WriteOnce<u64>,
    pub(crate) landing_frame: WriteOnce<u64>,
    pub(crate) contraction_time_s: WriteOnce<f32>,
    pub(crate) airborne_frames: u32,
    pub(crate) flight_time_s: WriteOnce<f32>,
    pub(crate) jump_height_cm: WriteOnce<f32>,
}

impl JumpMetrics {
    /// Deepest knee angle seen on the ground (degrees).
    pub fn min_knee_angle(&self) -> Option<f32> {
        self.min_knee_angle.value()
    }

    /// Largest knee angle seen in the extension window after takeoff (degrees).
    pub fn max_extension_angle(&self) -> Option<f32> {
        self.max_extension_angle.value()
    }

    pub fn dip_onset_frame(&self) -> Option<u64> {
        self.dip_onset_frame.get()
    }

    pub fn takeoff_frame(&self) -> Option<u64> {
        self.takeoff_frame.get()
    }

    pub fn landing_frame(&self) -> Option<u64> {
        self.landing_frame.get()
    }

    /// Seconds from dip onset to takeoff.
    pub fn contraction_time_s(&self) -> Option<f32> {
        self.contraction_time_s.get()
    }

    /// Frames processed while airborne.
    pub fn airborne_frames(&self) -> u32 {
        self.airborne_frames
    }

    pub fn flight_time_s(&self) -> Option<f32> {
        self.flight_time_s.get()
    }

    pub fn jump_height_cm(&self) -> Option<f32> {
        self.jump_height_cm.get()
    }
}
