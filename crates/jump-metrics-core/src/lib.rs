//! Core types for vertical-jump analysis.
//!
//! This crate is small and purely geometric. It knows nothing about video
//! decoding or pose estimation; it only describes what a pose estimator hands
//! over per frame (named body points in normalized image coordinates) and how
//! to measure joint angles from them.

mod geometry;
mod landmark;
mod logger;

pub use geometry::{angle_at, pixel_point};
pub use landmark::{
    BodyPoint, FrameGeometry, Landmark, LandmarkError, LandmarkFrame, POSE_LANDMARK_COUNT,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, LogFormat, LOG_ENV_VAR};
