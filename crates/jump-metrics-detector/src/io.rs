//! JSON configuration and report helpers.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::params::{JumpParams, ParamsError};
use crate::report::JumpReport;

#[derive(thiserror::Error, Debug)]
pub enum JumpIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Analysis configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JumpConfig {
    #[serde(default)]
    pub detector: JumpParams,
    /// Frame rate to use instead of the one reported by the video.
    #[serde(default)]
    pub fps_override: Option<f32>,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Optional JSON-lines file receiving one HUD overlay per frame.
    #[serde(default)]
    pub hud_path: Option<String>,
}

impl JumpConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, JumpIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), JumpIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("jump_report.json"))
    }

    /// Frame rate to analyze with, given the one the video reports.
    pub fn effective_fps(&self, reported: f32) -> f32 {
        self.fps_override.unwrap_or(reported)
    }

    /// Validated detector parameters.
    pub fn build_params(&self) -> Result<JumpParams, ParamsError> {
        self.detector.validate()?;
        Ok(self.detector.clone())
    }
}

impl JumpReport {
    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, JumpIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), JumpIoError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
