// ⚙️ Application configuration
// Roster location, optional overlay image, output directory, overlay opacity.
// The binary fills this from CLI flags / environment; the engine only reads it.

use crate::error::{CommitteeError, CommitteeResult};
use crate::roster::DEFAULT_ROSTER_FILE;
use std::path::PathBuf;

/// Faint alpha used for the background overlay
pub const DEFAULT_OVERLAY_OPACITY: f32 = 0.1;

pub const ENV_ROSTER: &str = "COMMITTEE_ROSTER";
pub const ENV_OVERLAY: &str = "COMMITTEE_OVERLAY";
pub const ENV_OUTPUT_DIR: &str = "COMMITTEE_OUTPUT_DIR";
pub const ENV_OVERLAY_OPACITY: &str = "COMMITTEE_OVERLAY_OPACITY";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub roster_path: PathBuf,
    /// Background image drawn behind every document page; None = no overlay
    pub overlay_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub overlay_opacity: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            roster_path: PathBuf::from(DEFAULT_ROSTER_FILE),
            overlay_path: None,
            output_dir: PathBuf::from("."),
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
        }
    }
}

impl AppConfig {
    pub fn with_roster_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.roster_path = path.into();
        self
    }

    pub fn with_overlay_path(mut self, path: Option<PathBuf>) -> Self {
        self.overlay_path = path;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_overlay_opacity(mut self, opacity: f32) -> Self {
        self.overlay_opacity = opacity;
        self
    }

    /// Defaults overridden by whatever COMMITTEE_* variables are set
    pub fn from_env() -> CommitteeResult<Self> {
        let mut config = AppConfig::default();

        if let Some(path) = env_var(ENV_ROSTER) {
            config.roster_path = PathBuf::from(path);
        }
        if let Some(path) = env_var(ENV_OVERLAY) {
            config.overlay_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = env_var(ENV_OUTPUT_DIR) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = env_var(ENV_OVERLAY_OPACITY) {
            config.overlay_opacity = raw.trim().parse().map_err(|_| {
                CommitteeError::config(format!("{} must be a number, got {:?}", ENV_OVERLAY_OPACITY, raw))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CommitteeResult<()> {
        if !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(CommitteeError::config(format!(
                "overlay opacity must be within 0.0..=1.0, got {}",
                self.overlay_opacity
            )));
        }
        if self.roster_path.as_os_str().is_empty() {
            return Err(CommitteeError::config("roster path is empty"));
        }
        Ok(())
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
