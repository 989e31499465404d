//! Persistent tool settings.

use crate::entity::{DEFAULT_LAYER, Pen};
use crate::geometry::AnchorMode;
use crate::snap::{ENTITY_SNAP_THRESHOLD, GRID_SIZE, SnapMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Settings errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// User defaults applied when a tool starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Segment length new tools start with.
    pub default_length: f64,
    pub anchor: AnchorMode,
    pub snap_mode: SnapMode,
    pub grid_size: f64,
    /// Entity snap distance in screen units.
    pub snap_threshold: f64,
    /// Layer new entities go to.
    pub layer: String,
    pub pen: Pen,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            default_length: 1.0,
            anchor: AnchorMode::Start,
            snap_mode: SnapMode::None,
            grid_size: GRID_SIZE,
            snap_threshold: ENTITY_SNAP_THRESHOLD,
            layer: DEFAULT_LAYER.to_string(),
            pen: Pen::default(),
        }
    }
}

impl ToolSettings {
    /// Platform settings location, e.g. `~/.config/anglecad/settings.json`.
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("anglecad").join(SETTINGS_FILE))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Load settings from `path`.
    pub fn load(path: &Path) -> SettingsResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings from `path`, falling back to defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> SettingsResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json(&self) -> SettingsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ToolSettings::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, ToolSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = ToolSettings {
            default_length: 12.5,
            anchor: AnchorMode::Middle,
            snap_mode: SnapMode::All,
            layer: "walls".to_string(),
            ..ToolSettings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(ToolSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "default_length": 3.0, "snap_mode": "grid" }"#).unwrap();

        let settings = ToolSettings::load(&path).unwrap();
        assert_eq!(settings.default_length, 3.0);
        assert_eq!(settings.snap_mode, SnapMode::Grid);
        assert_eq!(settings.grid_size, GRID_SIZE);
        assert_eq!(settings.anchor, AnchorMode::Start);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ToolSettings::load(&path),
            Err(SettingsError::Parse { .. })
        ));
    }
}
