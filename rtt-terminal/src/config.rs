//! Viewer configuration, read from an optional TOML file.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock demo scene.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::camera::ProjectionMode;
use crate::error::ViewerError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub target_fps: u32,
    /// Angular speed of the lamp's orbit, degrees per second
    pub light_speed: f32,
    pub sphere_density: u32,
    /// Factor applied to the camera's distance from the origin
    pub camera_zoom: f32,
    pub projection: ProjectionMode,
    /// `env_logger` filter, falls back to `RUST_LOG` when absent
    pub log_filter: Option<String>,
    /// Log destination; stderr would draw over the viewport
    pub log_file: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            light_speed: 45.0,
            sphere_density: 100,
            camera_zoom: 2.0,
            projection: ProjectionMode::Perspective,
            log_filter: None,
            log_file: None,
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ViewerError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ViewerError> {
        if self.target_fps == 0 {
            return Err(ViewerError::InvalidConfig(
                "target_fps must be at least 1".to_string(),
            ));
        }
        if !(self.camera_zoom.is_finite() && self.camera_zoom > 0.0) {
            return Err(ViewerError::InvalidConfig(format!(
                "camera_zoom must be positive, got {}",
                self.camera_zoom
            )));
        }
        if !self.light_speed.is_finite() {
            return Err(ViewerError::InvalidConfig(
                "light_speed must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ViewerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = ViewerConfig::from_toml_str(
            r#"
            target_fps = 60
            sphere_density = 24
            projection = "orthographic"
            log_filter = "rtt_core=debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.target_fps, 60);
        assert_eq!(config.sphere_density, 24);
        assert_eq!(config.projection, ProjectionMode::Orthographic);
        assert_eq!(config.log_filter.as_deref(), Some("rtt_core=debug"));
        assert_eq!(config.light_speed, 45.0);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            ViewerConfig::from_toml_str("target_fps = 0"),
            Err(ViewerError::InvalidConfig(_))
        ));
        assert!(matches!(
            ViewerConfig::from_toml_str("camera_zoom = -1.0"),
            Err(ViewerError::InvalidConfig(_))
        ));
        assert!(matches!(
            ViewerConfig::from_toml_str("target_fps = \"fast\""),
            Err(ViewerError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = ViewerConfig::load(Path::new("/nonexistent/rtt-viewer.toml"));
        assert!(matches!(result, Err(ViewerError::Io(_))));
    }
}
