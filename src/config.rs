//! Engine configuration, loaded from a single YAML file.
//!
//! Every field has a default so a partial (or empty) file is valid.

use std::path::Path;

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

mod defaults {
    use glam::UVec2;

    pub fn fov() -> f64 {
        60.0
    }
    pub fn ray_count() -> usize {
        225
    }
    pub fn speed() -> f64 {
        3.0
    }
    pub fn rotation_speed() -> f64 {
        120.0
    }
    pub fn spawn() -> UVec2 {
        UVec2::new(1, 1)
    }
    pub fn window_width() -> u32 {
        800
    }
    pub fn window_height() -> u32 {
        800
    }
    pub fn max_frame_dt() -> f64 {
        0.1
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub view: ViewSettings,

    #[serde(default)]
    pub viewer: ViewerSettings,

    #[serde(default)]
    pub window: WindowSettings,
}

/// Ray fan settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Total angular width of the fan (degrees)
    #[serde(default = "defaults::fov")]
    pub fov: f64,

    /// Rays cast per frame
    #[serde(default = "defaults::ray_count")]
    pub ray_count: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            fov: defaults::fov(),
            ray_count: defaults::ray_count(),
        }
    }
}

/// Viewer movement settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewerSettings {
    /// Cells per second
    #[serde(default = "defaults::speed")]
    pub speed: f64,

    /// Degrees per second
    #[serde(default = "defaults::rotation_speed")]
    pub rotation_speed: f64,

    /// Cell the viewer starts in; it is placed at the cell's centre
    #[serde(default = "defaults::spawn")]
    pub spawn: UVec2,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            speed: defaults::speed(),
            rotation_speed: defaults::rotation_speed(),
            spawn: defaults::spawn(),
        }
    }
}

/// Visualizer window settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default = "defaults::window_width")]
    pub width: u32,

    #[serde(default = "defaults::window_height")]
    pub height: u32,

    /// Upper bound on the elapsed time fed to one frame (seconds)
    #[serde(default = "defaults::max_frame_dt")]
    pub max_frame_dt: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: defaults::window_width(),
            height: defaults::window_height(),
            max_frame_dt: defaults::max_frame_dt(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let view = &self.view;
        if !(view.fov > 0.0 && view.fov <= 360.0) {
            return Err(ConfigError::Invalid(format!(
                "view.fov must be in (0, 360], got {}",
                view.fov
            )));
        }
        if view.ray_count == 0 {
            return Err(ConfigError::Invalid(
                "view.ray_count must be at least 1".to_string(),
            ));
        }
        let viewer = &self.viewer;
        if !(viewer.speed > 0.0 && viewer.speed.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "viewer.speed must be finite and positive, got {}",
                viewer.speed
            )));
        }
        if !(viewer.rotation_speed > 0.0 && viewer.rotation_speed.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "viewer.rotation_speed must be finite and positive, got {}",
                viewer.rotation_speed
            )));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(
                "window dimensions must be non-zero".to_string(),
            ));
        }
        if !(self.window.max_frame_dt > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "window.max_frame_dt must be positive, got {}",
                self.window.max_frame_dt
            )));
        }
        Ok(())
    }
}
