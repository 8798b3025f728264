//! Application configuration
//!
//! Read from TOML; every field has a default, so an empty file (or no file at
//! all) gives a working setup.
//!
//! ```toml
//! [display]
//! fps = 30
//! cell_aspect = 2.0      # terminal cells are about twice as tall as wide
//!
//! [lens]
//! fov_degrees = 90.0
//! near = 0.05
//! far = 100.0
//!
//! [controls]
//! move_speed = 0.2
//! fast_multiplier = 3.0
//! slow_multiplier = 0.25
//! look_step = 8.0        # pointer delta produced by one arrow key press
//! look_sensitivity = 0.005
//!
//! [lighting]
//! direction = [0.5, -1.0, 0.5]
//! ambient = 0.3
//!
//! [animation]
//! spin_degrees_per_second = 30.0
//! ```

use std::fs;
use std::path::Path;

use log::info;
use prism_core::{Lens, Lighting, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "prism.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub lens: LensConfig,
    pub controls: ControlsConfig,
    pub lighting: LightingConfig,
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Target frames per second
    pub fps: u32,
    /// Height of a terminal cell divided by its width
    pub cell_aspect: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            cell_aspect: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    /// Vertical field of view
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for LensConfig {
    fn default() -> Self {
        let lens = Lens::default();
        Self {
            fov_degrees: lens.fov_y.to_degrees(),
            near: lens.near,
            far: lens.far,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub move_speed: f32,
    pub fast_multiplier: f32,
    pub slow_multiplier: f32,
    pub look_step: f32,
    pub look_sensitivity: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.2,
            fast_multiplier: 3.0,
            slow_multiplier: 0.25,
            look_step: 8.0,
            look_sensitivity: 0.005,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Direction the light travels, normalized on use
    pub direction: [f32; 3],
    pub ambient: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            direction: [0.5, -1.0, 0.5],
            ambient: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Demo spin applied to every object; 0 disables it
    pub spin_degrees_per_second: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            spin_degrees_per_second: 30.0,
        }
    }
}

impl AppConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text, path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists, else
    /// the defaults. An explicit path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            Self::load_from_file(fallback)
        } else {
            info!("No {} found, using default config", DEFAULT_CONFIG_FILE);
            Ok(Self::default())
        }
    }

    pub fn lens(&self) -> Lens {
        Lens::new(self.lens.fov_degrees.to_radians(), self.lens.near, self.lens.far)
    }

    pub fn lighting(&self) -> Lighting {
        let [x, y, z] = self.lighting.direction;
        Lighting::new(Vec3::new(x, y, z), self.lighting.ambient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_toml("", Path::new("empty.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.display.fps, 30);
        assert_relative_eq!(config.lens().fov_y, Lens::default().fov_y, epsilon = 1e-5);
    }

    #[test]
    fn test_partial_override() {
        let text = r#"
            [display]
            fps = 60

            [lighting]
            ambient = 0.1
        "#;
        let config = AppConfig::from_toml(text, Path::new("partial.toml")).unwrap();
        assert_eq!(config.display.fps, 60);
        assert_eq!(config.display.cell_aspect, 2.0);
        assert_eq!(config.lighting.ambient, 0.1);
        assert_eq!(config.lighting.direction, [0.5, -1.0, 0.5]);
        assert_eq!(config.controls, ControlsConfig::default());
    }

    #[test]
    fn test_lens_conversion() {
        let text = "[lens]\nfov_degrees = 60.0\nnear = 0.5\n";
        let lens = AppConfig::from_toml(text, Path::new("lens.toml")).unwrap().lens();
        assert_relative_eq!(lens.fov_y, std::f32::consts::FRAC_PI_3, epsilon = 1e-6);
        assert_eq!(lens.near, 0.5);
        assert_eq!(lens.far, 100.0);
    }

    #[test]
    fn test_lighting_is_normalized() {
        let text = "[lighting]\ndirection = [0.0, -4.0, 0.0]\n";
        let lighting = AppConfig::from_toml(text, Path::new("light.toml")).unwrap().lighting();
        assert_relative_eq!(lighting.direction, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_bad_value_is_reported_with_path() {
        let err = AppConfig::from_toml("[display]\nfps = \"fast\"\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/prism.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
