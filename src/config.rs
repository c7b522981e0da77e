use std::path::{Path, PathBuf};

use egui::Color32;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Environment variable naming the JSON config file.
pub const CONFIG_ENV_VAR: &str = "SKETCHPAD_CONFIG";

/// Application settings. Every section falls back to its defaults when
/// missing from the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub brush: BrushConfig,
    pub canvas: CanvasConfig,
    pub export: ExportConfig,
    pub bounce: BounceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Initial brush color as sRGB.
    pub color: [u8; 3],
    pub size: f32,
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            color: [0, 0, 0],
            size: 4.0,
            min_size: 1.0,
            max_size: 50.0,
        }
    }
}

impl BrushConfig {
    pub fn color32(&self) -> Color32 {
        let [r, g, b] = self.color;
        Color32::from_rgb(r, g, b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub background: [u8; 3],
    /// Quiet period before a resize or DPI change triggers a full redraw.
    pub resize_debounce_ms: u64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background: [255, 255, 255],
            resize_debounce_ms: 150,
        }
    }
}

impl CanvasConfig {
    pub fn background32(&self) -> Color32 {
        let [r, g, b] = self.background;
        Color32::from_rgb(r, g, b)
    }

    pub fn resize_debounce_secs(&self) -> f64 {
        self.resize_debounce_ms as f64 / 1000.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_prefix: "drawing".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceConfig {
    /// Size of the box the ball moves in, in points.
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    /// Downward acceleration in points per second squared.
    pub gravity: f32,
    /// Fraction of speed kept after hitting a wall or the floor.
    pub restitution: f32,
    pub initial_velocity: [f32; 2],
    /// Longest time step taken in one frame, in seconds.
    pub max_step_secs: f32,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 160.0,
            radius: 12.0,
            gravity: 600.0,
            restitution: 0.9,
            initial_velocity: [120.0, 0.0],
            max_step_secs: 0.1,
        }
    }
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by `SKETCHPAD_CONFIG`, or use defaults.
    ///
    /// A broken config file is logged and ignored.
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            match Self::load(Path::new(&path)) {
                Ok(config) => return config,
                Err(err) => log::warn!("Ignoring config file, using defaults: {err}"),
            }
        }
        Self::default()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let brush = &self.brush;
        if !(brush.min_size > 0.0 && brush.min_size <= brush.max_size) {
            return Err(ConfigError::Invalid(format!(
                "brush size range {}..={} must be positive and ordered",
                brush.min_size, brush.max_size
            )));
        }
        if !(brush.min_size..=brush.max_size).contains(&brush.size) {
            return Err(ConfigError::Invalid(format!(
                "brush size {} is outside {}..={}",
                brush.size, brush.min_size, brush.max_size
            )));
        }

        let bounce = &self.bounce;
        if bounce.radius <= 0.0
            || bounce.width < bounce.radius * 2.0
            || bounce.height < bounce.radius * 2.0
        {
            return Err(ConfigError::Invalid(
                "bounce box must fit the ball".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&bounce.restitution) {
            return Err(ConfigError::Invalid(format!(
                "restitution {} is outside 0..=1",
                bounce.restitution
            )));
        }
        if bounce.max_step_secs <= 0.0 {
            return Err(ConfigError::Invalid(
                "max_step_secs must be positive".to_owned(),
            ));
        }

        if self.export.file_prefix.is_empty() {
            return Err(ConfigError::Invalid("export file_prefix is empty".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config = Config::from_json(r#"{ "brush": { "size": 8.0 } }"#).unwrap();
        assert_eq!(config.brush.size, 8.0);
        assert_eq!(config.brush.max_size, 50.0);
        assert_eq!(config.export, ExportConfig::default());
    }

    #[test]
    fn test_rejects_brush_size_out_of_range() {
        let err = Config::from_json(r#"{ "brush": { "size": 80.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Config::from_json("{ brush: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = Config::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }
}
