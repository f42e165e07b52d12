//! Editor configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::style::ColorRgba;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables for the editor. Every field has a default, so a partial JSON
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas and frame raster size in pixels.
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Playback interval bounds, in seconds.
    pub min_interval_secs: f64,
    pub initial_interval_secs: f64,
    pub max_interval_secs: f64,
    /// Allowed draw widths.
    pub min_width: f64,
    pub max_width: f64,
    pub pencil_width: f64,
    pub eraser_width: f64,
    pub draw_color: ColorRgba,
    /// Recently used colours, oldest first.
    pub palette: Vec<ColorRgba>,
    /// Minimum distance between brush stamps.
    pub brush_spacing: f64,
    /// Brush stamp height.
    pub stamp_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            min_interval_secs: 0.010,
            initial_interval_secs: 0.116,
            max_interval_secs: 0.250,
            min_width: 2.0,
            max_width: 15.0,
            pencil_width: 5.0,
            eraser_width: 10.0,
            draw_color: ColorRgba::DENIM,
            palette: vec![
                ColorRgba::GREEN,
                ColorRgba::MAGENTA,
                ColorRgba::YELLOW,
                ColorRgba::DENIM,
            ],
            brush_spacing: 20.0,
            stamp_size: 20.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas size {}x{} must be positive",
                self.canvas_width, self.canvas_height
            )));
        }
        let intervals_ordered = 0.0 < self.min_interval_secs
            && self.min_interval_secs <= self.initial_interval_secs
            && self.initial_interval_secs <= self.max_interval_secs
            && self.max_interval_secs.is_finite();
        if !intervals_ordered {
            return Err(ConfigError::Invalid(format!(
                "intervals must satisfy 0 < min <= initial <= max, got {} / {} / {}",
                self.min_interval_secs, self.initial_interval_secs, self.max_interval_secs
            )));
        }
        if !(0.0 < self.min_width && self.min_width <= self.max_width && self.max_width.is_finite())
        {
            return Err(ConfigError::Invalid(format!(
                "width bounds {}..{} are inverted or non-positive",
                self.min_width, self.max_width
            )));
        }
        if !(self.brush_spacing >= 0.0 && self.stamp_size > 0.0) {
            return Err(ConfigError::Invalid(
                "brush spacing and stamp size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Clamp a requested draw width into the allowed range.
    pub fn clamp_width(&self, width: f64) -> f64 {
        width.clamp(self.min_width, self.max_width)
    }

    pub fn initial_interval(&self) -> Duration {
        Duration::from_secs_f64(self.initial_interval_secs)
    }

    /// Playback interval for a speed slider value in seconds: the faster
    /// the speed, the shorter the interval.
    pub fn interval_for_speed(&self, speed: f64) -> Result<Duration, ConfigError> {
        if !speed.is_finite() {
            return Err(ConfigError::Invalid(format!("playback speed {} is not finite", speed)));
        }
        let secs = (self.max_interval_secs - speed)
            .clamp(self.min_interval_secs, self.max_interval_secs);
        Ok(Duration::from_secs_f64(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.palette.len(), 4);
        assert_eq!(config.palette.last(), Some(&ColorRgba::DENIM));
        assert!((config.initial_interval().as_secs_f64() - 0.116).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "canvas_width": 320, "pencil_width": 7.0 }"#)
            .unwrap();
        assert_eq!(config.canvas_width, 320);
        assert_eq!(config.canvas_height, 600);
        assert_eq!(config.pencil_width, 7.0);
        assert_eq!(config.eraser_width, 10.0);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(matches!(
            EditorConfig::from_json(r#"{ "canvas_width": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "min_width": 20.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_clamp_width() {
        let config = EditorConfig::default();
        assert_eq!(config.clamp_width(1.0), 2.0);
        assert_eq!(config.clamp_width(8.0), 8.0);
        assert_eq!(config.clamp_width(40.0), 15.0);
    }

    #[test]
    fn test_interval_for_speed() {
        let config = EditorConfig::default();
        let interval = config.interval_for_speed(0.150).unwrap();
        assert!((interval.as_secs_f64() - 0.100).abs() < 1e-9);
        assert_eq!(config.interval_for_speed(1.0).unwrap(), Duration::from_secs_f64(0.010));
        assert_eq!(config.interval_for_speed(-1.0).unwrap(), Duration::from_secs_f64(0.250));
    }

    #[test]
    fn test_non_finite_speed_rejected() {
        let config = EditorConfig::default();
        for speed in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                config.interval_for_speed(speed),
                Err(ConfigError::Invalid(_))
            ));
        }
    }

    #[test]
    fn test_non_finite_bounds_rejected() {
        let nan_width = EditorConfig {
            min_width: f64::NAN,
            ..EditorConfig::default()
        };
        assert!(nan_width.validate().is_err());

        let endless = EditorConfig {
            max_interval_secs: f64::INFINITY,
            ..EditorConfig::default()
        };
        assert!(endless.validate().is_err());

        let nan_spacing = EditorConfig {
            brush_spacing: f64::NAN,
            ..EditorConfig::default()
        };
        assert!(nan_spacing.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "brush_spacing": 5.0 }"#).unwrap();

        assert_eq!(EditorConfig::load(&path).unwrap().brush_spacing, 5.0);
        assert!(matches!(
            EditorConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
