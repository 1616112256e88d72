//! Configuration schema types for `sketch.toml`
//!
//! Defines the structure and validation rules for editor configuration.

use serde::{Deserialize, Serialize};

use crate::color::{parse_color, parse_color_lenient};
use crate::editor::EditorSettings;
use crate::grid::{
    GridLimits, DEFAULT_MAX_RESOLUTION, DEFAULT_RESOLUTION, MAX_CONFIGURABLE_RESOLUTION,
};
use crate::output::{DEFAULT_FILENAME, MAX_SCALE};

/// Canvas size settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Largest side length accepted by resize
    #[serde(default = "default_max_resolution")]
    pub max_resolution: u32,
    /// Side length of the canvas at startup
    #[serde(default = "default_resolution")]
    pub default_resolution: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            max_resolution: default_max_resolution(),
            default_resolution: default_resolution(),
        }
    }
}

fn default_max_resolution() -> u32 {
    DEFAULT_MAX_RESOLUTION
}

fn default_resolution() -> u32 {
    DEFAULT_RESOLUTION
}

/// Tool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Initial paint color, any format the color parser accepts
    #[serde(default = "default_color")]
    pub default_color: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { default_color: default_color() }
    }
}

fn default_color() -> String {
    "#000000".to_string()
}

/// Save settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// File name used when no output path is given
    #[serde(default = "default_filename")]
    pub filename: String,
    /// Integer nearest-neighbor upscale factor
    #[serde(default = "default_scale")]
    pub scale: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { filename: default_filename(), scale: default_scale() }
    }
}

fn default_filename() -> String {
    DEFAULT_FILENAME.to_string()
}

fn default_scale() -> u8 {
    1
}

/// Root of `sketch.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SketchConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "grid.max_resolution")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sketch.toml: '{}' {}", self.field, self.message)
    }
}

impl SketchConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.grid.max_resolution == 0
            || self.grid.max_resolution > MAX_CONFIGURABLE_RESOLUTION
        {
            errors.push(ConfigValidationError {
                field: "grid.max_resolution".to_string(),
                message: format!("must be in the range 1-{}", MAX_CONFIGURABLE_RESOLUTION),
            });
        }

        if self.grid.default_resolution == 0
            || self.grid.default_resolution > self.grid.max_resolution
        {
            errors.push(ConfigValidationError {
                field: "grid.default_resolution".to_string(),
                message: format!("must be in the range 1-{}", self.grid.max_resolution),
            });
        }

        if let Err(e) = parse_color(&self.editor.default_color) {
            errors.push(ConfigValidationError {
                field: "editor.default_color".to_string(),
                message: e.to_string(),
            });
        }

        if self.export.filename.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "export.filename".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        if self.export.scale == 0 || self.export.scale > MAX_SCALE {
            errors.push(ConfigValidationError {
                field: "export.scale".to_string(),
                message: format!("must be in the range 1-{}", MAX_SCALE),
            });
        }

        errors
    }

    pub fn limits(&self) -> GridLimits {
        GridLimits { max_resolution: self.grid.max_resolution }
    }

    /// Editor start-up settings. An unparseable color falls back to
    /// transparent; `validate` reports it.
    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            limits: self.limits(),
            resolution: self.grid.default_resolution,
            color: parse_color_lenient(&self.editor.default_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: SketchConfig = toml::from_str("").unwrap();
        assert_eq!(config, SketchConfig::default());
        assert_eq!(config.grid.max_resolution, 64);
        assert_eq!(config.grid.default_resolution, 22);
        assert_eq!(config.export.filename, "sketch.png");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_full_config() {
        let config: SketchConfig = toml::from_str(
            r##"
[grid]
max_resolution = 128
default_resolution = 32

[editor]
default_color = "rebeccapurple"

[export]
filename = "art.png"
scale = 8
"##,
        )
        .unwrap();
        assert!(config.validate().is_empty());

        let settings = config.editor_settings();
        assert_eq!(settings.limits.max_resolution, 128);
        assert_eq!(settings.resolution, 32);
        assert_eq!(settings.color, Rgba([102, 51, 153, 255]));
    }

    #[test]
    fn test_default_resolution_above_max() {
        let config: SketchConfig =
            toml::from_str("[grid]\nmax_resolution = 16\ndefault_resolution = 22").unwrap();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "grid.default_resolution");
        assert!(errors[0].to_string().contains("1-16"));
    }

    #[test]
    fn test_max_resolution_upper_bound() {
        let config: SketchConfig =
            toml::from_str("[grid]\nmax_resolution = 4294967295").unwrap();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "grid.max_resolution");
        assert!(errors[0].to_string().contains("1-4096"));

        let config: SketchConfig = toml::from_str("[grid]\nmax_resolution = 4096").unwrap();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_bad_default_color_falls_back_to_transparent() {
        let config: SketchConfig =
            toml::from_str("[editor]\ndefault_color = \"not-a-color\"").unwrap();
        assert_eq!(config.validate()[0].field, "editor.default_color");
        assert_eq!(config.editor_settings().color, Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_collects_all_errors() {
        let config: SketchConfig = toml::from_str(
            r#"
[grid]
max_resolution = 0

[editor]
default_color = "blurple"

[export]
filename = ""
scale = 17
"#,
        )
        .unwrap();
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "grid.max_resolution",
                "grid.default_resolution",
                "editor.default_color",
                "export.filename",
                "export.scale",
            ]
        );
    }
}
