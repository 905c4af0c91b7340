//! Engine configuration.

use crate::history::DEFAULT_CAPACITY;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// RGBA color that can be stored in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Settings for a whiteboard instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteboardConfig {
    /// Maximum number of undo states to keep.
    pub history_capacity: usize,
    /// Smallest selectable stroke width.
    pub min_width: u32,
    /// Largest selectable stroke width.
    pub max_width: u32,
    /// Stroke width on startup.
    pub default_width: u32,
    /// Pen color on startup.
    pub default_color: SerializableColor,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            min_width: 1,
            max_width: 30,
            default_width: 4,
            default_color: SerializableColor::new(0xe6, 0xe6, 0xe6, 0xff),
        }
    }
}

impl WhiteboardConfig {
    /// Check that the settings describe a usable whiteboard.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        if self.min_width == 0 {
            return Err(ConfigError::Invalid("min_width must be at least 1".to_string()));
        }
        if self.min_width >= self.max_width {
            return Err(ConfigError::Invalid(format!(
                "min_width ({}) must be below max_width ({})",
                self.min_width, self.max_width
            )));
        }
        if !(self.min_width..=self.max_width).contains(&self.default_width) {
            return Err(ConfigError::Invalid(format!(
                "default_width ({}) must lie in [{}, {}]",
                self.default_width, self.min_width, self.max_width
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Pen color on startup.
    pub fn default_color(&self) -> Color {
        self.default_color.into()
    }
}
