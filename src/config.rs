//! Runtime configuration for overlay sessions.
//!
//! Configuration is plain JSON. Every field has a default, so an empty object
//! is a valid config:
//!
//! ```
//! use rigsight::config::OverlayConfig;
//!
//! let config = OverlayConfig::from_json_str(r#"{ "box_margin": 0.5 }"#)?;
//! assert!((config.box_margin - 0.5).abs() < f32::EPSILON);
//! assert_eq!(config.parts.head.primary, "Head");
//! # Ok::<(), rigsight::config::ConfigError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_BOX_MARGIN, DEFAULT_DISCOVERY_TIMEOUT_MS, DEFAULT_LABEL_FONT_SIZE,
    DEFAULT_LINE_THICKNESS,
};
use crate::rig::PartNames;

/// Errors raised while loading an [`OverlayConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The config text is not valid JSON for [`OverlayConfig`].
    #[error("invalid overlay config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Linear RGBA colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(1.0, 1.0, 1.0);

    /// Builds an opaque colour.
    #[must_use]
    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Appearance of a line primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Stroke colour.
    pub color: Rgba,
    /// Stroke thickness in pixels.
    pub thickness: f32,
}

/// Appearance of a label block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    /// Text colour.
    pub color: Rgba,
    /// Font size in pixels; one line of text is this tall.
    pub font_size: f32,
}

/// Styles applied once when an overlay allocates its primitives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Bounding-box edges.
    pub box_line: LineStyle,
    /// Skeleton edges.
    pub skeleton_line: LineStyle,
    /// Name and stats block.
    pub label: LabelStyle,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            box_line: LineStyle {
                color: Rgba::opaque(1.0, 0.25, 0.25),
                thickness: DEFAULT_LINE_THICKNESS,
            },
            skeleton_line: LineStyle {
                color: Rgba::WHITE,
                thickness: DEFAULT_LINE_THICKNESS,
            },
            label: LabelStyle {
                color: Rgba::WHITE,
                font_size: DEFAULT_LABEL_FONT_SIZE,
            },
        }
    }
}

/// Settings shared by every overlay in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// World-space margin added around the bounding box on every side.
    pub box_margin: f32,
    /// Bounded wait for each body part before its fallback name is tried.
    pub discovery_timeout_ms: u64,
    /// Body-part names looked up on every tracked entity.
    pub parts: PartNames,
    /// Colours and sizes of the screen primitives.
    pub style: OverlayStyle,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            box_margin: DEFAULT_BOX_MARGIN,
            discovery_timeout_ms: DEFAULT_DISCOVERY_TIMEOUT_MS,
            parts: PartNames::default(),
            style: OverlayStyle::default(),
        }
    }
}

impl OverlayConfig {
    /// The discovery wait as a [`Duration`].
    #[must_use]
    pub const fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    /// Parses a config from JSON text.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] when the text is not a valid config.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON config file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let text = fs::read_to_string(file).map_err(|source| ConfigError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
