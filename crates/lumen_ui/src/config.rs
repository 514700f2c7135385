//! Engine configuration.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```toml
//! baseline_width = 1920.0
//! baseline_height = 1080.0
//! max_frame_delta_ms = 250.0
//! node_capacity = 256
//! draw_capacity = 1024
//! text_advance_ratio = 0.6
//! text_line_height_ratio = 1.25
//! ```

use std::path::Path;

use lumen_shared::Vec2;
use serde::Deserialize;

use crate::error::{UiError, UiResult};
use crate::text::MonospaceMetrics;

/// Context configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    /// Window width at which the content scale is `1.0`.
    pub baseline_width: f32,
    /// Window height at which the content scale is `1.0`.
    pub baseline_height: f32,
    /// Upper bound for one frame's delta time.
    pub max_frame_delta_ms: f32,
    /// Initial node arena capacity.
    pub node_capacity: usize,
    /// Initial draw list capacity.
    pub draw_capacity: usize,
    /// Glyph advance of the built-in metrics, as a fraction of text size.
    pub text_advance_ratio: f32,
    /// Line height of the built-in metrics, as a fraction of text size.
    pub text_line_height_ratio: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            baseline_width: 1920.0,
            baseline_height: 1080.0,
            max_frame_delta_ms: 250.0,
            node_capacity: 256,
            draw_capacity: 1024,
            text_advance_ratio: 0.6,
            text_line_height_ratio: 1.25,
        }
    }
}

impl UiConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// [`UiError::InvalidConfig`] on syntax errors, unknown keys or values
    /// out of range.
    pub fn from_toml_str(source: &str) -> UiResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| UiError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// [`UiError::InvalidConfig`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> UiResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| UiError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> UiResult<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.baseline_width) || !positive(self.baseline_height) {
            return Err(UiError::InvalidConfig("baseline size must be positive".into()));
        }
        if !(self.max_frame_delta_ms.is_finite() && self.max_frame_delta_ms >= 0.0) {
            return Err(UiError::InvalidConfig("max_frame_delta_ms must be non-negative".into()));
        }
        if !positive(self.text_advance_ratio) || !positive(self.text_line_height_ratio) {
            return Err(UiError::InvalidConfig("text ratios must be positive".into()));
        }
        Ok(())
    }

    /// Baseline resolution.
    #[must_use]
    pub fn baseline(&self) -> Vec2 {
        Vec2::new(self.baseline_width, self.baseline_height)
    }

    /// Built-in text metrics with the configured ratios.
    #[must_use]
    pub fn text_metrics(&self) -> MonospaceMetrics {
        MonospaceMetrics::new(self.text_advance_ratio, self.text_line_height_ratio)
    }
}
