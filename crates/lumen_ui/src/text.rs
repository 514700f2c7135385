//! Text measurement.
//!
//! The engine never rasterizes glyphs; it only needs block sizes so text
//! nodes can take part in layout. Anything that can answer advance and line
//! height questions plugs in through [`TextMetrics`].

use lumen_shared::Vec2;

use crate::values::FontRef;

/// Font metrics provider consulted by text nodes.
pub trait TextMetrics: Send + Sync {
    /// Average glyph advance for `font` at `size` pixels.
    fn advance(&self, font: &FontRef, size: f32) -> f32;

    /// Distance between baselines for `font` at `size` pixels.
    fn line_height(&self, font: &FontRef, size: f32) -> f32;

    /// Width and height of a text block. Lines split on `'\n'`.
    fn measure(&self, text: &str, font: &FontRef, size: f32) -> Vec2 {
        let mut lines = 0_u32;
        let mut longest = 0_usize;
        for line in text.split('\n') {
            lines += 1;
            longest = longest.max(line.chars().count());
        }
        #[allow(clippy::cast_precision_loss)]
        let width = longest as f32 * self.advance(font, size);
        #[allow(clippy::cast_precision_loss)]
        let height = lines as f32 * self.line_height(font, size);
        Vec2::new(width, height)
    }
}

/// Fixed-ratio metrics for monospace fonts.
///
/// A font that carries its own ratios in [`FontInfo`](crate::values::FontInfo)
/// uses them; fonts without info fall back to the ratios stored here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Advance as a fraction of the font size.
    pub advance_ratio: f32,
    /// Line height as a fraction of the font size.
    pub line_height_ratio: f32,
}

impl MonospaceMetrics {
    /// Creates metrics with explicit fallback ratios.
    #[must_use]
    pub const fn new(advance_ratio: f32, line_height_ratio: f32) -> Self {
        Self {
            advance_ratio,
            line_height_ratio,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(0.6, 1.25)
    }
}

impl TextMetrics for MonospaceMetrics {
    fn advance(&self, font: &FontRef, size: f32) -> f32 {
        let ratio = font.info().map_or(self.advance_ratio, |info| info.advance_ratio);
        ratio * size
    }

    fn line_height(&self, font: &FontRef, size: f32) -> f32 {
        let ratio = font
            .info()
            .map_or(self.line_height_ratio, |info| info.line_height_ratio);
        ratio * size
    }
}
