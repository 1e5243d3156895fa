//! Engine configuration: font metrics approximation and layout limits.

use serde::Deserialize;

use minibrowser_types::geometry::Rect;

/// Layout metrics and limits.
///
/// Glyph widths are approximated as `font_size * char_advance_ratio` for
/// every character; wrapping is column-based on that advance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Character size of body text.
    pub font_size: f32,
    /// Average horizontal advance per character, as a fraction of
    /// `font_size`.
    pub char_advance_ratio: f32,
    /// Line height as a multiple of `font_size`. Also the distance one
    /// wheel notch scrolls.
    pub line_spacing: f32,
    /// Maximum number of characters a single wrap pass will lay out.
    pub char_budget: usize,
    /// Initial draw origin and viewport size.
    pub viewport_x: f32,
    pub viewport_y: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            char_advance_ratio: 0.6,
            line_spacing: 1.4,
            char_budget: 4000,
            viewport_x: 10.0,
            viewport_y: 50.0,
            viewport_width: 780.0,
            viewport_height: 540.0,
        }
    }
}

impl EngineConfig {
    /// Average advance of one character.
    pub fn char_advance(&self) -> f32 {
        self.font_size * self.char_advance_ratio
    }

    /// Height of one wrapped line, and the scroll step per wheel notch.
    pub fn line_height(&self) -> f32 {
        self.font_size * self.line_spacing
    }

    /// Initial viewport rectangle.
    pub fn viewport(&self) -> Rect {
        Rect::new(
            self.viewport_x,
            self.viewport_y,
            self.viewport_width,
            self.viewport_height,
        )
    }
}
