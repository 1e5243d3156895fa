//! Shared test utilities for the engine.
//!
//! Provides a [`MockCanvas`] that records all draw calls for assertion
//! in paint and layout tests.

use minibrowser_types::canvas::{Canvas, Color, DrawCommand};
use minibrowser_types::error::{BrowserError, Result};

/// A mock canvas that records all draw calls for test assertions.
pub struct MockCanvas {
    pub calls: Vec<DrawCommand>,
}

impl MockCanvas {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    /// Count of `FillRect` calls.
    pub fn fill_rect_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .count()
    }

    /// Count of `DrawText` calls.
    pub fn draw_text_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawText { .. }))
            .count()
    }

    /// Text of every `DrawText` call, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// `FillRect` calls in the given color, as `(x, y, w, h)`.
    pub fn rects_with_color(&self, wanted: Color) -> Vec<(i32, i32, u32, u32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { x, y, w, h, color } if *color == wanted => {
                    Some((*x, *y, *w, *h))
                },
                _ => None,
            })
            .collect()
    }

    /// Check if any `DrawText` call contains the given substring.
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }
}

impl Canvas for MockCanvas {
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        self.calls.push(DrawCommand::FillRect { x, y, w, h, color });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: u16, color: Color) -> Result<()> {
        self.calls.push(DrawCommand::DrawText {
            text: text.to_string(),
            x,
            y,
            font_size,
            color,
        });
        Ok(())
    }
}

/// A canvas whose every call fails.
pub struct FailingCanvas;

impl Canvas for FailingCanvas {
    fn fill_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32, _color: Color) -> Result<()> {
        Err(BrowserError::Canvas("fill_rect failed".into()))
    }

    fn draw_text(&mut self, _text: &str, _x: i32, _y: i32, _fs: u16, _color: Color) -> Result<()> {
        Err(BrowserError::Canvas("draw_text failed".into()))
    }
}
