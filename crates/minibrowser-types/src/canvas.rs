//! Drawing surface seam.
//!
//! The layout engine produces [`DrawCommand`]s; a front end implements
//! [`Canvas`] to put them on screen (a window, a terminal grid, a test
//! recorder). Nothing in the engine knows which.

use serde::Deserialize;

use crate::error::{BrowserError, Result};

/// A color in RGBA format (0-255 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
}

impl TryFrom<String> for Color {
    type Error = BrowserError;

    fn try_from(s: String) -> Result<Self> {
        parse_hex_color(&s).ok_or_else(|| BrowserError::Config(format!("bad color: {s}")))
    }
}

/// Parse `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.strip_prefix('#')?;
    if !s.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
    match s.len() {
        6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        _ => None,
    }
}

/// A recorded draw call, replayable against any [`Canvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        color: Color,
    },
    DrawText {
        text: String,
        x: i32,
        y: i32,
        font_size: u16,
        color: Color,
    },
}

/// A surface that can display text runs and filled rectangles.
pub trait Canvas {
    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()>;

    /// Draw a single-line text run with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: u16, color: Color) -> Result<()>;

    /// Replay one recorded command.
    fn execute(&mut self, cmd: &DrawCommand) -> Result<()> {
        match cmd {
            DrawCommand::FillRect { x, y, w, h, color } => self.fill_rect(*x, *y, *w, *h, *color),
            DrawCommand::DrawText {
                text,
                x,
                y,
                font_size,
                color,
            } => self.draw_text(text, *x, *y, *font_size, *color),
        }
    }
}
