//! A [`Canvas`] that rasterizes onto a character grid.
//!
//! Each cell is one character advance wide and one line height tall, so
//! page text lands one glyph per cell. Thin horizontal fills in the link
//! color become underlines, narrow vertical fills (caret, scrollbar,
//! outline edges) become `|` on empty cells, and larger fills clear the
//! cells they cover.

use minibrowser_types::canvas::{Canvas, Color};
use minibrowser_types::error::Result;

const ANSI_UNDERLINE_ON: &str = "\x1b[4m";
const ANSI_UNDERLINE_OFF: &str = "\x1b[24m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    underline: bool,
}

const BLANK: Cell = Cell {
    ch: ' ',
    underline: false,
};

/// Character-grid surface.
#[derive(Debug, Clone)]
pub struct TextCanvas {
    cols: usize,
    rows: usize,
    cell_width: f32,
    cell_height: f32,
    underline_color: Color,
    cells: Vec<Cell>,
}

impl TextCanvas {
    /// A grid covering a `width` x `height` pixel surface.
    pub fn new(width: f32, height: f32, cell_width: f32, cell_height: f32, underline_color: Color) -> Self {
        let cell_width = if cell_width > 0.0 { cell_width } else { 1.0 };
        let cell_height = if cell_height > 0.0 { cell_height } else { 1.0 };
        let cols = (width.max(0.0) / cell_width).ceil() as usize;
        let rows = (height.max(0.0) / cell_height).ceil() as usize;
        Self {
            cols,
            rows,
            cell_width,
            cell_height,
            underline_color,
            cells: vec![BLANK; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// One grid row as plain text, trailing spaces trimmed.
    pub fn row_text(&self, row: usize) -> String {
        self.row(row)
            .map(|cells| cells.iter().map(|c| c.ch).collect::<String>())
            .unwrap_or_default()
            .trim_end()
            .to_string()
    }

    /// Whether the cell at `(col, row)` is underlined.
    pub fn is_underlined(&self, col: usize, row: usize) -> bool {
        self.row(row)
            .and_then(|cells| cells.get(col))
            .is_some_and(|c| c.underline)
    }

    /// The whole grid, trailing blank rows dropped. With `ansi`, underlined
    /// runs are wrapped in SGR underline codes.
    pub fn render(&self, ansi: bool) -> String {
        let mut lines: Vec<String> = (0..self.rows)
            .map(|row| if ansi { self.ansi_row(row) } else { self.row_text(row) })
            .collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    fn ansi_row(&self, row: usize) -> String {
        let Some(cells) = self.row(row) else {
            return String::new();
        };
        let len = cells
            .iter()
            .rposition(|c| c.ch != ' ' || c.underline)
            .map_or(0, |i| i + 1);
        let mut out = String::new();
        let mut underlined = false;
        for cell in &cells[..len] {
            if cell.underline != underlined {
                out.push_str(if cell.underline { ANSI_UNDERLINE_ON } else { ANSI_UNDERLINE_OFF });
                underlined = cell.underline;
            }
            out.push(cell.ch);
        }
        if underlined {
            out.push_str(ANSI_UNDERLINE_OFF);
        }
        out
    }

    fn row(&self, row: usize) -> Option<&[Cell]> {
        (row < self.rows).then(|| &self.cells[row * self.cols..(row + 1) * self.cols])
    }

    fn cell_mut(&mut self, col: i64, row: i64) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return None;
        }
        let idx = row as usize * self.cols + col as usize;
        self.cells.get_mut(idx)
    }

    fn col_of(&self, x: f32) -> i64 {
        (x / self.cell_width).floor() as i64
    }

    fn row_of(&self, y: f32) -> i64 {
        (y / self.cell_height).round() as i64
    }
}

impl Canvas for TextCanvas {
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        let (x, y, w, h) = (x as f32, y as f32, w as f32, h as f32);
        if w <= self.cell_width && h > w {
            // Vertical stroke.
            let col = self.col_of(x);
            for row in self.row_of(y)..self.row_of(y + h).max(self.row_of(y) + 1) {
                if let Some(cell) = self.cell_mut(col, row)
                    && cell.ch == ' '
                {
                    cell.ch = '|';
                }
            }
        } else if h < self.cell_height / 2.0 {
            // Horizontal stroke: only link underlines are representable.
            if color == self.underline_color {
                let row = self.row_of(y + h) - 1;
                let first = self.col_of(x);
                let count = (w / self.cell_width).round() as i64;
                for col in first..first + count {
                    if let Some(cell) = self.cell_mut(col, row) {
                        cell.underline = true;
                    }
                }
            }
        } else {
            let (c0, c1) = (self.col_of(x), ((x + w) / self.cell_width).ceil() as i64);
            let (r0, r1) = (self.row_of(y), self.row_of(y + h));
            for row in r0..r1 {
                for col in c0..c1 {
                    if let Some(cell) = self.cell_mut(col, row) {
                        *cell = BLANK;
                    }
                }
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, _font_size: u16, _color: Color) -> Result<()> {
        let row = self.row_of(y as f32);
        let start = self.col_of(x as f32);
        for (i, ch) in text.chars().enumerate() {
            let ch = if ch.is_control() { ' ' } else { ch };
            if let Some(cell) = self.cell_mut(start + i as i64, row) {
                cell.ch = ch;
            }
        }
        Ok(())
    }
}
