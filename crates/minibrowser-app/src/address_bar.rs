//! Single-line address entry above the page.

use minibrowser_types::canvas::{Canvas, Color};
use minibrowser_types::error::Result;
use minibrowser_types::geometry::Rect;
use minibrowser_types::input::{InputEvent, Key};

/// Text size of the address bar.
pub const ADDRESS_FONT_SIZE: u16 = 16;

/// Inset of the text from the bar's top-left corner.
const TEXT_INSET: f32 = 5.0;

/// Emitted when the user commits the typed address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressBarEvent {
    Submit(String),
}

/// Editable address text with a caret.
#[derive(Debug, Clone)]
pub struct AddressBar {
    text: String,
    /// Caret position as a character index.
    cursor_pos: usize,
    pub focused: bool,
    pub rect: Rect,
    /// Horizontal advance of one character at [`ADDRESS_FONT_SIZE`].
    char_advance: f32,
}

impl AddressBar {
    pub fn new(rect: Rect, char_advance_ratio: f32) -> Self {
        Self {
            text: String::new(),
            cursor_pos: 0,
            focused: false,
            rect,
            char_advance: f32::from(ADDRESS_FONT_SIZE) * char_advance_ratio,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    /// Replace the text and put the caret at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor_pos = self.text.chars().count();
    }

    /// Place the caret nearest to a surface x coordinate.
    pub fn place_cursor(&mut self, x: f32) {
        let len = self.text.chars().count();
        if self.char_advance <= 0.0 {
            self.cursor_pos = len;
            return;
        }
        let col = ((x - self.text_x() as f32) / self.char_advance).round();
        self.cursor_pos = (col.max(0.0) as usize + self.first_visible()).min(len);
    }

    /// Apply an editing event. Returns `Submit` on Enter.
    pub fn handle_event(&mut self, event: &InputEvent) -> Option<AddressBarEvent> {
        match event {
            InputEvent::TextInput(ch) if !ch.is_control() => {
                self.insert(*ch);
                None
            },
            InputEvent::KeyPress(key) => match key {
                Key::Enter => Some(AddressBarEvent::Submit(self.text.clone())),
                Key::Backspace => {
                    self.backspace();
                    None
                },
                Key::Delete => {
                    self.delete();
                    None
                },
                Key::Left => {
                    self.cursor_pos = self.cursor_pos.saturating_sub(1);
                    None
                },
                Key::Right => {
                    self.cursor_pos = (self.cursor_pos + 1).min(self.text.chars().count());
                    None
                },
                Key::Home => {
                    self.cursor_pos = 0;
                    None
                },
                Key::End => {
                    self.cursor_pos = self.text.chars().count();
                    None
                },
                _ => None,
            },
            _ => None,
        }
    }

    /// Draw the bar: background, the visible slice of text, and a caret
    /// while focused.
    pub fn paint(&self, canvas: &mut dyn Canvas, background: Color, text_color: Color) -> Result<()> {
        let r = self.rect;
        canvas.fill_rect(
            r.x.round() as i32,
            r.y.round() as i32,
            r.width.round().max(0.0) as u32,
            r.height.round().max(0.0) as u32,
            background,
        )?;

        let first = self.first_visible();
        let shown: String = self.text.chars().skip(first).take(self.visible_cols()).collect();
        let (tx, ty) = (self.text_x(), (r.y + TEXT_INSET).round() as i32);
        if !shown.is_empty() {
            canvas.draw_text(&shown, tx, ty, ADDRESS_FONT_SIZE, text_color)?;
        }

        if self.focused {
            let caret_x = tx as f32 + (self.cursor_pos - first) as f32 * self.char_advance;
            canvas.fill_rect(
                caret_x.round() as i32,
                ty,
                1,
                u32::from(ADDRESS_FONT_SIZE),
                text_color,
            )?;
        }
        Ok(())
    }

    fn text_x(&self) -> i32 {
        (self.rect.x + TEXT_INSET).round() as i32
    }

    /// Characters that fit between the insets.
    fn visible_cols(&self) -> usize {
        if self.char_advance <= 0.0 {
            return usize::MAX;
        }
        let usable = (self.rect.width - 2.0 * TEXT_INSET).max(0.0);
        ((usable / self.char_advance).floor() as usize).max(1)
    }

    /// First character shown, keeping the caret in view.
    fn first_visible(&self) -> usize {
        self.cursor_pos.saturating_sub(self.visible_cols())
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor_pos);
        self.text.insert(at, ch);
        self.cursor_pos += 1;
    }

    fn backspace(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            self.delete();
        }
    }

    fn delete(&mut self) {
        let at = self.byte_index(self.cursor_pos);
        if let Some(ch) = self.text[at..].chars().next() {
            self.text.drain(at..at + ch.len_utf8());
        }
    }
}
