//! Viewport and scroll offset management.

/// Fraction of the viewport height moved by page up/down.
pub const SCROLL_PAGE_FRACTION: f32 = 0.9;

/// Vertical scroll state for the content viewport.
///
/// `scroll_y` is always within `[0, max_scroll()]`; every mutator
/// re-clamps.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollState {
    /// Current vertical scroll offset.
    scroll_y: f32,
    /// Total content height (from the last wrap pass).
    content_height: f32,
    /// Visible viewport height.
    viewport_height: f32,
    /// Distance moved by one wheel notch or arrow key.
    line_step: f32,
}

impl ScrollState {
    pub fn new(viewport_height: f32, line_step: f32) -> Self {
        Self {
            scroll_y: 0.0,
            content_height: 0.0,
            viewport_height: viewport_height.max(0.0),
            line_step,
        }
    }

    /// Current offset.
    pub fn offset(&self) -> f32 {
        self.scroll_y
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    /// Scroll by wheel notches. Positive deltas move toward the top.
    pub fn wheel_scroll(&mut self, delta_lines: f32) {
        if !delta_lines.is_finite() {
            return;
        }
        self.scroll_y -= delta_lines * self.line_step;
        self.clamp();
    }

    /// Scroll up by one line.
    pub fn scroll_up(&mut self) {
        self.wheel_scroll(1.0);
    }

    /// Scroll down by one line.
    pub fn scroll_down(&mut self) {
        self.wheel_scroll(-1.0);
    }

    /// Scroll up by one page.
    pub fn page_up(&mut self) {
        self.scroll_y -= self.viewport_height * SCROLL_PAGE_FRACTION;
        self.clamp();
    }

    /// Scroll down by one page.
    pub fn page_down(&mut self) {
        self.scroll_y += self.viewport_height * SCROLL_PAGE_FRACTION;
        self.clamp();
    }

    /// Scroll to an absolute position.
    pub fn scroll_to(&mut self, y: f32) {
        if !y.is_finite() {
            return;
        }
        self.scroll_y = y;
        self.clamp();
    }

    /// Scroll so that the content band `[target_y, target_y + height)` is
    /// visible, centering it when it is offscreen.
    pub fn scroll_to_visible(&mut self, target_y: f32, target_height: f32) {
        let visible_top = self.scroll_y;
        let visible_bottom = self.scroll_y + self.viewport_height;

        if target_y >= visible_top && target_y + target_height <= visible_bottom {
            return;
        }

        let center = target_y + target_height / 2.0;
        self.scroll_y = center - self.viewport_height / 2.0;
        self.clamp();
    }

    /// Scroll to top of document.
    pub fn scroll_to_top(&mut self) {
        self.scroll_y = 0.0;
    }

    /// Scroll to bottom of document.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_y = self.max_scroll();
    }

    /// Update content height (after a wrap pass).
    pub fn set_content_height(&mut self, height: f32) {
        self.content_height = height.max(0.0);
        self.clamp();
    }

    /// Update viewport height (after a resize).
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
        self.clamp();
    }

    /// Maximum scroll offset.
    pub fn max_scroll(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    /// Clamp `scroll_y` to `[0, max_scroll]`.
    fn clamp(&mut self) {
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
    }

    /// Scroll position as a fraction (0.0 to 1.0) for scrollbar rendering.
    pub fn scroll_fraction(&self) -> f32 {
        let max = self.max_scroll();
        if max == 0.0 { 0.0 } else { self.scroll_y / max }
    }
}
