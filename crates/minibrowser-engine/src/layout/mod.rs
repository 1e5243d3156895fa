//! Viewport text layout.
//!
//! The [`LayoutEngine`] owns the raw body text of the current page, the
//! viewport rectangle, and the scroll offset. Every content or viewport
//! change re-wraps the text; every wrap or scroll change re-projects the
//! page's links onto screen rectangles, so the rendered links always match
//! what is on screen.

pub mod wrap;

use std::ops::Range;

use minibrowser_types::geometry::{Point, Rect};

use crate::config::EngineConfig;
use crate::extract::{LinkSpan, Page};
use crate::scroll::ScrollState;

use self::wrap::{LinkPlacement, place_links, wrap_text};

// -------------------------------------------------------------------
// Public types
// -------------------------------------------------------------------

/// Lifecycle of a [`LayoutEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPhase {
    /// No content has been set yet.
    Empty,
    /// Content has been set and wrapped at least once.
    LaidOut,
}

/// A link projected onto the screen for the current wrap and scroll.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLink {
    /// Raw `href` value, unresolved.
    pub target: String,
    /// Bounding box of all segments. Used for scrolling into view and the
    /// focus outline, never for hit-testing.
    pub rect: Rect,
    /// One rectangle per wrapped line the link text occupies.
    pub segments: Vec<Rect>,
    /// Index into the link list passed to [`LayoutEngine::set_content`].
    pub link_index: usize,
}

impl RenderedLink {
    /// Whether `point` lies on one of the link's line segments.
    pub fn contains(&self, point: Point) -> bool {
        self.segments.iter().any(|seg| seg.contains(point))
    }
}

// -------------------------------------------------------------------
// LayoutEngine
// -------------------------------------------------------------------

/// Wraps page text to a viewport and tracks scroll and link geometry.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: EngineConfig,
    phase: LayoutPhase,
    viewport: Rect,
    raw_text: String,
    links: Vec<LinkSpan>,
    wrapped_lines: Vec<String>,
    truncated: bool,
    placements: Vec<LinkPlacement>,
    rendered_links: Vec<RenderedLink>,
    scroll: ScrollState,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl LayoutEngine {
    /// Create an engine with the configured default viewport and no content.
    pub fn new(config: EngineConfig) -> Self {
        let configured = config.viewport();
        let viewport = Rect::new(
            finite_or_zero(configured.x),
            finite_or_zero(configured.y),
            sanitize_extent(configured.width),
            sanitize_extent(configured.height),
        );
        let scroll = ScrollState::new(viewport.height, config.line_height());
        Self {
            config,
            phase: LayoutPhase::Empty,
            viewport,
            raw_text: String::new(),
            links: Vec::new(),
            wrapped_lines: Vec::new(),
            truncated: false,
            placements: Vec::new(),
            rendered_links: Vec::new(),
            scroll,
        }
    }

    // -- Mutators ---------------------------------------------------------

    /// Replace the text and links, then re-wrap.
    ///
    /// The scroll offset is kept, clamped to the new content height.
    pub fn set_content(&mut self, text: impl Into<String>, links: Vec<LinkSpan>) {
        self.raw_text = text.into();
        self.links = links;
        self.phase = LayoutPhase::LaidOut;
        self.rewrap();
    }

    /// Shorthand for [`set_content`](Self::set_content) with a page's body
    /// and links.
    pub fn set_page(&mut self, page: &Page) {
        self.set_content(page.body.clone(), page.links.clone());
    }

    /// Resize the viewport and re-wrap. Negative or non-finite sizes count
    /// as zero.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport.width = sanitize_extent(width);
        self.viewport.height = sanitize_extent(height);
        self.scroll.set_viewport_height(self.viewport.height);
        self.rewrap();
    }

    /// Move the viewport's top-left corner on the drawing surface.
    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.viewport.x = finite_or_zero(x);
        self.viewport.y = finite_or_zero(y);
        self.project_links();
    }

    /// Scroll by wheel notches. Positive deltas move toward the top.
    pub fn on_scroll(&mut self, delta_lines: f32) {
        self.scroll.wheel_scroll(delta_lines);
        self.project_links();
    }

    /// Scroll to an absolute content offset, clamped.
    pub fn scroll_to(&mut self, offset: f32) {
        self.scroll.scroll_to(offset);
        self.project_links();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll.scroll_to_top();
        self.project_links();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll.scroll_to_bottom();
        self.project_links();
    }

    pub fn page_up(&mut self) {
        self.scroll.page_up();
        self.project_links();
    }

    pub fn page_down(&mut self) {
        self.scroll.page_down();
        self.project_links();
    }

    /// Scroll up by one line height.
    pub fn line_up(&mut self) {
        self.scroll.scroll_up();
        self.project_links();
    }

    /// Scroll down by one line height.
    pub fn line_down(&mut self) {
        self.scroll.scroll_down();
        self.project_links();
    }

    /// Scroll the minimum needed to bring a screen rectangle (for example
    /// a [`RenderedLink::rect`]) into view, centering it when offscreen.
    pub fn scroll_to_visible(&mut self, rect: Rect) {
        let content_y = rect.y - self.viewport.y + self.scroll.offset();
        self.scroll.scroll_to_visible(content_y, rect.height);
        self.project_links();
    }

    // -- Queries ----------------------------------------------------------

    /// Target of the first link under `point`, if the point is inside the
    /// viewport.
    pub fn hit_test(&self, point: Point) -> Option<&str> {
        self.link_at(point).map(|link| link.target.as_str())
    }

    /// First rendered link under `point`, if the point is inside the
    /// viewport.
    pub fn link_at(&self, point: Point) -> Option<&RenderedLink> {
        if !self.viewport.contains(point) {
            return None;
        }
        self.rendered_links
            .iter()
            .find(|link| link.contains(point))
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The viewport rectangle on the drawing surface.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn text(&self) -> &str {
        &self.raw_text
    }

    pub fn links(&self) -> &[LinkSpan] {
        &self.links
    }

    pub fn wrapped_lines(&self) -> &[String] {
        &self.wrapped_lines
    }

    /// Whether the last wrap pass hit the character budget.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn rendered_links(&self) -> &[RenderedLink] {
        &self.rendered_links
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    pub fn max_scroll(&self) -> f32 {
        self.scroll.max_scroll()
    }

    /// Scroll position in `[0, 1]`, for scrollbar drawing.
    pub fn scroll_fraction(&self) -> f32 {
        self.scroll.scroll_fraction()
    }

    /// Total height of the wrapped text.
    pub fn content_height(&self) -> f32 {
        self.scroll.content_height()
    }

    pub fn line_height(&self) -> f32 {
        self.config.line_height()
    }

    pub fn char_advance(&self) -> f32 {
        self.config.char_advance()
    }

    /// Column limit for the current viewport width. Always at least 1.
    pub fn max_cols(&self) -> usize {
        let advance = self.char_advance();
        if advance > 0.0 && advance.is_finite() {
            ((self.viewport.width / advance).floor() as usize).max(1)
        } else {
            1
        }
    }

    /// Indices of wrapped lines that overlap the viewport.
    pub fn visible_line_range(&self) -> Range<usize> {
        let count = self.wrapped_lines.len();
        let lh = self.line_height();
        if count == 0 || lh <= 0.0 || !lh.is_finite() {
            return 0..0;
        }
        let top = self.scroll.offset();
        let first = (top / lh).floor() as usize;
        let last = ((top + self.viewport.height) / lh).ceil() as usize;
        first.min(count)..last.min(count)
    }

    /// Screen y of the top of wrapped line `line`.
    pub fn line_y(&self, line: usize) -> f32 {
        self.viewport.y + line as f32 * self.line_height() - self.scroll.offset()
    }

    // -- Internals --------------------------------------------------------

    fn rewrap(&mut self) {
        let max_cols = self.max_cols();
        let wrapped = wrap_text(&self.raw_text, max_cols, self.config.char_budget);
        self.wrapped_lines = wrapped.lines;
        self.truncated = wrapped.truncated;

        self.scroll
            .set_content_height(self.wrapped_lines.len() as f32 * self.line_height());

        self.placements = place_links(&self.wrapped_lines, &self.links);
        self.project_links();

        log::debug!(
            "layout: {} lines at {} cols, {}/{} links placed{}",
            self.wrapped_lines.len(),
            max_cols,
            self.placements.len(),
            self.links.len(),
            if self.truncated { " (truncated)" } else { "" },
        );
    }

    fn project_links(&mut self) {
        let advance = self.char_advance();
        let lh = self.line_height();
        let origin_x = self.viewport.x;
        let top = self.viewport.y - self.scroll.offset();

        self.rendered_links = self
            .placements
            .iter()
            .filter_map(|placement| {
                let segments: Vec<Rect> = placement
                    .segments
                    .iter()
                    .map(|seg| {
                        Rect::new(
                            origin_x + seg.start_col as f32 * advance,
                            top + seg.line as f32 * lh,
                            (seg.end_col - seg.start_col) as f32 * advance,
                            lh,
                        )
                    })
                    .collect();
                let rect = segments.iter().copied().reduce(|acc, r| acc.union(&r))?;
                Some(RenderedLink {
                    target: placement.target.clone(),
                    rect,
                    segments,
                    link_index: placement.link_index,
                })
            })
            .collect();
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

fn sanitize_extent(v: f32) -> f32 {
    finite_or_zero(v).max(0.0)
}
