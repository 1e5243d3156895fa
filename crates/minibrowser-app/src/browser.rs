//! The browser controller: address bar, fetch, extract, layout, history.
//!
//! [`Browser`] owns one page at a time. Typed addresses and clicked links
//! go through the same load path: fetch, extract, hand the page to the
//! layout engine, update the status line and history. Failures clear the
//! page and show `Error: ...` in the status line.

use minibrowser_engine::paint::paint;
use minibrowser_engine::{LayoutEngine, Page, PaintStyle, extract};
use minibrowser_net::{Fetcher, Url, normalize_address};
use minibrowser_types::canvas::Canvas;
use minibrowser_types::error::{BrowserError, Result};
use minibrowser_types::geometry::{Point, Rect};
use minibrowser_types::input::{InputEvent, Key};

use crate::address_bar::{AddressBar, AddressBarEvent};
use crate::config::{AppConfig, ColorConfig};
use crate::history::History;

/// Gap between the surface edge and the chrome/content.
const MARGIN: f32 = 10.0;
const ADDRESS_BAR_HEIGHT: f32 = 30.0;
/// Top of the page content.
const CONTENT_TOP: f32 = 50.0;
const STATUS_FONT_SIZE: u16 = 14;
/// Status text sits this far above the content.
const STATUS_OFFSET: f32 = 18.0;

/// Which part of the window receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    AddressBar,
    Content,
}

/// How a load relates to session history.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Visit {
    /// A typed address or followed link: pushes a history entry.
    New,
    Reload(f32),
    Back(f32),
    Forward(f32),
}

impl Visit {
    /// Scroll offset to restore after loading, if any.
    fn scroll_offset(self) -> Option<f32> {
        match self {
            Visit::New => None,
            Visit::Reload(offset) | Visit::Back(offset) | Visit::Forward(offset) => Some(offset),
        }
    }
}

/// Something the caller should act on after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserAction {
    Quit,
    /// A page finished loading; carries its final URL.
    Navigated(String),
}

pub struct Browser {
    fetcher: Box<dyn Fetcher>,
    engine: LayoutEngine,
    address_bar: AddressBar,
    history: History,
    page: Page,
    current_url: Option<Url>,
    status: String,
    focus: Focus,
    /// `link_index` of the keyboard-focused link. Survives re-wraps; a
    /// focused link that is not currently rendered cannot be followed.
    focused_link: Option<usize>,
    width: f32,
    height: f32,
    colors: ColorConfig,
    style: PaintStyle,
}

impl Browser {
    pub fn new(config: &AppConfig, fetcher: Box<dyn Fetcher>) -> Self {
        let mut browser = Self {
            fetcher,
            engine: LayoutEngine::new(config.engine.clone()),
            address_bar: AddressBar::new(Rect::default(), config.engine.char_advance_ratio),
            history: History::new(),
            page: Page::default(),
            current_url: None,
            status: String::new(),
            focus: Focus::Content,
            focused_link: None,
            width: 0.0,
            height: 0.0,
            colors: config.colors.clone(),
            style: config.colors.paint_style(),
        };
        browser.resize(config.window.width, config.window.height);
        browser
    }

    // -- Navigation -------------------------------------------------------

    /// Load typed address-bar text. A missing scheme becomes `https://`.
    /// Returns whether a page was shown.
    pub fn navigate(&mut self, input: &str) -> bool {
        let address = normalize_address(input);
        if address.is_empty() {
            return false;
        }
        match Url::parse(&address) {
            Some(url) => self.load(url, Visit::New),
            None => {
                self.fail(&address, &BrowserError::Url(address.clone()));
                false
            },
        }
    }

    /// Follow a link target relative to the current page.
    pub fn follow_link(&mut self, target: &str) -> bool {
        let resolved = match &self.current_url {
            Some(base) => base.resolve(target),
            None => Url::parse(target),
        };
        match resolved {
            Some(url) => self.load(url, Visit::New),
            None => {
                // Unfollowable targets leave the page in place.
                self.status = format!("Error: {}", BrowserError::Url(target.to_string()));
                false
            },
        }
    }

    /// Follow the `index`th link of the page, in document order.
    pub fn follow_page_link(&mut self, index: usize) -> bool {
        match self.page.links.get(index) {
            Some(link) => {
                let target = link.target.clone();
                self.follow_link(&target)
            },
            None => {
                self.status = format!("Error: no link {index}");
                false
            },
        }
    }

    /// Show the previous history entry. History only moves once the page
    /// has loaded.
    pub fn back(&mut self) -> bool {
        let Some(entry) = self.history.back_entry().cloned() else {
            return false;
        };
        self.history.update_scroll(self.engine.scroll_offset());
        self.revisit(&entry.url, Visit::Back(entry.scroll_offset))
    }

    /// Show the next history entry. History only moves once the page has
    /// loaded.
    pub fn forward(&mut self) -> bool {
        let Some(entry) = self.history.forward_entry().cloned() else {
            return false;
        };
        self.history.update_scroll(self.engine.scroll_offset());
        self.revisit(&entry.url, Visit::Forward(entry.scroll_offset))
    }

    /// Fetch the current page again, keeping the scroll position.
    pub fn reload(&mut self) -> bool {
        match self.current_url.clone() {
            Some(url) => {
                let offset = self.engine.scroll_offset();
                self.load(url, Visit::Reload(offset))
            },
            None => false,
        }
    }

    fn revisit(&mut self, url: &str, visit: Visit) -> bool {
        match Url::parse(url) {
            Some(url) => self.load(url, visit),
            None => {
                self.fail(url, &BrowserError::Url(url.to_string()));
                false
            },
        }
    }

    /// Fetch and show `url`, then record the visit in history. A failed
    /// load leaves history untouched.
    fn load(&mut self, url: Url, visit: Visit) -> bool {
        if visit == Visit::New {
            self.history.update_scroll(self.engine.scroll_offset());
        }
        log::info!("loading {url}");

        let response = match self.fetcher.fetch(&url) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("load {url} failed: {e}");
                self.fail(&url.to_string(), &e);
                return false;
            },
        };

        let page = extract(&response.text());
        self.engine.set_page(&page);
        match visit.scroll_offset() {
            Some(offset) => self.engine.scroll_to(offset),
            None => self.engine.scroll_to_top(),
        }

        let final_url = response.url.to_string();
        self.status = status_line(response.status, &page.title);
        self.address_bar.set_text(&final_url);
        match visit {
            Visit::New => self.history.navigate(&final_url, &page.title),
            Visit::Reload(_) => self.history.update_title(&page.title),
            Visit::Back(_) => {
                self.history.go_back();
                self.history.update_title(&page.title);
            },
            Visit::Forward(_) => {
                self.history.go_forward();
                self.history.update_title(&page.title);
            },
        }
        log::debug!(
            "{final_url}: {} body bytes, {} links",
            page.body.len(),
            page.links.len()
        );

        self.current_url = Some(response.url);
        self.page = page;
        self.focused_link = None;
        self.set_focus(Focus::Content);
        true
    }

    /// Clear the page and report `err`.
    fn fail(&mut self, address: &str, err: &BrowserError) {
        self.status = format!("Error: {err}");
        self.page = Page::default();
        self.engine.set_content("", Vec::new());
        self.focused_link = None;
        self.address_bar.set_text(address);
    }

    // -- Input ------------------------------------------------------------

    pub fn handle_event(&mut self, event: &InputEvent) -> Option<BrowserAction> {
        match event {
            InputEvent::Quit => return Some(BrowserAction::Quit),
            InputEvent::Resize { width, height } => self.resize(*width, *height),
            InputEvent::Scroll { delta_lines } => self.engine.on_scroll(*delta_lines),
            InputEvent::PointerDown { x, y } => return self.on_pointer(Point::new(*x, *y)),
            InputEvent::TextInput(_) | InputEvent::KeyPress(_) => match self.focus {
                Focus::AddressBar => return self.on_address_input(event),
                Focus::Content => {
                    if let InputEvent::KeyPress(key) = event {
                        return self.on_content_key(*key);
                    }
                },
            },
        }
        None
    }

    fn on_pointer(&mut self, point: Point) -> Option<BrowserAction> {
        if self.address_bar.rect.contains(point) {
            self.set_focus(Focus::AddressBar);
            self.address_bar.place_cursor(point.x);
            return None;
        }
        self.set_focus(Focus::Content);
        let target = self.engine.hit_test(point)?.to_string();
        self.follow_link(&target).then(|| self.navigated())
    }

    fn on_address_input(&mut self, event: &InputEvent) -> Option<BrowserAction> {
        match event {
            InputEvent::KeyPress(Key::Escape) => {
                let current = self.current_url.as_ref().map(Url::to_string).unwrap_or_default();
                self.address_bar.set_text(&current);
                self.set_focus(Focus::Content);
                None
            },
            InputEvent::KeyPress(Key::Tab) => {
                self.set_focus(Focus::Content);
                None
            },
            _ => match self.address_bar.handle_event(event)? {
                AddressBarEvent::Submit(text) => self.navigate(&text).then(|| self.navigated()),
            },
        }
    }

    fn on_content_key(&mut self, key: Key) -> Option<BrowserAction> {
        match key {
            Key::Up => self.engine.line_up(),
            Key::Down => self.engine.line_down(),
            Key::PageUp => self.engine.page_up(),
            Key::PageDown => self.engine.page_down(),
            Key::Home => self.engine.scroll_to_top(),
            Key::End => self.engine.scroll_to_bottom(),
            Key::Tab => self.focus_next_link(),
            Key::Escape => self.focused_link = None,
            Key::Backspace => {
                return self.back().then(|| self.navigated());
            },
            Key::Enter => {
                let index = self.focused_link?;
                let target = self
                    .engine
                    .rendered_links()
                    .iter()
                    .find(|link| link.link_index == index)
                    .map(|link| link.target.clone())?;
                return self.follow_link(&target).then(|| self.navigated());
            },
            Key::Delete | Key::Left | Key::Right => {},
        }
        None
    }

    /// Move keyboard focus to the next rendered link, wrapping around, and
    /// scroll it into view. A focused link that is no longer rendered
    /// restarts from the first one.
    fn focus_next_link(&mut self) {
        let links = self.engine.rendered_links();
        if links.is_empty() {
            self.focused_link = None;
            return;
        }
        let next = self
            .focused_link
            .and_then(|index| links.iter().position(|link| link.link_index == index))
            .map_or(0, |pos| (pos + 1) % links.len());
        let (index, rect) = (links[next].link_index, links[next].rect);
        self.focused_link = Some(index);
        self.engine.scroll_to_visible(rect);
    }

    pub fn focus_address_bar(&mut self) {
        self.set_focus(Focus::AddressBar);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.address_bar.focused = focus == Focus::AddressBar;
    }

    fn navigated(&self) -> BrowserAction {
        BrowserAction::Navigated(self.address_bar.text().to_string())
    }

    /// Lay the chrome and content out for a new surface size.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self.height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        let inner_width = (self.width - 2.0 * MARGIN).max(0.0);
        self.address_bar.rect = Rect::new(MARGIN, MARGIN, inner_width, ADDRESS_BAR_HEIGHT);
        self.engine.set_origin(MARGIN, CONTENT_TOP);
        self.engine
            .set_viewport(inner_width, (self.height - CONTENT_TOP - MARGIN).max(0.0));
        log::debug!("resized to {}x{}", self.width, self.height);
    }

    // -- Drawing ----------------------------------------------------------

    /// Draw one full frame: page content, then the chrome above it.
    pub fn frame(&self, canvas: &mut dyn Canvas) -> Result<()> {
        let (w, h) = (self.width.round() as u32, self.height.round() as u32);
        canvas.fill_rect(0, 0, w, h, self.colors.background)?;
        paint(&self.engine, &self.style, self.focused_link, canvas)?;

        // Cover any line scrolled partly above the viewport.
        let viewport = self.engine.viewport();
        canvas.fill_rect(0, 0, w, viewport.y.round() as u32, self.colors.background)?;
        self.address_bar
            .paint(canvas, self.colors.address_bar, self.colors.address_text)?;
        if !self.status.is_empty() {
            canvas.draw_text(
                &self.status,
                viewport.x.round() as i32,
                (viewport.y - STATUS_OFFSET).round() as i32,
                STATUS_FONT_SIZE,
                self.colors.status,
            )?;
        }
        Ok(())
    }

    /// The current page as pretty-printed JSON.
    pub fn page_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.page)?)
    }

    // -- Accessors --------------------------------------------------------

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn address_text(&self) -> &str {
        self.address_bar.text()
    }

    pub fn current_url(&self) -> Option<&Url> {
        self.current_url.as_ref()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn focused_link(&self) -> Option<usize> {
        self.focused_link
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// `HTTP <code>`, plus ` - <title>` when the page has one.
fn status_line(code: u16, title: &str) -> String {
    if title.is_empty() {
        format!("HTTP {code}")
    } else {
        format!("HTTP {code} - {title}")
    }
}
