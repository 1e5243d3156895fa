//! Shared test utilities for the front end.

use std::cell::RefCell;
use std::collections::HashMap;

use minibrowser_net::{Fetcher, Response, Url};
use minibrowser_types::canvas::{Canvas, Color, DrawCommand};
use minibrowser_types::error::{BrowserError, Result};

/// A canvas that records all draw calls for test assertions.
pub struct MockCanvas {
    pub calls: Vec<DrawCommand>,
}

impl MockCanvas {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
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

    /// `DrawText` calls as `(text, x, y, font_size)`.
    pub fn text_runs(&self) -> Vec<(&str, i32, i32, u16)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DrawText {
                    text, x, y, font_size, ..
                } => Some((text.as_str(), *x, *y, *font_size)),
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

/// Serves canned pages keyed by URL string, fragment dropped.
pub struct MockFetcher {
    pages: HashMap<String, (u16, String)>,
    /// Pages that answer one request and then refuse connections.
    once: RefCell<HashMap<String, String>>,
    redirects: HashMap<String, String>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            once: RefCell::new(HashMap::new()),
            redirects: HashMap::new(),
        }
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), (200, html.to_string()));
        self
    }

    pub fn status_page(mut self, url: &str, status: u16, html: &str) -> Self {
        self.pages.insert(url.to_string(), (status, html.to_string()));
        self
    }

    /// Serve `html` for the first request to `url` only.
    pub fn once(self, url: &str, html: &str) -> Self {
        self.once.borrow_mut().insert(url.to_string(), html.to_string());
        self
    }

    /// Answer `from` with the page stored under `to`, reporting `to` as
    /// the final URL.
    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &Url) -> Result<Response> {
        let mut url = url.clone();
        url.fragment = None;
        let requested = url.to_string();
        let key = self.redirects.get(&requested).cloned().unwrap_or(requested);
        let served_once = self.once.borrow_mut().remove(&key).map(|html| (200, html));
        let (status, body) = served_once
            .or_else(|| self.pages.get(&key).cloned())
            .ok_or_else(|| BrowserError::Network(format!("connection refused: {key}")))?;
        let final_url = Url::parse(&key).ok_or_else(|| BrowserError::Url(key.clone()))?;
        Ok(Response {
            url: final_url,
            status,
            body: body.into_bytes(),
        })
    }
}
