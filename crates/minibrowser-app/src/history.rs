//! Session history: back and forward stacks with per-entry scroll.

/// A visited page.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    /// Scroll offset to restore when returning to the page.
    pub scroll_offset: f32,
}

impl HistoryEntry {
    fn new(url: &str, title: &str) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            scroll_offset: 0.0,
        }
    }
}

/// Back/forward navigation state.
#[derive(Debug, Default)]
pub struct History {
    back_stack: Vec<HistoryEntry>,
    forward_stack: Vec<HistoryEntry>,
    current: Option<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new page. The current page moves to the back stack and the
    /// forward stack is discarded. Reloading the current URL only updates
    /// its title.
    pub fn navigate(&mut self, url: &str, title: &str) {
        if let Some(current) = self.current.as_mut()
            && current.url == url
        {
            current.title = title.to_string();
            return;
        }
        if let Some(entry) = self.current.take() {
            self.back_stack.push(entry);
        }
        self.forward_stack.clear();
        self.current = Some(HistoryEntry::new(url, title));
    }

    /// Step back. Returns the entry to show, or `None` at the start.
    pub fn go_back(&mut self) -> Option<HistoryEntry> {
        let prev = self.back_stack.pop()?;
        if let Some(current) = self.current.take() {
            self.forward_stack.push(current);
        }
        self.current = Some(prev.clone());
        Some(prev)
    }

    /// Step forward. Returns the entry to show, or `None` at the end.
    pub fn go_forward(&mut self) -> Option<HistoryEntry> {
        let next = self.forward_stack.pop()?;
        if let Some(current) = self.current.take() {
            self.back_stack.push(current);
        }
        self.current = Some(next.clone());
        Some(next)
    }

    /// The entry [`go_back`](Self::go_back) would show, without moving.
    pub fn back_entry(&self) -> Option<&HistoryEntry> {
        self.back_stack.last()
    }

    /// The entry [`go_forward`](Self::go_forward) would show, without
    /// moving.
    pub fn forward_entry(&self) -> Option<&HistoryEntry> {
        self.forward_stack.last()
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.current.as_ref()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current.as_ref().map(|e| e.url.as_str())
    }

    /// Update the current page's title (after a reload).
    pub fn update_title(&mut self, title: &str) {
        if let Some(entry) = self.current.as_mut() {
            entry.title = title.to_string();
        }
    }

    /// Remember the current page's scroll position for back/forward.
    pub fn update_scroll(&mut self, scroll_offset: f32) {
        if let Some(entry) = self.current.as_mut() {
            entry.scroll_offset = scroll_offset;
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward_stack.is_empty()
    }

    /// All entries, oldest first, including the current one.
    pub fn entries(&self) -> Vec<&HistoryEntry> {
        self.back_stack
            .iter()
            .chain(self.current.iter())
            .chain(self.forward_stack.iter().rev())
            .collect()
    }
}
