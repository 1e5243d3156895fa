//! Front end for minibrowser.
//!
//! [`Browser`](browser::Browser) drives one page through fetch, extraction,
//! and layout, with an address bar, back/forward history, and keyboard link
//! focus. [`TextCanvas`](text_canvas::TextCanvas) renders its frames as a
//! character grid so the whole stack runs headless.

pub mod address_bar;
pub mod browser;
pub mod commands;
pub mod config;
pub mod history;
pub mod text_canvas;

#[cfg(test)]
pub(crate) mod test_utils;

pub use browser::{Browser, BrowserAction, Focus};
pub use config::AppConfig;
pub use text_canvas::TextCanvas;
