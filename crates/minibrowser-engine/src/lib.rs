//! Page rendering core: markup extraction and text layout.
//!
//! [`extract`] turns raw HTML into a [`Page`] (title, plain body text, and
//! link spans with byte offsets into the body). [`LayoutEngine`] wraps that
//! body to a viewport, owns the scroll offset, and projects link spans onto
//! screen rectangles for drawing and hit-testing. [`paint`] turns the
//! engine's state into draw commands for a [`Canvas`].
//!
//! Neither stage performs I/O or returns errors: malformed input degrades
//! to missing text or unclickable links.
//!
//! [`Canvas`]: minibrowser_types::canvas::Canvas

pub mod config;
pub mod extract;
pub mod layout;
pub mod paint;
pub mod scroll;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::EngineConfig;
pub use extract::{LinkSpan, Page, extract};
pub use layout::{LayoutEngine, LayoutPhase, RenderedLink};
pub use paint::PaintStyle;
pub use scroll::ScrollState;
