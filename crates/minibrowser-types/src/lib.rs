//! Foundation types for minibrowser.
//!
//! Shared by every crate in the workspace: the error enum, abstract input
//! events, geometry, colors, and the draw-primitive / canvas seam between
//! the layout engine and whatever surface displays it.

pub mod canvas;
pub mod error;
pub mod geometry;
pub mod input;
