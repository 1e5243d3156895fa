//! Error types for minibrowser.
//!
//! The extraction and layout core never produces these: malformed markup
//! degrades to omission there. They belong to the collaborators around it
//! (network fetch, configuration, drawing surfaces).

use std::io;

/// Errors produced outside the extraction/layout core.
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid URL: {0}")]
    Url(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("canvas error: {0}")]
    Canvas(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BrowserError>;
