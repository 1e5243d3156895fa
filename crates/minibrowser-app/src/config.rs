//! Application configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use minibrowser_engine::{EngineConfig, PaintStyle};
use minibrowser_net::NetConfig;
use minibrowser_types::canvas::Color;
use minibrowser_types::error::{BrowserError, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "MINIBROWSER_CONFIG";

/// Config file looked for in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "minibrowser.toml";

/// Top-level configuration (`minibrowser.toml`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Page loaded at startup when no address is given.
    pub home_url: String,
    pub window: WindowConfig,
    pub engine: EngineConfig,
    pub net: NetConfig,
    pub colors: ColorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home_url: "about:blank".to_string(),
            window: WindowConfig::default(),
            engine: EngineConfig::default(),
            net: NetConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

/// Initial surface size.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Colors as `#rrggbb` or `#rrggbbaa` strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub background: Color,
    pub text: Color,
    pub link: Color,
    pub focus: Color,
    pub scrollbar: Color,
    pub status: Color,
    pub address_bar: Color,
    pub address_text: Color,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            text: Color::BLACK,
            link: Color::rgb(0, 102, 204),
            focus: Color::rgb(255, 200, 0),
            scrollbar: Color::rgb(160, 160, 160),
            status: Color::rgb(50, 50, 50),
            address_bar: Color::rgb(200, 200, 200),
            address_text: Color::BLACK,
        }
    }
}

impl ColorConfig {
    /// Paint style for the page content.
    pub fn paint_style(&self) -> PaintStyle {
        PaintStyle {
            text_color: self.text,
            link_color: self.link,
            focus_color: self.focus,
            scrollbar_color: self.scrollbar,
            ..PaintStyle::default()
        }
    }
}

impl AppConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BrowserError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    /// Load from `$MINIBROWSER_CONFIG`, else `./minibrowser.toml` if it
    /// exists, else defaults.
    pub fn load() -> Result<Self> {
        match config_path(std::env::var_os(CONFIG_ENV).map(PathBuf::from)) {
            Some(path) => {
                log::info!("loading config from {}", path.display());
                Self::from_file(&path)
            },
            None => {
                log::debug!("no config file; using defaults");
                Ok(Self::default())
            },
        }
    }

    fn validate(&self) -> Result<()> {
        let engine = &self.engine;
        if !(engine.font_size > 0.0 && engine.font_size.is_finite()) {
            return Err(BrowserError::Config(format!(
                "engine.font_size must be positive, got {}",
                engine.font_size
            )));
        }
        if !(engine.char_advance_ratio > 0.0 && engine.line_spacing > 0.0) {
            return Err(BrowserError::Config(
                "engine.char_advance_ratio and engine.line_spacing must be positive".to_string(),
            ));
        }
        if !(self.window.width >= 0.0 && self.window.height >= 0.0) {
            return Err(BrowserError::Config(
                "window size must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Pick the config file: an explicit path wins, then the working
/// directory default if present.
fn config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.is_file().then_some(local)
    })
}
