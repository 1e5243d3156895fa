//! Network settings.

use std::time::Duration;

use serde::Deserialize;

/// Settings for outgoing requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Connect and read timeout, in milliseconds.
    pub timeout_ms: u64,
    /// Value of the `User-Agent` request header.
    pub user_agent: String,
    /// Redirect hops followed before giving up.
    pub max_redirects: u8,
    /// Largest response body accepted.
    pub max_body_bytes: usize,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            user_agent: "mini-browser/0.1".to_string(),
            max_redirects: 5,
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}

impl NetConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = NetConfig::default();
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.user_agent, "mini-browser/0.1");
        assert_eq!(cfg.max_redirects, 5);
        assert_eq!(cfg.max_body_bytes, 8 * 1024 * 1024);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: NetConfig = toml::from_str("timeout_ms = 2500").unwrap();
        assert_eq!(cfg.timeout(), Duration::from_millis(2500));
        assert_eq!(cfg.max_redirects, 5);
    }
}
