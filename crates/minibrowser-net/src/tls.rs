//! TLS seam for the HTTP client.

use std::io::{Read, Write};
use std::net::TcpStream;

use minibrowser_types::error::Result;

/// A bidirectional byte stream (plain TCP or TLS-wrapped).
pub trait Stream: Read + Write + Send {}

impl<T: Read + Write + Send> Stream for T {}

/// Upgrades a connected TCP stream to TLS.
pub trait TlsProvider: Send + Sync {
    /// Wrap `stream` in a TLS session for `server_name` (used for SNI and
    /// certificate verification).
    fn connect_tls(&self, stream: TcpStream, server_name: &str) -> Result<Box<dyn Stream>>;
}

/// The TLS provider compiled into this build, if any.
pub fn default_provider() -> Option<Box<dyn TlsProvider>> {
    #[cfg(feature = "tls-rustls")]
    {
        Some(Box::new(crate::tls_rustls::RustlsTlsProvider::new()))
    }
    #[cfg(not(feature = "tls-rustls"))]
    {
        None
    }
}
