//! Resource fetching for minibrowser.
//!
//! [`Url`] parsing and relative resolution, address-bar normalization, and
//! the [`Fetcher`] seam with its implementations: a blocking HTTP/1.1
//! client ([`HttpClient`]), a local file loader ([`FileFetcher`]), and a
//! scheme dispatcher ([`DefaultFetcher`]). HTTPS goes through a
//! [`TlsProvider`]; the rustls-backed one is behind the `tls-rustls`
//! feature.

pub mod config;
pub mod fetch;
pub mod file;
pub mod http;
pub mod tls;
#[cfg(feature = "tls-rustls")]
pub mod tls_rustls;
pub mod url;

pub use config::NetConfig;
pub use fetch::{DefaultFetcher, Fetcher, Response};
pub use file::FileFetcher;
pub use http::HttpClient;
pub use tls::TlsProvider;
pub use url::{Url, normalize_address};
