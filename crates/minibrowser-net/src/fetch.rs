//! The fetch seam and the scheme dispatcher.

use minibrowser_types::error::{BrowserError, Result};

use crate::config::NetConfig;
use crate::file::FileFetcher;
use crate::http::HttpClient;
use crate::url::Url;

/// A fetched resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Final URL, after redirects.
    pub url: Url,
    /// HTTP status code (200 for local files and `about:` pages).
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Anything that can turn a URL into bytes.
pub trait Fetcher {
    fn fetch(&self, url: &Url) -> Result<Response>;
}

/// Dispatches by scheme: `http`/`https` over the network, `file` from
/// disk, `about:blank` as an empty page.
pub struct DefaultFetcher {
    http: HttpClient,
    file: FileFetcher,
}

impl DefaultFetcher {
    pub fn new(config: NetConfig) -> Self {
        Self::with_http(HttpClient::new(config))
    }

    pub fn with_http(http: HttpClient) -> Self {
        Self {
            http,
            file: FileFetcher,
        }
    }
}

impl Fetcher for DefaultFetcher {
    fn fetch(&self, url: &Url) -> Result<Response> {
        match url.scheme.as_str() {
            "http" | "https" => self.http.fetch(url),
            "file" => self.file.fetch(url),
            "about" if url.is_about_blank() => Ok(Response {
                url: url.clone(),
                status: 200,
                body: Vec::new(),
            }),
            "about" => Err(BrowserError::Url(format!("unknown page: {url}"))),
            "" => Err(BrowserError::Url("relative URL with no base".to_string())),
            scheme => Err(BrowserError::Url(format!("unsupported scheme: {scheme}"))),
        }
    }
}
