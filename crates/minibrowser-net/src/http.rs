//! Minimal HTTP/1.1 GET client.
//!
//! Plain HTTP runs over `std::net::TcpStream`; HTTPS needs a
//! [`TlsProvider`]. Without one, HTTPS requests fail with a network error.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use minibrowser_types::error::{BrowserError, Result};

use crate::config::NetConfig;
use crate::fetch::{Fetcher, Response};
use crate::tls::{self, TlsProvider};
use crate::url::Url;

/// Slack allowed for the header block on top of the body limit.
const HEADER_ALLOWANCE: usize = 64 * 1024;

/// Blocking HTTP(S) client.
pub struct HttpClient {
    config: NetConfig,
    tls: Option<Box<dyn TlsProvider>>,
}

impl HttpClient {
    /// Client using the TLS provider compiled into this build, if any.
    pub fn new(config: NetConfig) -> Self {
        Self::with_tls(config, tls::default_provider())
    }

    /// Client with a caller-supplied TLS provider. `None` speaks plain
    /// HTTP only.
    pub fn with_tls(config: NetConfig, tls: Option<Box<dyn TlsProvider>>) -> Self {
        Self { config, tls }
    }

    /// GET `url`, following redirects (301/302/303/307/308) up to
    /// `max_redirects` hops.
    ///
    /// Any final status (including 4xx and 5xx) is returned as a
    /// [`Response`]; only transport and protocol failures are errors.
    pub fn get(&self, url: &Url) -> Result<Response> {
        let mut current = url.clone();
        let mut hops = 0u8;
        loop {
            self.check_scheme(&current)?;
            let resp = self.do_request(&current)?;

            if is_redirect(resp.status_code)
                && let Some(location) = find_header(&resp.headers, "location")
            {
                if hops >= self.config.max_redirects {
                    return Err(BrowserError::Network(format!(
                        "too many redirects (limit {})",
                        self.config.max_redirects
                    )));
                }
                hops += 1;
                let next = current.resolve(location).ok_or_else(|| {
                    BrowserError::Network(format!("bad redirect Location: {location}"))
                })?;
                log::debug!("redirect {} -> {next}", resp.status_code);
                current = next;
                continue;
            }

            log::info!(
                "GET {current} -> {} ({} bytes)",
                resp.status_code,
                resp.body.len()
            );
            return Ok(Response {
                url: current,
                status: resp.status_code,
                body: resp.body,
            });
        }
    }

    fn check_scheme(&self, url: &Url) -> Result<()> {
        match url.scheme.as_str() {
            "http" => Ok(()),
            "https" if self.tls.is_some() => Ok(()),
            "https" => Err(BrowserError::Network(
                "HTTPS not supported: TLS not available in this build".to_string(),
            )),
            scheme => Err(BrowserError::Network(format!(
                "unsupported scheme for HTTP client: {scheme}"
            ))),
        }
    }

    /// Connect, optionally upgrade to TLS, send GET, read and parse.
    fn do_request(&self, url: &Url) -> Result<HttpResponse> {
        if url.host.is_empty() {
            return Err(BrowserError::Url(format!("missing host in {url}")));
        }
        let is_https = url.scheme == "https";
        let port = url.port_or_default().unwrap_or(80);
        let stream = self.tcp_connect(&url.host, port)?;

        let raw = match (is_https, &self.tls) {
            (true, Some(tls)) => {
                let mut stream = tls.connect_tls(stream, &url.host)?;
                self.send_request(&mut stream, url)?;
                self.read_response(&mut stream)?
            },
            (true, None) => {
                return Err(BrowserError::Network("TLS not available".to_string()));
            },
            (false, _) => {
                let mut stream = stream;
                self.send_request(&mut stream, url)?;
                self.read_response(&mut stream)?
            },
        };
        parse_response(&raw, self.config.max_body_bytes)
    }

    /// Open a TCP connection with connect and read timeouts.
    fn tcp_connect(&self, host: &str, port: u16) -> Result<TcpStream> {
        let timeout = self.config.timeout();
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| BrowserError::Network(format!("DNS resolution failed for {host}: {e}")))?
            .next()
            .ok_or_else(|| BrowserError::Network(format!("no addresses for {host}:{port}")))?;

        let stream = TcpStream::connect_timeout(&addr, timeout)
            .map_err(|e| BrowserError::Network(format!("connect to {host}:{port} failed: {e}")))?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        Ok(stream)
    }

    /// Send an HTTP/1.1 GET request.
    fn send_request(&self, stream: &mut impl Write, url: &Url) -> Result<()> {
        let default_port = if url.scheme == "https" { 443 } else { 80 };
        let host_header = match url.port {
            Some(p) if p != default_port => format!("{}:{p}", url.host),
            _ => url.host.clone(),
        };
        let target = url.request_target();
        let user_agent = &self.config.user_agent;

        let request = format!(
            "GET {target} HTTP/1.1\r\n\
             Host: {host_header}\r\n\
             User-Agent: {user_agent}\r\n\
             Accept: text/html, */*\r\n\
             Accept-Encoding: identity\r\n\
             Connection: close\r\n\
             \r\n"
        );

        stream
            .write_all(request.as_bytes())
            .and_then(|()| stream.flush())
            .map_err(|e| BrowserError::Network(format!("send request: {e}")))
    }

    /// Read the entire response until EOF or until the read timeout fires.
    fn read_response(&self, stream: &mut impl Read) -> Result<Vec<u8>> {
        let limit = self.config.max_body_bytes.saturating_add(HEADER_ALLOWANCE);
        let mut buf = Vec::with_capacity(8192);
        let mut chunk = [0u8; 8192];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    if buf.len() + n > limit {
                        return Err(BrowserError::Network(format!(
                            "response exceeds {} byte limit",
                            self.config.max_body_bytes
                        )));
                    }
                    buf.extend_from_slice(&chunk[..n]);
                },
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                // TLS peers often close without close_notify.
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof && !buf.is_empty() => break,
                Err(e)
                    if !buf.is_empty()
                        && matches!(
                            e.kind(),
                            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                        ) =>
                {
                    log::warn!("read timed out after {} bytes; using partial response", buf.len());
                    break;
                },
                Err(e) => {
                    return Err(BrowserError::Network(format!("read response: {e}")));
                },
            }
        }
        Ok(buf)
    }
}

impl Fetcher for HttpClient {
    fn fetch(&self, url: &Url) -> Result<Response> {
        self.get(url)
    }
}

// -------------------------------------------------------------------
// Response parsing
// -------------------------------------------------------------------

/// A raw parsed HTTP response.
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code (e.g. 200, 404).
    pub status_code: u16,
    /// Response headers as (lowercased name, value) pairs.
    pub headers: Vec<(String, String)>,
    /// Decoded body bytes.
    pub body: Vec<u8>,
}

/// Parse raw bytes into status code, headers, and body, rejecting bodies
/// larger than `max_body`.
pub fn parse_response(data: &[u8], max_body: usize) -> Result<HttpResponse> {
    let header_end = find_subsequence(data, b"\r\n\r\n").ok_or_else(|| {
        BrowserError::Network("malformed HTTP response: no header terminator".to_string())
    })?;
    let header_str = std::str::from_utf8(&data[..header_end])
        .map_err(|_| BrowserError::Network("non-UTF-8 headers".to_string()))?;
    let raw_body = &data[header_end + 4..];

    let mut lines = header_str.split("\r\n");
    let status_line = lines
        .next()
        .ok_or_else(|| BrowserError::Network("empty response".to_string()))?;
    let status_code = parse_status_line(status_line)?;

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_string()))
        .collect();

    let too_large = || BrowserError::Network(format!("response body exceeds {max_body} byte limit"));

    let body = if find_header(&headers, "transfer-encoding")
        .is_some_and(|v| v.to_ascii_lowercase().contains("chunked"))
    {
        decode_chunked(raw_body, max_body)?
    } else if let Some(cl) = find_header(&headers, "content-length") {
        let len: usize = cl
            .parse()
            .map_err(|_| BrowserError::Network(format!("bad Content-Length: {cl}")))?;
        if len > max_body {
            return Err(too_large());
        }
        raw_body[..raw_body.len().min(len)].to_vec()
    } else {
        raw_body.to_vec()
    };

    if body.len() > max_body {
        return Err(too_large());
    }

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

/// Parse the status code from `HTTP/1.x NNN Reason`.
fn parse_status_line(line: &str) -> Result<u16> {
    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or("");
    let code = parts.next().unwrap_or("");
    if !version.starts_with("HTTP/") {
        return Err(BrowserError::Network(format!("bad status line: {line}")));
    }
    code.parse()
        .map_err(|_| BrowserError::Network(format!("bad status code in: {line}")))
}

/// Case-insensitive header lookup.
pub fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Decode a chunked transfer-encoded body.
fn decode_chunked(data: &[u8], max_body: usize) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    let mut pos = 0;

    while let Some(i) = find_subsequence(&data[pos..], b"\r\n") {
        let line_end = pos + i;
        let size_line = std::str::from_utf8(&data[pos..line_end])
            .map_err(|_| BrowserError::Network("bad chunk size".to_string()))?;
        // Chunk extensions follow a `;`.
        let size_str = size_line.split(';').next().unwrap_or("").trim();
        let chunk_size = usize::from_str_radix(size_str, 16)
            .map_err(|_| BrowserError::Network(format!("bad chunk size: {size_str:?}")))?;

        if chunk_size == 0 {
            break;
        }
        if result.len().saturating_add(chunk_size) > max_body {
            return Err(BrowserError::Network(format!(
                "chunked body exceeds {max_body} byte limit"
            )));
        }

        let chunk_start = line_end + 2;
        let chunk_end = chunk_start.saturating_add(chunk_size);
        if chunk_end > data.len() {
            // Truncated final chunk: keep what arrived.
            result.extend_from_slice(&data[chunk_start.min(data.len())..]);
            break;
        }
        result.extend_from_slice(&data[chunk_start..chunk_end]);
        pos = (chunk_end + 2).min(data.len());
    }

    Ok(result)
}

/// Whether a status code is a redirect we follow.
fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
