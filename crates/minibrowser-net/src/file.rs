//! `file://` loading.

use minibrowser_types::error::{BrowserError, Result};

use crate::fetch::{Fetcher, Response};
use crate::url::Url;

/// Reads `file://` URLs from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl Fetcher for FileFetcher {
    fn fetch(&self, url: &Url) -> Result<Response> {
        if url.scheme != "file" {
            return Err(BrowserError::Url(format!("not a file URL: {url}")));
        }
        if !url.host.is_empty() && url.host != "localhost" {
            return Err(BrowserError::Url(format!(
                "remote file host not supported: {}",
                url.host
            )));
        }
        let path = percent_decode(&url.path);
        let body = std::fs::read(&path)?;
        log::info!("read {path} ({} bytes)", body.len());
        Ok(Response {
            url: url.clone(),
            status: 200,
            body,
        })
    }
}

/// Decode `%XX` escapes. Malformed escapes are kept literally.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && let Some(hex) = s.get(i + 1..i + 3)
            && let Ok(b) = u8::from_str_radix(hex, 16)
        {
            out.push(b);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, b"<title>Local</title>").unwrap();

        let url = Url::parse(&format!("file://{}", path.display())).unwrap();
        let resp = FileFetcher.fetch(&url).unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, b"<title>Local</title>");
    }

    #[test]
    fn decodes_escaped_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my page.html");
        std::fs::write(&path, b"x").unwrap();

        let escaped = path.display().to_string().replace(' ', "%20");
        let url = Url::parse(&format!("file://{escaped}")).unwrap();
        assert_eq!(FileFetcher.fetch(&url).unwrap().body, b"x");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::parse(&format!("file://{}/nope.html", dir.path().display())).unwrap();
        assert!(matches!(FileFetcher.fetch(&url), Err(BrowserError::Io(_))));
    }

    #[test]
    fn remote_host_rejected() {
        let url = Url::parse("file://server/share/a.html").unwrap();
        assert!(matches!(FileFetcher.fetch(&url), Err(BrowserError::Url(_))));
    }

    #[test]
    fn percent_decode_cases() {
        assert_eq!(percent_decode("/a%20b"), "/a b");
        assert_eq!(percent_decode("/100%"), "/100%");
        assert_eq!(percent_decode("/%zz"), "/%zz");
        assert_eq!(percent_decode("/caf%C3%A9"), "/café");
    }
}
