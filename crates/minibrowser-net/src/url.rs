//! URL parsing, relative resolution, and address-bar normalization.

use std::fmt;

// ---------------------------------------------------------------------------
// Url
// ---------------------------------------------------------------------------

/// A parsed absolute (or fragment-only) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    /// Lowercased scheme (`"http"`, `"https"`, `"file"`, `"about"`).
    pub scheme: String,
    /// Host component. Empty for `file:///...` and `about:` URLs.
    pub host: String,
    /// Explicit port, if one was given.
    pub port: Option<u16>,
    /// Path starting with `/`, or the opaque part of an `about:` URL.
    pub path: String,
    /// Query string without the leading `?`.
    pub query: Option<String>,
    /// Fragment without the leading `#`.
    pub fragment: Option<String>,
}

impl Url {
    /// Parse a URL string.
    ///
    /// Accepts `scheme://host[:port]/path?query#fragment`, protocol-relative
    /// `//host/path`, fragment-only `#frag`, and `about:` URLs. Anything
    /// else (including scheme-less input like `example.com`) is `None`.
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }

        if let Some(frag) = url.strip_prefix('#') {
            return Some(Url {
                scheme: String::new(),
                host: String::new(),
                port: None,
                path: String::new(),
                query: None,
                fragment: Some(frag.to_string()),
            });
        }

        if let Some(rest) = strip_prefix_ignore_case(url, "about:") {
            return Some(Url {
                scheme: "about".to_string(),
                host: String::new(),
                port: None,
                path: rest.to_string(),
                query: None,
                fragment: None,
            });
        }

        if let Some(rest) = url.strip_prefix("//") {
            return Self::parse_authority_and_path("", rest);
        }

        let (scheme, rest) = url.split_once("://")?;
        if !is_scheme(scheme) {
            return None;
        }
        Self::parse_authority_and_path(scheme, rest)
    }

    /// Parse `host[:port]/path?query#fragment` once the scheme is gone.
    fn parse_authority_and_path(scheme: &str, rest: &str) -> Option<Url> {
        let (rest, fragment) = match rest.split_once('#') {
            Some((r, f)) => (r, Some(f.to_string())),
            None => (rest, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((r, q)) => (r, Some(q.to_string())),
            None => (rest, None),
        };
        let (authority, path) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, "/"),
        };

        let (host, port) = match authority.rsplit_once(':') {
            Some((h, p)) => match p.parse::<u16>() {
                Ok(port) => (h, Some(port)),
                Err(_) if p.is_empty() => (h, None),
                Err(_) => return None,
            },
            None => (authority, None),
        };

        Some(Url {
            scheme: scheme.to_lowercase(),
            host: host.to_lowercase(),
            port,
            path: path.to_string(),
            query,
            fragment,
        })
    }

    /// Resolve a link target against this URL.
    ///
    /// Handles absolute URLs, protocol-relative (`//host/path`), absolute
    /// paths (`/path`), relative paths with `.` and `..`, query-only
    /// (`?q=x`) and fragment-only (`#frag`) references. Returns `None`
    /// when the target has a scheme but does not parse.
    pub fn resolve(&self, relative: &str) -> Option<Url> {
        let relative = relative.trim();
        if relative.is_empty() {
            return Some(self.clone());
        }

        // `mailto:`, `javascript:` and other opaque schemes parse to `None`.
        if has_scheme(relative) || has_opaque_scheme(relative) {
            return Url::parse(relative);
        }

        if relative.starts_with("//") {
            return Url::parse(&format!("{}:{}", self.scheme, relative));
        }

        if let Some(frag) = relative.strip_prefix('#') {
            let mut resolved = self.clone();
            resolved.fragment = Some(frag.to_string());
            return Some(resolved);
        }

        if let Some(query) = relative.strip_prefix('?') {
            let mut resolved = self.clone();
            resolved.query = Some(query.to_string());
            resolved.fragment = None;
            return Some(resolved);
        }

        let (rel_path, query, fragment) = split_path_query_fragment(relative);
        let path = if rel_path.starts_with('/') {
            normalize_path("/", &rel_path)
        } else {
            normalize_path(self.directory(), &rel_path)
        };
        Some(Url {
            scheme: self.scheme.clone(),
            host: self.host.clone(),
            port: self.port,
            path,
            query,
            fragment,
        })
    }

    /// Directory part of the path, up to and including the last `/`.
    pub fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(i) => &self.path[..=i],
            None => "/",
        }
    }

    /// `scheme://host[:port]`.
    pub fn origin(&self) -> String {
        let mut s = format!("{}://{}", self.scheme, self.host);
        if let Some(port) = self.port {
            s.push_str(&format!(":{port}"));
        }
        s
    }

    /// Port to connect to: the explicit one, or the scheme default.
    pub fn port_or_default(&self) -> Option<u16> {
        self.port.or(match self.scheme.as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        })
    }

    /// Path plus query, as sent in an HTTP request line.
    pub fn request_target(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    pub fn is_about_blank(&self) -> bool {
        self.scheme == "about" && self.path.eq_ignore_ascii_case("blank")
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scheme == "about" {
            return write!(f, "about:{}", self.path);
        }
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        write!(f, "{}", self.path)?;
        if let Some(ref q) = self.query {
            write!(f, "?{q}")?;
        }
        if let Some(ref frag) = self.fragment {
            write!(f, "#{frag}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Address bar input
// ---------------------------------------------------------------------------

/// Turn typed address-bar text into a fetchable URL string.
///
/// Input is trimmed. Anything with an explicit `scheme://` or an `about:`
/// prefix is kept as typed; everything else gets `https://` prepended.
/// Empty input stays empty.
pub fn normalize_address(input: &str) -> String {
    let input = input.trim();
    if input.is_empty()
        || has_scheme(input)
        || strip_prefix_ignore_case(input, "about:").is_some()
    {
        return input.to_string();
    }
    format!("https://{input}")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_scheme(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Whether `s` starts with `scheme://`.
fn has_scheme(s: &str) -> bool {
    s.split_once("://").is_some_and(|(scheme, _)| is_scheme(scheme))
}

/// Whether `s` starts with `scheme:` and no `//` (`about:`, `mailto:`).
fn has_opaque_scheme(s: &str) -> bool {
    s.split_once(':')
        .is_some_and(|(scheme, rest)| is_scheme(scheme) && !rest.starts_with("//"))
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Split a reference into `(path, query, fragment)`.
fn split_path_query_fragment(s: &str) -> (String, Option<String>, Option<String>) {
    let (s, fragment) = match s.split_once('#') {
        Some((s, f)) => (s, Some(f.to_string())),
        None => (s, None),
    };
    let (path, query) = match s.split_once('?') {
        Some((p, q)) => (p.to_string(), Some(q.to_string())),
        None => (s.to_string(), None),
    };
    (path, query, fragment)
}

/// Join `relative` onto `base_dir` and collapse `.` and `..` segments.
/// A trailing slash on `relative` is kept.
fn normalize_path(base_dir: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();

    for seg in relative.split('/') {
        match seg {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            s => segments.push(s),
        }
    }

    let mut path = format!("/{}", segments.join("/"));
    let last = relative.rsplit('/').next().unwrap_or("");
    let keeps_slash = matches!(last, "" | "." | "..");
    if keeps_slash && !path.ends_with('/') {
        path.push('/');
    }
    path
}
