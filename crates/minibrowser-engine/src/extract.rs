//! Markup-to-text extraction.
//!
//! A single forgiving pass over raw HTML that produces a [`Page`]: the
//! document title, a paragraph-aware plain-text body, and the page's links
//! located as byte spans inside that body. This is not an HTML parser:
//! there is no tokenizer, no tree, and no error path. Tags are matched by
//! ASCII case-insensitive substring search and anything that does not
//! match degrades to noisier text or a missing link.

use serde::Serialize;

// -------------------------------------------------------------------
// Public types
// -------------------------------------------------------------------

/// The extracted rendition of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Decoded, trimmed `<title>` text (empty when absent).
    pub title: String,
    /// Newline-separated plain text with tags stripped and entities
    /// decoded. Never contains empty lines.
    pub body: String,
    /// Links in source order. Every span indexes into `body`.
    pub links: Vec<LinkSpan>,
}

/// A hyperlink located inside [`Page::body`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSpan {
    /// Decoded anchor text; equal to `body[start..end]`.
    pub text: String,
    /// Raw `href` value, unresolved.
    pub target: String,
    /// Byte offset of the first character in the body.
    pub start: usize,
    /// Byte offset one past the last character in the body.
    pub end: usize,
}

impl Page {
    /// Whether extraction produced nothing at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.body.is_empty() && self.links.is_empty()
    }
}

// -------------------------------------------------------------------
// Tag tables
// -------------------------------------------------------------------

/// Tags that end a visual line. Each occurrence becomes one `\n`.
const LINE_BREAK_TAGS: &[&str] = &[
    "<br>", "<br/>", "<br />", "<hr>", "<hr/>", "<hr />", "</p>", "<p>", "</div>", "</section>",
    "</article>", "</header>", "</footer>", "</h1>", "</h2>", "</h3>", "</h4>", "</h5>", "</h6>",
    "</li>", "</ul>", "</ol>",
];

/// Elements whose content is never visible, as (open prefix, close tag).
const HIDDEN_BLOCKS: &[(&str, &str)] = &[("<script", "</script>"), ("<style", "</style>")];

/// The entities decoded by [`decode_entities`]. Nothing else is.
const ENTITIES: &[(&str, char)] = &[
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
];

// -------------------------------------------------------------------
// Entry point
// -------------------------------------------------------------------

/// Extract title, body text, and link spans from raw markup.
///
/// Total and deterministic: every input, including the empty string and
/// arbitrarily broken markup, produces a `Page`.
pub fn extract(markup: &str) -> Page {
    let title = extract_title(markup);

    let mut body = normalize_line_breaks(markup);
    for (open, close) in HIDDEN_BLOCKS {
        body = remove_blocks(&body, open, close);
    }
    let body = clean_text(&body);

    let links = extract_links(markup, &body);

    log::debug!(
        "extracted page: title={title:?}, {} body bytes, {} links",
        body.len(),
        links.len(),
    );

    Page { title, body, links }
}

// -------------------------------------------------------------------
// Title
// -------------------------------------------------------------------

fn extract_title(markup: &str) -> String {
    let lower = markup.to_ascii_lowercase();
    let Some(open) = lower.find("<title") else {
        return String::new();
    };
    let Some(open_end) = find_from(&lower, ">", open) else {
        return String::new();
    };
    match find_from(&lower, "</title>", open_end) {
        Some(close) if close > open_end => clean_text(&markup[open_end + 1..close]),
        _ => String::new(),
    }
}

// -------------------------------------------------------------------
// Links
// -------------------------------------------------------------------

fn extract_links(markup: &str, body: &str) -> Vec<LinkSpan> {
    let lower = markup.to_ascii_lowercase();
    let mut links = Vec::new();
    let mut pos = 0;

    while let Some(open) = find_from(&lower, "<a", pos) {
        let after_name = open + 2;
        pos = after_name;

        // `<a` must be the whole tag name (`<abbr>`, `<aside>` are not links).
        if !lower[after_name..].starts_with(|c: char| c.is_ascii_whitespace()) {
            continue;
        }
        let Some(tag_end) = find_from(&lower, ">", after_name) else {
            break;
        };
        let Some(href) = lower[after_name..tag_end].find("href=") else {
            continue;
        };
        let Some((target, value_end)) = attr_value(markup, after_name + href + "href=".len())
        else {
            continue;
        };
        // A quoted value may itself contain `>`; the tag ends after it.
        let Some(content_start) = find_from(markup, ">", value_end).map(|i| i + 1) else {
            break;
        };
        let Some(content_end) = find_from(&lower, "</a>", content_start) else {
            break;
        };
        pos = content_end + "</a>".len();

        let text = clean_text(&markup[content_start..content_end]);
        if text.is_empty() {
            log::trace!("dropping link to {target:?}: empty text");
            continue;
        }
        match body.find(&text) {
            Some(start) => links.push(LinkSpan {
                end: start + text.len(),
                start,
                text,
                target,
            }),
            None => log::trace!("dropping link to {target:?}: text {text:?} not in body"),
        }
    }

    links
}

/// Read an attribute value starting at byte `start`.
///
/// Returns the raw value and the byte offset just past it (past the
/// closing quote for quoted values). `None` for an unterminated quote.
fn attr_value(markup: &str, start: usize) -> Option<(String, usize)> {
    let rest = &markup[start..];
    match rest.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let inner = &rest[1..];
            let len = inner.find(quote)?;
            Some((inner[..len].to_string(), start + 1 + len + 1))
        },
        _ => {
            let len = rest
                .find(|c: char| c.is_ascii_whitespace() || c == '>')
                .unwrap_or(rest.len());
            Some((rest[..len].to_string(), start + len))
        },
    }
}

// -------------------------------------------------------------------
// Text pipeline stages
// -------------------------------------------------------------------

/// Strip tags, decode entities, and normalize lines.
fn clean_text(fragment: &str) -> String {
    trim_lines(&decode_entities(&strip_tags(fragment)))
}

/// Replace every line-breaking tag with a single newline.
fn normalize_line_breaks(s: &str) -> String {
    let lower = s.to_ascii_lowercase();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while let Some(at) = find_from(s, "<", i) {
        out.push_str(&s[i..at]);
        match LINE_BREAK_TAGS.iter().find(|tag| lower[at..].starts_with(**tag)) {
            Some(tag) => {
                out.push('\n');
                i = at + tag.len();
            },
            None => {
                out.push('<');
                i = at + 1;
            },
        }
    }
    out.push_str(&s[i..]);
    out
}

/// Remove every `open ... close` block, tags included. An unterminated
/// block swallows the rest of the input.
fn remove_blocks(s: &str, open: &str, close: &str) -> String {
    let lower = s.to_ascii_lowercase();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while let Some(start) = find_from(&lower, open, i) {
        out.push_str(&s[i..start]);
        match find_from(&lower, close, start + open.len()) {
            Some(end) => i = end + close.len(),
            None => return out,
        }
    }
    out.push_str(&s[i..]);
    out
}

/// Drop everything between `<` and the next `>`.
///
/// A stray `>` outside a tag is dropped as well; literal angle brackets
/// survive only as `&lt;`/`&gt;`, which are decoded afterwards.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {},
        }
    }
    out
}

/// Decode the five XML predefined entities; leave everything else alone.
fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while let Some(amp) = find_from(s, "&", i) {
        out.push_str(&s[i..amp]);
        match ENTITIES.iter().find(|(name, _)| s[amp..].starts_with(name)) {
            Some((name, ch)) => {
                out.push(*ch);
                i = amp + name.len();
            },
            None => {
                out.push('&');
                i = amp + 1;
            },
        }
    }
    out.push_str(&s[i..]);
    out
}

/// Trim spaces, tabs, and carriage returns from each line, drop lines left
/// empty, and rejoin with single newlines.
fn trim_lines(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for line in s
        .split('\n')
        .map(|l| l.trim_matches([' ', '\t', '\r']))
        .filter(|l| !l.is_empty())
    {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);
    }
    out
}

/// `haystack[from..].find(needle)` as an absolute offset.
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack.get(from..)?.find(needle).map(|i| from + i)
}

// -------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- title ----------------------------------------------------------

    #[test]
    fn parse_title() {
        let page = extract("<html><head><title>Test Page</title></head><body>Content</body></html>");
        assert_eq!(page.title, "Test Page");
    }

    #[test]
    fn title_is_case_insensitive_and_decoded() {
        let page = extract("<TITLE lang=\"en\">  Tom &amp; Jerry\n</Title>");
        assert_eq!(page.title, "Tom & Jerry");
    }

    #[test]
    fn title_missing_close_is_empty() {
        assert_eq!(extract("<title>Never closed").title, "");
        assert_eq!(extract("<p>no title</p>").title, "");
    }

    #[test]
    fn title_with_unterminated_open_tag_is_empty() {
        assert_eq!(extract("<title").title, "");
    }

    // -- body -----------------------------------------------------------

    #[test]
    fn empty_html() {
        let page = extract("");
        assert!(page.title.is_empty());
        assert!(page.body.is_empty());
        assert!(page.links.is_empty());
        assert!(page.is_empty());
    }

    #[test]
    fn strip_tags_keeps_inline_text() {
        let page = extract("<p>Hello <strong>World</strong></p>");
        assert!(page.body.contains("Hello World"));
    }

    #[test]
    fn decode_known_entities() {
        let page = extract("<p>&lt;tag&gt; &amp; &quot;quotes&quot; &apos;s</p>");
        assert!(page.body.contains("<tag>"));
        assert!(page.body.contains('&'));
        assert!(page.body.contains("\"quotes\""));
        assert!(page.body.contains("'s"));
    }

    #[test]
    fn unknown_entities_stay_literal() {
        let page = extract("a &nbsp; b &#169; c &amp d");
        assert_eq!(page.body, "a &nbsp; b &#169; c &amp d");
    }

    #[test]
    fn strip_script_and_style() {
        let html = "<html><head><script>alert('hi');</script></head>\
                    <body>Text<style>css{}</style></body></html>";
        let page = extract(html);
        assert!(!page.body.contains("alert"));
        assert!(!page.body.contains("css"));
        assert!(page.body.contains("Text"));
    }

    #[test]
    fn script_with_attributes_and_mixed_case() {
        let page = extract("before<SCRIPT type=\"x\">var a = 1;</Script>after");
        assert_eq!(page.body, "beforeafter");
    }

    #[test]
    fn unterminated_script_hides_rest_of_document() {
        let page = extract("<p>visible</p><script>hidden <p>also hidden</p>");
        assert_eq!(page.body, "visible");
    }

    #[test]
    fn paragraphs_become_lines() {
        let page = extract("<p>First paragraph</p><br/><p>Second paragraph</p>");
        assert_eq!(page.body, "First paragraph\nSecond paragraph");
    }

    #[test]
    fn break_tag_variants_all_break() {
        let page = extract("a<br>b<BR/>c<br />d<hr>e<h2>f</h2>g</LI>h");
        // `<h2>` opens inline; only its close tag breaks.
        assert_eq!(page.body, "a\nb\nc\nd\nef\ng\nh");
    }

    #[test]
    fn non_break_tags_do_not_break() {
        // `<pre>` starts with `<p` but is not `<p>`.
        let page = extract("a<pre>b</pre>c<span>d</span>");
        assert_eq!(page.body, "abcd");
    }

    #[test]
    fn lines_are_trimmed_and_blank_lines_dropped() {
        let page = extract("  one  \r\n\n\t\n   two\t\n   ");
        assert_eq!(page.body, "one\ntwo");
    }

    #[test]
    fn stray_close_bracket_is_dropped() {
        let page = extract("a > b");
        assert_eq!(page.body, "a  b");
    }

    #[test]
    fn multibyte_text_survives() {
        let page = extract("<p>Grüße</p><p>日本語 <b>テキスト</b></p>");
        assert_eq!(page.body, "Grüße\n日本語 テキスト");
    }

    // -- links ----------------------------------------------------------

    #[test]
    fn extract_two_links_in_order() {
        let html = r#"<html><body><a href="https://example.com">Example Link</a> and <a href="/page">Relative</a></body></html>"#;
        let page = extract(html);
        assert_eq!(page.links.len(), 2);
        assert_eq!(page.links[0].text, "Example Link");
        assert_eq!(page.links[0].target, "https://example.com");
        assert_eq!(page.links[1].text, "Relative");
        assert_eq!(page.links[1].target, "/page");
        for link in &page.links {
            assert_eq!(&page.body[link.start..link.end], link.text);
        }
    }

    #[test]
    fn link_quote_styles() {
        let html = "<a href='single'>One</a> <a href=bare>Two</a> <a href=bare2 class=x>Three</a>";
        let page = extract(html);
        let targets: Vec<&str> = page.links.iter().map(|l| l.target.as_str()).collect();
        assert_eq!(targets, vec!["single", "bare", "bare2"]);
    }

    #[test]
    fn link_with_uppercase_tag_and_attributes() {
        let page = extract(r#"<A CLASS="nav" HREF="/x">Go</A>"#);
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].target, "/x");
        assert_eq!(page.links[0].text, "Go");
    }

    #[test]
    fn link_target_kept_raw() {
        let page = extract(r#"<a href="/search?a=1&amp;b=2">Search</a>"#);
        assert_eq!(page.links[0].target, "/search?a=1&amp;b=2");
    }

    #[test]
    fn quoted_target_may_contain_close_bracket() {
        let page = extract(r#"<a href="/a>b">Odd</a>"#);
        assert_eq!(page.links[0].target, "/a>b");
        assert_eq!(page.links[0].text, "Odd");
    }

    #[test]
    fn link_inner_markup_stripped_and_decoded() {
        let page = extract(r#"<p><a href="/t"><b>Fish</b> &amp; Chips</a></p>"#);
        assert_eq!(page.links[0].text, "Fish & Chips");
        assert_eq!(page.body, "Fish & Chips");
        assert_eq!(page.links[0].start, 0);
        assert_eq!(page.links[0].end, "Fish & Chips".len());
    }

    #[test]
    fn anchor_without_href_is_ignored() {
        let page = extract(r#"<a name="top">Top</a> <a href="/b">B</a>"#);
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].target, "/b");
    }

    #[test]
    fn abbr_and_aside_are_not_anchors() {
        let page = extract(r#"<abbr href="/no">HTML</abbr><aside>x</aside>"#);
        assert!(page.links.is_empty());
    }

    #[test]
    fn empty_link_text_is_dropped() {
        let page = extract(r#"<a href="/img"><img src="x.png"></a>text"#);
        assert!(page.links.is_empty());
    }

    #[test]
    fn link_inside_script_is_not_located() {
        let page = extract(r#"<script>document.write('<a href="/s">Hidden</a>')</script>ok"#);
        assert!(page.links.is_empty());
        assert_eq!(page.body, "ok");
    }

    #[test]
    fn unterminated_quote_skips_anchor() {
        let page = extract(r#"<a href="/ok">Fine</a> <a href="/broken>Broken</a>"#);
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].target, "/ok");
    }

    #[test]
    fn missing_close_anchor_stops_scan() {
        let page = extract(r#"<a href="/x">never closed"#);
        assert!(page.links.is_empty());
    }

    #[test]
    fn duplicate_link_text_resolves_to_first_occurrence() {
        let page = extract(r#"<p>Home</p><a href="/a">Home</a><a href="/b">Home</a>"#);
        assert_eq!(page.links.len(), 2);
        assert_eq!(page.links[0].start, 0);
        assert_eq!(page.links[1].start, 0);
        assert_eq!(page.links[1].target, "/b");
    }

    #[test]
    fn link_spans_multibyte_offsets() {
        let page = extract(r#"<p>café <a href="/m">menü</a></p>"#);
        let link = &page.links[0];
        assert_eq!(&page.body[link.start..link.end], "menü");
        assert_eq!(link.start, "café ".len());
    }

    #[test]
    fn page_serializes_to_json() {
        let page = extract(r#"<title>T</title><a href="/x">X</a>"#);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["links"][0]["target"], "/x");
        assert_eq!(json["links"][0]["start"], 1);
    }

    // -- pipeline helpers -----------------------------------------------

    #[test]
    fn remove_blocks_multiple() {
        let s = remove_blocks("a<style>x</style>b<style>y</style>c", "<style", "</style>");
        assert_eq!(s, "abc");
    }

    #[test]
    fn decode_entities_adjacent() {
        assert_eq!(decode_entities("&lt;&lt;&gt;&amp;amp;"), "<<>&amp;");
    }

    #[test]
    fn find_from_out_of_range_is_none() {
        assert_eq!(find_from("abc", "a", 10), None);
        assert_eq!(find_from("abca", "a", 1), Some(3));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn arb_fragment() -> impl Strategy<Value = String> {
            prop_oneof![
                Just("<p>".to_string()),
                Just("</p>".to_string()),
                Just("<br/>".to_string()),
                Just("<a href=\"/x\">".to_string()),
                Just("<a href='/y' class=z>".to_string()),
                Just("</a>".to_string()),
                Just("<script>".to_string()),
                Just("</script>".to_string()),
                Just("<title>".to_string()),
                Just("</title>".to_string()),
                Just("&amp;".to_string()),
                Just("&lt;".to_string()),
                Just("<".to_string()),
                Just(">".to_string()),
                "[a-zA-Z ]{0,8}",
                "\\PC{0,4}",
                Just("\n".to_string()),
            ]
        }

        fn arb_markup() -> impl Strategy<Value = String> {
            proptest::collection::vec(arb_fragment(), 0..40).prop_map(|v| v.concat())
        }

        proptest! {
            #[test]
            fn link_spans_index_body(markup in arb_markup()) {
                let page = extract(&markup);
                for link in &page.links {
                    prop_assert!(link.start <= link.end);
                    prop_assert!(link.end <= page.body.len());
                    prop_assert_eq!(&page.body[link.start..link.end], link.text.as_str());
                    prop_assert!(!link.text.is_empty());
                }
            }

            #[test]
            fn body_has_no_blank_or_padded_lines(markup in arb_markup()) {
                let page = extract(&markup);
                if !page.body.is_empty() {
                    for line in page.body.split('\n') {
                        prop_assert!(!line.is_empty());
                        prop_assert_eq!(line, line.trim_matches([' ', '\t', '\r']));
                    }
                }
            }

            #[test]
            fn extraction_is_deterministic(markup in arb_markup()) {
                prop_assert_eq!(extract(&markup), extract(&markup));
            }

            #[test]
            fn arbitrary_text_never_panics(s in "\\PC{0,200}") {
                let page = extract(&s);
                for link in &page.links {
                    prop_assert!(link.end <= page.body.len());
                }
            }
        }
    }
}
