//! Greedy column wrapping and link re-location in wrapped output.

use crate::extract::LinkSpan;

// -------------------------------------------------------------------
// Wrapping
// -------------------------------------------------------------------

/// Result of one wrap pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wrapped {
    /// Output lines, without trailing newlines.
    pub lines: Vec<String>,
    /// Whether the character budget cut off part of the input.
    pub truncated: bool,
}

/// Re-flow `raw` into lines of at most `max_cols` characters.
///
/// Newlines in `raw` are hard breaks. Within a source line, words
/// (whitespace-delimited) are packed greedily, joined by single spaces. A
/// word longer than `max_cols` gets a line of its own and is not broken.
///
/// `budget` caps the number of characters laid out; each placed word
/// costs its length plus one. The first word that would exceed the budget
/// ends the pass and everything after it is dropped.
pub fn wrap_text(raw: &str, max_cols: usize, budget: usize) -> Wrapped {
    let mut out = Wrapped::default();
    if raw.is_empty() {
        return out;
    }
    let max_cols = max_cols.max(1);
    let raw = raw.strip_suffix('\n').unwrap_or(raw);

    let mut shown = 0usize;
    let mut source_lines = raw.split('\n');
    while let Some(source_line) = source_lines.next() {
        let mut current = String::new();
        let mut col = 0usize;

        for word in source_line.split_whitespace() {
            let word_cols = word.chars().count();
            if shown + word_cols > budget {
                out.truncated = true;
                if !current.is_empty() {
                    out.lines.push(current);
                }
                return out;
            }
            if col == 0 {
                current.push_str(word);
                col = word_cols;
            } else if col + 1 + word_cols <= max_cols {
                current.push(' ');
                current.push_str(word);
                col += 1 + word_cols;
            } else {
                out.lines.push(std::mem::take(&mut current));
                current.push_str(word);
                col = word_cols;
            }
            shown += word_cols + 1;
        }
        out.lines.push(current);

        if shown >= budget {
            out.truncated = source_lines.any(|l| !l.trim().is_empty());
            break;
        }
    }
    out
}

// -------------------------------------------------------------------
// Link placement
// -------------------------------------------------------------------

/// A run of characters on one wrapped line, in columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
}

/// Where a link's text was found in the wrapped output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPlacement {
    /// Index into the link list handed to the engine.
    pub link_index: usize,
    pub target: String,
    /// One segment per wrapped line the text touches, top to bottom.
    pub segments: Vec<LineSegment>,
}

/// Locate each link's text in the wrapped lines.
///
/// Uses the first occurrence of the text in the newline-joined output.
/// Links whose text does not occur (split by wrapping, cut by the budget,
/// or empty) are left out.
pub fn place_links(lines: &[String], links: &[LinkSpan]) -> Vec<LinkPlacement> {
    if lines.is_empty() || links.is_empty() {
        return Vec::new();
    }
    let joined = lines.join("\n");

    // Byte offset of each line's first character in `joined`.
    let mut line_starts = Vec::with_capacity(lines.len());
    let mut offset = 0;
    for line in lines {
        line_starts.push(offset);
        offset += line.len() + 1;
    }

    let mut placements = Vec::new();
    for (link_index, link) in links.iter().enumerate() {
        if link.text.is_empty() {
            continue;
        }
        let Some(start) = joined.find(&link.text) else {
            log::trace!("link {link_index} ({:?}) not found in wrapped text", link.target);
            continue;
        };
        let end = start + link.text.len();
        placements.push(LinkPlacement {
            link_index,
            target: link.target.clone(),
            segments: segments_for(lines, &line_starts, start, end),
        });
    }
    placements
}

/// Split the byte range `[start, end)` of the joined text into per-line
/// column segments. Empty segments (a bare newline) are skipped.
fn segments_for(
    lines: &[String],
    line_starts: &[usize],
    start: usize,
    end: usize,
) -> Vec<LineSegment> {
    let mut segments = Vec::new();
    for (line, (text, &line_start)) in lines.iter().zip(line_starts).enumerate() {
        let line_end = line_start + text.len();
        if line_end < start {
            continue;
        }
        if line_start >= end {
            break;
        }
        let from = start.max(line_start) - line_start;
        let to = end.min(line_end) - line_start;
        if from >= to {
            continue;
        }
        let start_col = text[..from].chars().count();
        let end_col = start_col + text[from..to].chars().count();
        segments.push(LineSegment {
            line,
            start_col,
            end_col,
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(text: &str, target: &str) -> LinkSpan {
        LinkSpan {
            text: text.to_string(),
            target: target.to_string(),
            start: 0,
            end: text.len(),
        }
    }

    // -- wrap_text ------------------------------------------------------

    #[test]
    fn wrap_packs_words_greedily() {
        let w = wrap_text("hello world foo bar", 11, 4000);
        assert_eq!(w.lines, vec!["hello world", "foo bar"]);
        assert!(!w.truncated);
    }

    #[test]
    fn wrap_exact_fit_stays_on_line() {
        let w = wrap_text("abcd efghi", 10, 4000);
        assert_eq!(w.lines, vec!["abcd efghi"]);
    }

    #[test]
    fn wrap_preserves_hard_breaks() {
        let w = wrap_text("one\ntwo three\nfour", 80, 4000);
        assert_eq!(w.lines, vec!["one", "two three", "four"]);
    }

    #[test]
    fn wrap_keeps_blank_source_lines() {
        let w = wrap_text("a\n\nb", 80, 4000);
        assert_eq!(w.lines, vec!["a", "", "b"]);
    }

    #[test]
    fn wrap_ignores_single_trailing_newline() {
        let w = wrap_text("a\n", 80, 4000);
        assert_eq!(w.lines, vec!["a"]);
    }

    #[test]
    fn wrap_collapses_inner_whitespace() {
        let w = wrap_text("  a   b\tc  ", 80, 4000);
        assert_eq!(w.lines, vec!["a b c"]);
    }

    #[test]
    fn wrap_long_word_gets_own_line() {
        let w = wrap_text("a supercalifragilistic b", 5, 4000);
        assert_eq!(w.lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn wrap_zero_columns_means_one_word_per_line() {
        let w = wrap_text("a b c", 0, 4000);
        assert_eq!(w.lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn wrap_counts_characters_not_bytes() {
        // Each word is 4 characters but 8+ bytes.
        let w = wrap_text("ññññ éééé", 9, 4000);
        assert_eq!(w.lines, vec!["ññññ éééé"]);
    }

    #[test]
    fn wrap_empty_input() {
        let w = wrap_text("", 10, 4000);
        assert!(w.lines.is_empty());
        assert!(!w.truncated);
    }

    #[test]
    fn budget_truncates_without_marker() {
        // Words cost len + 1: "aaa"=4, "bbb"=8, "ccc" would need 11 > 10.
        let w = wrap_text("aaa bbb ccc ddd", 80, 10);
        assert_eq!(w.lines, vec!["aaa bbb"]);
        assert!(w.truncated);
    }

    #[test]
    fn budget_exhausted_at_line_end_drops_later_lines() {
        let w = wrap_text("aaa\nbbb\nccc", 80, 4);
        assert_eq!(w.lines, vec!["aaa"]);
        assert!(w.truncated);
    }

    #[test]
    fn budget_exhausted_exactly_with_nothing_left() {
        let w = wrap_text("aaa\n\n", 80, 4);
        assert_eq!(w.lines, vec!["aaa"]);
        assert!(!w.truncated);
    }

    // -- place_links ----------------------------------------------------

    #[test]
    fn place_single_line_link() {
        let lines = vec!["click here".to_string(), "now".to_string()];
        let p = place_links(&lines, &[link("here", "/h")]);
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].target, "/h");
        assert_eq!(
            p[0].segments,
            vec![LineSegment {
                line: 0,
                start_col: 6,
                end_col: 10
            }]
        );
    }

    #[test]
    fn place_link_on_later_line() {
        let lines = vec!["first".to_string(), "then the link".to_string()];
        let p = place_links(&lines, &[link("link", "/l")]);
        assert_eq!(
            p[0].segments,
            vec![LineSegment {
                line: 1,
                start_col: 9,
                end_col: 13
            }]
        );
    }

    #[test]
    fn link_split_by_wrapping_is_omitted() {
        let lines = vec!["see the".to_string(), "docs page".to_string()];
        let p = place_links(&lines, &[link("the docs", "/d")]);
        assert!(p.is_empty());
    }

    #[test]
    fn link_with_hard_newline_spans_lines() {
        let lines = vec!["go to".to_string(), "the end".to_string()];
        let p = place_links(&lines, &[link("to\nthe", "/t")]);
        assert_eq!(
            p[0].segments,
            vec![
                LineSegment {
                    line: 0,
                    start_col: 3,
                    end_col: 5
                },
                LineSegment {
                    line: 1,
                    start_col: 0,
                    end_col: 3
                },
            ]
        );
    }

    #[test]
    fn duplicate_text_places_both_at_first_occurrence() {
        let lines = vec!["Home and Home".to_string()];
        let p = place_links(&lines, &[link("Home", "/a"), link("Home", "/b")]);
        assert_eq!(p.len(), 2);
        assert_eq!(p[0].segments, p[1].segments);
        assert_eq!(p[1].link_index, 1);
    }

    #[test]
    fn columns_count_characters() {
        let lines = vec!["café menü".to_string()];
        let p = place_links(&lines, &[link("menü", "/m")]);
        assert_eq!(
            p[0].segments,
            vec![LineSegment {
                line: 0,
                start_col: 5,
                end_col: 9
            }]
        );
    }

    #[test]
    fn empty_link_text_is_omitted() {
        let lines = vec!["abc".to_string()];
        assert!(place_links(&lines, &[link("", "/e")]).is_empty());
    }
}
