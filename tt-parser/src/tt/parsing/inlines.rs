//! Inline tags
//!
//!     A text run may contain inline tags, `/*name*/ body */`, and empty value hashtags,
//!     `#name#`. Inline tags nest: a close marker always belongs to the innermost open tag
//!     still waiting for one, which is found by balance counting while scanning forward.
//!
//!     Splitting produces ordered chunks. A run with at least two chunks, or with an inline
//!     tag, becomes a container node whose children are the chunks; otherwise the run is
//!     stored as a single text node. A run that is nothing but `#name#` stays literal text.
//!
//!     An opener with no matching close marker is left in the text as is. Close markers
//!     cannot be escaped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tt::escaping::is_escaped;

static OPEN_INLINE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\*([A-Za-z0-9-]+)\*/").expect("open inline pattern is valid"));

static CLOSE_INLINE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*/").expect("close inline pattern is valid"));

static INLINE_EMPTY_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([A-Za-z0-9-]+)#").expect("inline empty value pattern is valid"));

/// One piece of a split text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    Text(&'a str),
    /// `#name#` inside a run.
    EmptyTag(&'a str),
    /// `/*name*/ body */`, body not yet evaluated.
    Inline { name: &'a str, body: &'a str },
}

impl Chunk<'_> {
    fn is_inline(&self) -> bool {
        matches!(self, Chunk::Inline { .. })
    }
}

/// Whether a run must become a container node.
pub fn needs_split(chunks: &[Chunk<'_>]) -> bool {
    chunks.len() >= 2 || chunks.iter().any(Chunk::is_inline)
}

struct OpenMarker<'a> {
    start: usize,
    end: usize,
    name: &'a str,
    escaped: bool,
}

fn next_open_marker(line: &str, from: usize) -> Option<OpenMarker<'_>> {
    let captures = OPEN_INLINE_TAG.captures_at(line, from)?;
    let whole = captures.get(0)?;
    let name = captures.get(1)?;
    Some(OpenMarker {
        start: whole.start(),
        end: whole.end(),
        name: name.as_str(),
        escaped: is_escaped(line, whole.start()),
    })
}

fn next_unescaped_open_marker(line: &str, mut from: usize) -> Option<OpenMarker<'_>> {
    while let Some(marker) = next_open_marker(line, from) {
        if !marker.escaped {
            return Some(marker);
        }
        from = marker.end;
    }
    None
}

/// Find the close marker matching an open marker that ends at `from`.
///
/// Returns the `(start, end)` byte range of the close marker.
fn matching_close_marker(line: &str, from: usize) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut position = from;
    loop {
        let close = CLOSE_INLINE_TAG.find_at(line, position)?;
        match next_open_marker(line, position) {
            // every opener ends with "*/", so an opener seen first is skipped whole
            Some(open) if open.start < close.start() => {
                if !open.escaped {
                    depth += 1;
                }
                position = open.end;
            }
            _ => {
                if depth == 0 {
                    return Some((close.start(), close.end()));
                }
                depth -= 1;
                position = close.end();
            }
        }
    }
}

/// Split plain text around unescaped `#name#` markers.
fn split_empty_tags<'a>(text: &'a str, chunks: &mut Vec<Chunk<'a>>) {
    let mut text_start = 0;
    let mut search_from = 0;
    while let Some(captures) = INLINE_EMPTY_VALUE.captures_at(text, search_from) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            break;
        };
        if is_escaped(text, whole.start()) {
            search_from = whole.start() + 1;
            continue;
        }
        if whole.start() > text_start {
            chunks.push(Chunk::Text(&text[text_start..whole.start()]));
        }
        chunks.push(Chunk::EmptyTag(name.as_str()));
        text_start = whole.end();
        search_from = whole.end();
    }
    if text_start < text.len() {
        chunks.push(Chunk::Text(&text[text_start..]));
    }
}

/// Split a text run into chunks.
pub fn split_into_chunks(line: &str) -> Vec<Chunk<'_>> {
    let mut chunks = Vec::new();
    let mut text_start = 0;
    let mut position = 0;

    while let Some(open) = next_unescaped_open_marker(line, position) {
        let Some((close_start, close_end)) = matching_close_marker(line, open.end) else {
            // unclosed: the rest of the line stays literal
            break;
        };
        split_empty_tags(&line[text_start..open.start], &mut chunks);
        chunks.push(Chunk::Inline {
            name: open.name,
            body: &line[open.end..close_start],
        });
        text_start = close_end;
        position = close_end;
    }
    split_empty_tags(&line[text_start..], &mut chunks);
    chunks
}
