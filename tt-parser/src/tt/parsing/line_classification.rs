//! Line Classification
//!
//! Determines the type of a single trimmed source line. The parser only ever looks at one
//! line type at a time, so all the regular expressions of the grammar live here.

use once_cell::sync::Lazy;
use regex::Regex;

/// `#name`, `##name`, `## name`: the prefix holds the depth.
static HASHTAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#|#{2,} ?)([A-Za-z0-9-]+)").expect("hashtag pattern is valid"));

static EMPTY_VALUE_HASHTAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([A-Za-z0-9-]+)#").expect("empty value pattern is valid"));

static ID_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\|([A-Za-z0-9-]+)").expect("id name pattern is valid"));

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\s").expect("comment pattern is valid"));

static COMMENT_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#+$").expect("comment delimiter pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType<'a> {
    Blank,
    /// `#name#`, with `trailing` set when more text follows on the same line.
    EmptyValueTag { name: &'a str, trailing: bool },
    /// A hierarchical hashtag; `rest` is the trimmed text after the tag name.
    Hashtag {
        level: usize,
        name: &'a str,
        rest: &'a str,
    },
    Comment,
    CommentDelimiter,
    Text,
}

impl LineType<'_> {
    /// Lines that end a multi-line text run.
    pub fn starts_tag(&self) -> bool {
        matches!(
            self,
            LineType::EmptyValueTag { .. } | LineType::Hashtag { .. }
        )
    }
}

/// Classify a line. The line is expected to be trimmed already.
pub fn classify_line(line: &str) -> LineType<'_> {
    if line.is_empty() {
        return LineType::Blank;
    }
    if let Some(captures) = EMPTY_VALUE_HASHTAG.captures(line) {
        if let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) {
            return LineType::EmptyValueTag {
                name: name.as_str(),
                trailing: whole.end() < line.len(),
            };
        }
    }
    if let Some(captures) = HASHTAG.captures(line) {
        if let (Some(whole), Some(prefix), Some(name)) =
            (captures.get(0), captures.get(1), captures.get(2))
        {
            let level = prefix.as_str().chars().filter(|c| *c == '#').count();
            return LineType::Hashtag {
                level,
                name: name.as_str(),
                rest: line[whole.end()..].trim(),
            };
        }
    }
    if COMMENT.is_match(line) {
        return LineType::Comment;
    }
    if COMMENT_DELIMITER.is_match(line) {
        return LineType::CommentDelimiter;
    }
    LineType::Text
}

/// Split a leading `|idname` off the text that follows a hashtag.
///
/// Returns the id name, if any, and the remaining trimmed text. An escaped marker (`\|`)
/// never matches because the pattern is anchored at the first character.
pub fn split_id_name(rest: &str) -> (Option<&str>, &str) {
    match ID_NAME.captures(rest) {
        Some(captures) => match (captures.get(0), captures.get(1)) {
            (Some(whole), Some(name)) => (Some(name.as_str()), rest[whole.end()..].trim()),
            _ => (None, rest),
        },
        None => (None, rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_blank() {
        assert_eq!(classify_line(""), LineType::Blank);
    }

    #[rstest]
    #[case("#title", 1, "title", "")]
    #[case("##sub World", 2, "sub", "World")]
    #[case("## sub World", 2, "sub", "World")]
    #[case("###deep|id text", 3, "deep", "|id text")]
    fn test_hashtags(
        #[case] line: &str,
        #[case] level: usize,
        #[case] name: &str,
        #[case] rest: &str,
    ) {
        assert_eq!(classify_line(line), LineType::Hashtag { level, name, rest });
    }

    #[test]
    fn test_single_hash_requires_name_right_after() {
        // "# note" is a comment, not a tag named "note"
        assert_eq!(classify_line("# note"), LineType::Comment);
    }

    #[rstest]
    #[case("#toc#", "toc", false)]
    #[case("#toc# and more", "toc", true)]
    fn test_empty_value_tags(#[case] line: &str, #[case] name: &str, #[case] trailing: bool) {
        assert_eq!(classify_line(line), LineType::EmptyValueTag { name, trailing });
    }

    #[rstest]
    #[case("#")]
    #[case("###")]
    #[case("##########")]
    fn test_comment_delimiters(#[case] line: &str) {
        assert_eq!(classify_line(line), LineType::CommentDelimiter);
    }

    #[rstest]
    #[case("Hello")]
    #[case(r"\#escaped")]
    #[case("text with #inline# tag")]
    fn test_text(#[case] line: &str) {
        assert_eq!(classify_line(line), LineType::Text);
    }

    #[test]
    fn test_split_id_name() {
        assert_eq!(split_id_name("|intro Welcome"), (Some("intro"), "Welcome"));
        assert_eq!(split_id_name("|intro"), (Some("intro"), ""));
        assert_eq!(split_id_name(r"\|intro"), (None, r"\|intro"));
        assert_eq!(split_id_name("no id"), (None, "no id"));
    }
}
