//! Escape handling
//!
//!     The escape character is `\`. In front of an inline tag opener, an empty value hashtag
//!     or an id name marker it disables the special meaning and disappears from the text. A
//!     `\` at the very start or end of a piece is dropped as well, which lets authors keep
//!     leading or trailing characters that would otherwise be read as syntax.
//!
//!     Line breaks inside multi-line text runs are stored as the two-character sequence
//!     `\n`. [unescape_line_breaks] turns them into real newlines at output time.

use once_cell::sync::Lazy;
use regex::Regex;

/// Separator used to join the lines of a text run.
pub const LINE_BREAK: &str = "\\n";

static ESCAPED_SPECIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(/\*[A-Za-z0-9-]+\*/|#[A-Za-z0-9-]+#|\|[A-Za-z0-9-]+)")
        .expect("escaped special pattern is valid")
});

/// Drop a leading and a trailing `\`, then fold escapes that ended up around joined lines.
pub fn strip_edge_escapes(piece: &str) -> String {
    let piece = piece.strip_prefix('\\').unwrap_or(piece);
    let piece = piece.strip_suffix('\\').unwrap_or(piece);
    piece.replace("\\n\\", LINE_BREAK).replace("\\\\n", LINE_BREAK)
}

/// Remove the `\` in front of inline tag openers, `#name#` and `|idname`.
pub fn strip_special_escapes(piece: &str) -> String {
    ESCAPED_SPECIAL.replace_all(piece, "${1}").into_owned()
}

/// Both passes, in the order the parser applies them to every stored text.
pub fn unescape(piece: &str) -> String {
    strip_special_escapes(&strip_edge_escapes(piece))
}

/// Turn stored `\n` sequences into real newlines.
pub fn unescape_line_breaks(value: &str) -> String {
    value.replace(LINE_BREAK, "\n")
}

/// Whether the match starting at `start` is preceded by the escape character.
pub(crate) fn is_escaped(line: &str, start: usize) -> bool {
    start > 0 && line.as_bytes()[start - 1] == b'\\'
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r"\#title", "#title")]
    #[case(r"text\", "text")]
    #[case(r"first\n\second", r"first\nsecond")]
    #[case(r"first\\nsecond", r"first\nsecond")]
    #[case("plain", "plain")]
    fn test_edge_escapes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_edge_escapes(input), expected);
    }

    #[rstest]
    #[case(r"a \/*b*/ c", "a /*b*/ c")]
    #[case(r"a \#x# c", "a #x# c")]
    #[case(r"a \|id", "a |id")]
    #[case(r"a \ b", r"a \ b")]
    fn test_special_escapes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_special_escapes(input), expected);
    }

    #[test]
    fn test_line_breaks_become_newlines() {
        assert_eq!(unescape_line_breaks(r"one\ntwo"), "one\ntwo");
    }

    #[test]
    fn test_is_escaped() {
        assert!(is_escaped(r"a\/*b*/", 2));
        assert!(!is_escaped("/*b*/", 0));
    }
}
