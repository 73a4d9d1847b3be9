//! Parse errors
//!
//!     Only one condition is a hard syntax error: a hashtag that jumps more than one level
//!     deeper than the tag before it. Everything else resolves structurally.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(
        "{file}:{line}: skipped a deeper tag level (current depth {current}, previous depth {previous})"
    )]
    SkippedDeeperTagLevel {
        file: String,
        /// 1-based line number of the offending hashtag.
        line: usize,
        current: usize,
        previous: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_both_depths() {
        let err = ParseError::SkippedDeeperTagLevel {
            file: "doc.tt".to_string(),
            line: 3,
            current: 4,
            previous: 1,
        };
        let message = err.to_string();
        assert!(message.starts_with("doc.tt:3:"));
        assert!(message.contains("current depth 4, previous depth 1"));
    }
}
