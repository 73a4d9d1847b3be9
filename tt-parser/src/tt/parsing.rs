//! Tag tree parser
//!
//!     Turns the lines of one tagged text file into a [NodeArray](crate::tt::ast::NodeArray).
//!
//! Structure
//!
//!     Parsing runs in three layers:
//!     1. Line classification (./parsing/line_classification.rs): every trimmed line is one of
//!        blank, empty value hashtag, hierarchical hashtag, comment, comment delimiter or text.
//!     2. The tag tree parser (./parsing/parser.rs): walks the classified lines, collects the
//!        multi-line text runs that belong to each tag and keeps the ancestor stack that
//!        links nested hashtags to their parents.
//!     3. Inline tags (./parsing/inlines.rs): every collected run is scanned for
//!        `/*name*/ body */` and `#name#` and split into child nodes when it contains any.
//!
//! Line Priority
//!
//!     Each line is matched against the alternatives in a fixed order and the first match
//!     wins: empty value hashtag, hierarchical hashtag, comment, plain text.
//!
//! Levels
//!
//!     The number of `#` in a hashtag is its depth. A tag may go at most one level deeper
//!     than the previous tag, otherwise parsing fails with
//!     [ParseError::SkippedDeeperTagLevel](crate::tt::error::ParseError).

pub mod inlines;
pub mod line_classification;
pub mod parser;

pub use line_classification::{classify_line, LineType};
pub use parser::parse_lines;
