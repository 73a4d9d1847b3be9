//! The tag tree parser
//!
//!     A single forward pass over trimmed lines. Each non blank line starts one of four
//!     constructs (see [LineType]); the construct consumes as many following lines as it
//!     needs and leaves the cursor on its last line.
//!
//!     Hashtags keep an ancestor stack: `stack[d - 1]` is the index of the open tag at depth
//!     `d`. A new tag at depth `d` is appended to the child list of `stack[d - 2]`. Every
//!     other construct closes the whole hierarchy.
//!
//!     Child slots are reserved before they are filled: a hashtag at index `T` is pushed as
//!     `Children([T + 1])` and its text is evaluated right after, landing at `T + 1`. When
//!     the text turns out empty the reserved slot is dropped again.

use log::debug;

use super::inlines::{needs_split, split_into_chunks, Chunk};
use super::line_classification::{classify_line, split_id_name, LineType};
use crate::tt::ast::{Node, NodeArray, NodeIndex, ID_NAME_TAG};
use crate::tt::error::ParseError;
use crate::tt::escaping::{unescape, LINE_BREAK};

/// Parse the lines of one file.
///
/// `file_name` is only used for error messages.
pub fn parse_lines<S: AsRef<str>>(lines: &[S], file_name: &str) -> Result<NodeArray, ParseError> {
    let lines: Vec<&str> = lines.iter().map(|line| line.as_ref().trim()).collect();
    let mut parser = TagTreeParser::new(&lines, file_name);
    parser.run()?;
    debug!(
        "parsed {} lines of {} into {} nodes",
        lines.len(),
        file_name,
        parser.array.len()
    );
    Ok(parser.array)
}

struct TagTreeParser<'a> {
    lines: &'a [&'a str],
    file_name: &'a str,
    cursor: usize,
    array: NodeArray,
    stack: Vec<NodeIndex>,
    previous_level: usize,
}

impl<'a> TagTreeParser<'a> {
    fn new(lines: &'a [&'a str], file_name: &'a str) -> Self {
        TagTreeParser {
            lines,
            file_name,
            cursor: 0,
            array: NodeArray::new(),
            stack: Vec::new(),
            previous_level: 0,
        }
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while self.cursor < self.lines.len() {
            let line = self.lines[self.cursor];
            match classify_line(line) {
                LineType::Blank => {}
                LineType::EmptyValueTag { name, trailing } => {
                    if trailing {
                        let text = self.collect_run(line);
                        self.evaluate_inline(&text, "");
                    } else {
                        self.array.push(Node::text("", name));
                    }
                    self.reset_hierarchy();
                }
                LineType::Hashtag { level, name, rest } => self.hashtag(level, name, rest)?,
                LineType::Comment => {}
                LineType::CommentDelimiter => self.skip_comment_block(),
                LineType::Text => {
                    let text = self.collect_run(line);
                    let paragraph = self.array.len();
                    self.array.push(Node::children(vec![paragraph + 1], ""));
                    self.evaluate_inline(&text, "");
                    self.reset_hierarchy();
                }
            }
            self.cursor += 1;
        }
        Ok(())
    }

    fn reset_hierarchy(&mut self) {
        self.stack.clear();
        self.previous_level = 0;
    }

    fn hashtag(&mut self, level: usize, name: &str, rest: &str) -> Result<(), ParseError> {
        if level > self.previous_level + 1 {
            return Err(ParseError::SkippedDeeperTagLevel {
                file: self.file_name.to_string(),
                line: self.cursor + 1,
                current: level,
                previous: self.previous_level,
            });
        }
        if level < self.previous_level {
            self.stack.truncate(level - 1);
        } else if level == self.previous_level {
            self.stack.pop();
        }

        let (id_name, rest) = split_id_name(rest);
        let text = self.collect_run(rest);

        let tag_index = self.array.len();
        self.stack.push(tag_index);
        self.array.push(Node::children(vec![tag_index + 1], name));

        if text.is_empty() {
            self.array.pop_first_child(tag_index);
        } else {
            self.evaluate_inline(&text, "");
        }

        if level > 1 {
            if let Some(&parent) = self.stack.get(level - 2) {
                self.array.append_child(parent, tag_index);
            }
        }

        if let Some(id_name) = id_name {
            let id_index = self.push_text(id_name, ID_NAME_TAG);
            self.array.append_child(tag_index, id_index);
        }

        self.previous_level = level;
        Ok(())
    }

    /// Skip everything up to and including the next comment delimiter line.
    fn skip_comment_block(&mut self) {
        let mut next = self.cursor + 1;
        while next < self.lines.len() {
            if classify_line(self.lines[next]) == LineType::CommentDelimiter {
                break;
            }
            next += 1;
        }
        self.cursor = next.min(self.lines.len());
    }

    /// Collect the text run that starts with `first` on the current line.
    ///
    /// Following lines are taken until the next tag line. Blank lines and comments are
    /// dropped, and the kept lines are joined with the escaped line break. The cursor is
    /// left on the last consumed line.
    fn collect_run(&mut self, first: &str) -> String {
        let mut pieces: Vec<&str> = Vec::new();
        if !first.is_empty() {
            pieces.push(first);
        }

        let mut next = self.cursor + 1;
        while next < self.lines.len() {
            let line = self.lines[next];
            let line_type = classify_line(line);
            if line_type.starts_tag() {
                break;
            }
            match line_type {
                LineType::Text => pieces.push(line),
                LineType::CommentDelimiter => {
                    next += 1;
                    while next < self.lines.len()
                        && classify_line(self.lines[next]) != LineType::CommentDelimiter
                    {
                        next += 1;
                    }
                }
                _ => {}
            }
            next += 1;
        }

        self.cursor = next.min(self.lines.len()).saturating_sub(1).max(self.cursor);
        pieces.join(LINE_BREAK)
    }

    fn push_text(&mut self, text: &str, tag: &str) -> NodeIndex {
        self.array.push(Node::text(unescape(text), tag))
    }

    /// Store a text run at the next index, split on inline tags when it contains any.
    fn evaluate_inline(&mut self, text: &str, tag: &str) -> NodeIndex {
        let chunks = split_into_chunks(text);
        if !needs_split(&chunks) {
            return self.push_text(text, tag);
        }

        let container = self.array.reserve(tag);
        let mut children = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let child = match chunk {
                Chunk::Text(text) => self.push_text(text, ""),
                Chunk::EmptyTag(name) => self.array.push(Node::text("", name)),
                Chunk::Inline { name, body } => self.evaluate_inline(body, name),
            };
            children.push(child);
        }
        self.array.set_children(container, children);
        container
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tt::ast::NodeValue;

    fn parse(lines: &[&str]) -> NodeArray {
        parse_lines(lines, "test.tt").unwrap()
    }

    #[test]
    fn test_nested_hashtags() {
        let array = parse(&["#title", "Hello", "##sub", "World"]);
        assert_eq!(
            array.nodes(),
            &[
                Node::children(vec![1, 2], "title"),
                Node::text("Hello", ""),
                Node::children(vec![3], "sub"),
                Node::text("World", ""),
            ]
        );
    }

    #[test]
    fn test_skipped_level_reports_line_and_depths() {
        let err = parse_lines(&["#title", "Hello", "####sub", "World"], "doc.tt").unwrap_err();
        assert_eq!(
            err,
            ParseError::SkippedDeeperTagLevel {
                file: "doc.tt".to_string(),
                line: 3,
                current: 4,
                previous: 1,
            }
        );
        assert!(err.to_string().contains("current depth 4, previous depth 1"));
    }

    #[test]
    fn test_first_tag_cannot_start_deep() {
        let err = parse_lines(&["##sub"], "doc.tt").unwrap_err();
        assert!(matches!(
            err,
            ParseError::SkippedDeeperTagLevel {
                line: 1,
                current: 2,
                previous: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_tag_without_text_drops_reserved_slot() {
        let array = parse(&["#empty", "#next text"]);
        assert_eq!(array[0], Node::children(vec![], "empty"));
        assert_eq!(array[1], Node::children(vec![2], "next"));
    }

    #[test]
    fn test_multi_line_run_uses_escaped_line_breaks() {
        let array = parse(&["#para first", "second", "", "third"]);
        assert_eq!(array[1], Node::text(r"first\nsecond\nthird", ""));
    }

    #[test]
    fn test_comments_are_skipped_inside_runs() {
        let array = parse(&["#para one", "# a comment", "###", "hidden", "###", "two"]);
        assert_eq!(array.len(), 2);
        assert_eq!(array[1], Node::text(r"one\ntwo", ""));
    }

    #[test]
    fn test_top_level_comment_block() {
        let array = parse(&["###", "#not-a-tag", "###", "Visible"]);
        assert_eq!(
            array.nodes(),
            &[Node::children(vec![1], ""), Node::text("Visible", "")]
        );
    }

    #[test]
    fn test_id_name_is_appended_after_text() {
        let array = parse(&["#chapter|intro Welcome"]);
        assert_eq!(
            array.nodes(),
            &[
                Node::children(vec![1, 2], "chapter"),
                Node::text("Welcome", ""),
                Node::text("intro", ID_NAME_TAG),
            ]
        );
    }

    #[test]
    fn test_escaped_id_name_is_text() {
        let array = parse(&[r"#chapter \|intro"]);
        assert_eq!(array[1], Node::text("|intro", ""));
    }

    #[test]
    fn test_empty_value_line() {
        let array = parse(&["#toc#", "Body"]);
        assert_eq!(array[0], Node::text("", "toc"));
        assert_eq!(array[1], Node::children(vec![2], ""));
    }

    #[test]
    fn test_empty_value_line_with_trailing_text() {
        let array = parse(&["#mark# then text"]);
        assert_eq!(
            array.nodes(),
            &[
                Node::children(vec![1, 2], ""),
                Node::text("", "mark"),
                Node::text(" then text", ""),
            ]
        );
    }

    #[test]
    fn test_inline_tags_nest_under_hashtag() {
        let array = parse(&["#para Hello /*b*/big /*i*/news*/*/!"]);
        assert_eq!(
            array.nodes(),
            &[
                Node::children(vec![1], "para"),
                Node::children(vec![2, 3, 6], ""),
                Node::text("Hello ", ""),
                Node::children(vec![4, 5], "b"),
                Node::text("big ", ""),
                Node::text("news", "i"),
                Node::text("!", ""),
            ]
        );
        assert_eq!(array.depth_level(5), 4);
    }

    #[test]
    fn test_same_level_siblings_share_parent() {
        let array = parse(&["#list", "##item one", "##item two", "#after"]);
        assert_eq!(array[0], Node::children(vec![1, 3], "list"));
        assert_eq!(array.roots(), vec![0, 5]);
    }

    #[test]
    fn test_shallower_tag_truncates_stack() {
        let array = parse(&["#a", "##b", "###c", "##d"]);
        assert_eq!(array[0].child_ids(), &[1, 3]);
        assert_eq!(array[1].child_ids(), &[2]);
    }

    #[test]
    fn test_plain_text_resets_hierarchy() {
        let err = parse_lines(&["#a", "##b", "#c#", "##d"], "doc.tt").unwrap_err();
        assert!(matches!(
            err,
            ParseError::SkippedDeeperTagLevel {
                line: 4,
                previous: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_escapes_removed_from_text() {
        let array = parse(&[r"\#not a tag \/*b*/ either"]);
        assert_eq!(array[1].value, NodeValue::Text("#not a tag /*b*/ either".to_string()));
    }

    #[test]
    fn test_space_between_hashes_and_name() {
        let array = parse(&["#a", "## b text"]);
        assert_eq!(array[2], Node::children(vec![3], "b"));
        assert_eq!(array[3], Node::text("text", ""));
    }
}
