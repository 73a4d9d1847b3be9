//! Property-based tests for the tag tree parser and the persisted format

use proptest::prelude::*;
use tt_parser::tt::formats::{from_persisted_str, to_persisted_string};
use tt_parser::tt::{parse_lines, Node, NodeArray, ParseError};

/// Hashtag lines whose levels never skip a depth.
fn valid_document_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        (
            any::<u8>(),
            "[a-z][a-z0-9-]{0,5}",
            "[a-z ]{0,12}(/\\*em\\*/[a-z]{0,5}\\*/)?[a-z ]{0,8}",
        ),
        1..12,
    )
    .prop_map(|entries| {
        let mut previous = 0usize;
        entries
            .into_iter()
            .map(|(choice, name, text)| {
                let level = 1 + (choice as usize) % (previous + 1);
                previous = level;
                format!("{}{} {}", "#".repeat(level), name, text)
                    .trim_end()
                    .to_string()
            })
            .collect()
    })
}

fn level_of(line: &str) -> usize {
    line.chars().take_while(|c| *c == '#').count()
}

fn arbitrary_source_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[#a-z /*\\\\|]{0,24}", 0..16)
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-z\\\\\"n /*#|]{0,16}"
}

fn node_array_strategy() -> impl Strategy<Value = NodeArray> {
    prop::collection::vec(
        prop_oneof![
            (text_strategy(), "[a-z-]{0,4}").prop_map(|(text, tag)| Node::text(text, tag)),
            (prop::collection::vec(0usize..32, 0..4), "[a-z-]{0,4}")
                .prop_map(|(children, tag)| Node::children(children, tag)),
        ],
        0..16,
    )
    .prop_map(NodeArray::from_nodes)
}

proptest! {
    #[test]
    fn test_parsing_is_deterministic(lines in arbitrary_source_strategy()) {
        let first = parse_lines(&lines, "prop.tt");
        let second = parse_lines(&lines, "prop.tt");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_gradual_documents_parse(lines in valid_document_strategy()) {
        let result = parse_lines(&lines, "prop.tt");
        prop_assert!(result.is_ok(), "Failed to parse: {:?}", lines);
    }

    #[test]
    fn test_children_point_forward_and_in_range(lines in valid_document_strategy()) {
        let array = parse_lines(&lines, "prop.tt").unwrap();
        for (index, node) in array.iter().enumerate() {
            for &child in node.child_ids() {
                prop_assert!(child > index && child < array.len(),
                    "node {} has child {} in an array of {}", index, child, array.len());
            }
        }
    }

    #[test]
    fn test_depth_jump_is_reported(lines in valid_document_strategy(), jump in 2usize..5) {
        let previous = lines.last().map(|line| level_of(line)).unwrap_or(0);
        let mut source = lines.clone();
        source.push(format!("{}deep", "#".repeat(previous + jump)));

        let err = parse_lines(&source, "prop.tt").unwrap_err();
        prop_assert_eq!(err, ParseError::SkippedDeeperTagLevel {
            file: "prop.tt".to_string(),
            line: source.len(),
            current: previous + jump,
            previous,
        });
    }

    #[test]
    fn test_parsed_arrays_round_trip(lines in valid_document_strategy()) {
        let array = parse_lines(&lines, "prop.tt").unwrap();
        let persisted = to_persisted_string(&array).unwrap();
        prop_assert_eq!(from_persisted_str(&persisted).unwrap(), array);
    }

    #[test]
    fn test_any_array_round_trips(array in node_array_strategy()) {
        let persisted = to_persisted_string(&array).unwrap();
        prop_assert_eq!(from_persisted_str(&persisted).unwrap(), array);
    }
}
