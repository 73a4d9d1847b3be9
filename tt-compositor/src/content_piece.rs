//! A content node bound to its rules
//!
//!     A content piece is built fresh for every tagged node the compositor visits. It holds
//!     the two independent lookups for the node's tag: the ordinary rule and the tag-list
//!     rule. Either, both or none may be found.

use tt_parser::tt::{NodeArray, NodeIndex};

use crate::registry::{Registry, RuleRef};

#[derive(Debug, Clone, Copy)]
pub struct ContentPiece<'r> {
    pub index: NodeIndex,
    pub tag_rule: Option<RuleRef<'r>>,
    pub list_rule: Option<RuleRef<'r>>,
}

impl<'r> ContentPiece<'r> {
    pub fn new(
        registry: &'r Registry,
        active: &[String],
        data: &NodeArray,
        index: NodeIndex,
    ) -> Self {
        let tag = data.get(index).map(|node| node.tag.as_str()).unwrap_or("");
        if tag.is_empty() {
            return ContentPiece {
                index,
                tag_rule: None,
                list_rule: None,
            };
        }
        let (tag_rule, list_rule) = registry.resolve(active, tag, true);
        ContentPiece {
            index,
            tag_rule,
            list_rule,
        }
    }
}
