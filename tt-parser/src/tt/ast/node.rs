//! Node and node value definitions

use serde::{Deserialize, Serialize};

/// Position of a node inside its [`NodeArray`](super::NodeArray).
pub type NodeIndex = usize;

/// Tag given to the leaf node that stores the `|idname` of a hashtag.
pub const ID_NAME_TAG: &str = "_id_name";

/// The value of a node: either leaf text or the ordered indices of its children.
///
/// Leaf text is stored with escapes already resolved, except for line breaks inside
/// multi-line runs, which are kept as the two-character `\n` sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeValue {
    Text(String),
    Children(Vec<NodeIndex>),
}

/// A tagged node. Untagged text fragments carry an empty tag.
///
/// Persisted as the two-element array `[value, tag]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(NodeValue, String)", into = "(NodeValue, String)")]
pub struct Node {
    pub value: NodeValue,
    pub tag: String,
}

impl Node {
    pub fn text(value: impl Into<String>, tag: impl Into<String>) -> Self {
        Node {
            value: NodeValue::Text(value.into()),
            tag: tag.into(),
        }
    }

    pub fn children(children: Vec<NodeIndex>, tag: impl Into<String>) -> Self {
        Node {
            value: NodeValue::Children(children),
            tag: tag.into(),
        }
    }

    pub fn is_tagged(&self) -> bool {
        !self.tag.is_empty()
    }

    /// The leaf text, if this node is a leaf.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            NodeValue::Text(text) => Some(text),
            NodeValue::Children(_) => None,
        }
    }

    /// The child indices, empty for leaves.
    pub fn child_ids(&self) -> &[NodeIndex] {
        match &self.value {
            NodeValue::Text(_) => &[],
            NodeValue::Children(children) => children,
        }
    }
}

impl From<(NodeValue, String)> for Node {
    fn from((value, tag): (NodeValue, String)) -> Self {
        Node { value, tag }
    }
}

impl From<Node> for (NodeValue, String) {
    fn from(node: Node) -> Self {
        (node.value, node.tag)
    }
}
