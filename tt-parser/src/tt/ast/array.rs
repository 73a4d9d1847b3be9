//! The flattened, index addressed tree
//!
//!     A NodeArray is the arena for one source file. Nodes reference their children by
//!     index only, which keeps the structure trivially serializable and lets the parser
//!     reserve a child slot before the child exists.
//!
//!     Parents always precede their children, and the last child of a node is always the
//!     highest index of its subtree. Every query below relies on those two facts.
//!
//!     Depth levels are not stored: they are recomputed by walking up the parent chain,
//!     so they stay correct while the array is still being built.

use super::node::{Node, NodeIndex, NodeValue};
use serde::{Deserialize, Serialize};
use std::ops::Index;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeArray {
    nodes: Vec<Node>,
}

impl NodeArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        NodeArray { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Append a node and return its index.
    pub fn push(&mut self, node: Node) -> NodeIndex {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Reserve a container slot whose children are filled in later.
    pub(crate) fn reserve(&mut self, tag: &str) -> NodeIndex {
        self.push(Node::children(Vec::new(), tag))
    }

    pub(crate) fn set_children(&mut self, index: NodeIndex, children: Vec<NodeIndex>) {
        self.nodes[index].value = NodeValue::Children(children);
    }

    /// Append `child` to the children of `parent`, never twice.
    pub(crate) fn append_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        if let NodeValue::Children(children) = &mut self.nodes[parent].value {
            if !children.contains(&child) {
                children.push(child);
            }
        }
    }

    /// Drop the first child reference of a node (a hashtag whose text came out empty).
    pub(crate) fn pop_first_child(&mut self, index: NodeIndex) {
        if let NodeValue::Children(children) = &mut self.nodes[index].value {
            if !children.is_empty() {
                children.remove(0);
            }
        }
    }

    /// Child indices of a node, empty for leaves and out of range indices.
    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self.get(index).map(Node::child_ids).unwrap_or(&[])
    }

    /// The node whose child list references `index`.
    pub fn parent_of(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.nodes
            .iter()
            .take(index)
            .position(|node| node.child_ids().contains(&index))
    }

    /// Number of ancestors plus one: root siblings are level 1.
    pub fn depth_level(&self, index: NodeIndex) -> usize {
        let mut level = 1;
        let mut current = index;
        while let Some(parent) = self.parent_of(current) {
            level += 1;
            current = parent;
        }
        level
    }

    /// The highest index inside the subtree rooted at `index`.
    pub fn last_descendant(&self, index: NodeIndex) -> NodeIndex {
        let mut current = index;
        while let Some(&last) = self.children(current).last() {
            if last >= self.len() || last <= current {
                break;
            }
            current = last;
        }
        current
    }

    /// Number of array slots covered by the subtree rooted at `index`.
    pub fn subtree_len(&self, index: NodeIndex) -> usize {
        self.last_descendant(index) - index + 1
    }

    /// Indices of the level 1 nodes, in order.
    pub fn roots(&self) -> Vec<NodeIndex> {
        let mut roots = Vec::new();
        let mut index = 0;
        while index < self.len() {
            roots.push(index);
            index = self.last_descendant(index) + 1;
        }
        roots
    }

    /// Concatenation of every leaf text in the subtree, without applying any rule.
    pub fn raw_value(&self, index: NodeIndex) -> String {
        let mut value = String::new();
        self.collect_raw(index, &mut value);
        value
    }

    fn collect_raw(&self, index: NodeIndex, out: &mut String) {
        match self.get(index).map(|node| &node.value) {
            Some(NodeValue::Text(text)) => out.push_str(text),
            Some(NodeValue::Children(children)) => {
                for &child in children.iter().filter(|&&child| child > index) {
                    self.collect_raw(child, out);
                }
            }
            None => {}
        }
    }

    /// Text of the first child when that child is a leaf; a leaf answers its own text.
    ///
    /// A first child that is itself a container yields an empty string.
    pub fn first_value(&self, index: NodeIndex) -> &str {
        match self.get(index).map(|node| &node.value) {
            Some(NodeValue::Text(text)) => text,
            Some(NodeValue::Children(children)) => children
                .first()
                .and_then(|&first| self.get(first))
                .and_then(Node::as_text)
                .unwrap_or(""),
            None => "",
        }
    }

    /// Text of the first leaf reached by always following the first child.
    pub fn first_text(&self, index: NodeIndex) -> &str {
        let mut current = index;
        loop {
            match self.get(current).map(|node| &node.value) {
                Some(NodeValue::Text(text)) => return text,
                Some(NodeValue::Children(children)) => match children.first() {
                    Some(&first) if first > current => current = first,
                    _ => return "",
                },
                None => return "",
            }
        }
    }

    /// The first direct child of `index` carrying `tag`.
    pub fn child_with_tag(&self, index: NodeIndex, tag: &str) -> Option<NodeIndex> {
        self.children(index)
            .iter()
            .copied()
            .find(|&child| self.get(child).is_some_and(|node| node.tag == tag))
    }

    /// First value of the direct child carrying `tag`.
    pub fn subtag_value(&self, index: NodeIndex, tag: &str) -> Option<&str> {
        self.child_with_tag(index, tag)
            .map(|child| self.first_value(child))
    }

    /// The next node after `index` at the same depth level and under the same parent
    /// carrying `tag`.
    pub fn next_sibling_with_tag(&self, index: NodeIndex, tag: &str) -> Option<NodeIndex> {
        self.get(index)?;
        let siblings = match self.parent_of(index) {
            Some(parent) => self.children(parent).to_vec(),
            None => self.roots(),
        };
        siblings
            .into_iter()
            .filter(|&sibling| sibling > index)
            .find(|&sibling| self.get(sibling).is_some_and(|node| node.tag == tag))
    }

    /// The first level 1 node carrying `tag`.
    pub fn root_with_tag(&self, tag: &str) -> Option<NodeIndex> {
        self.roots()
            .into_iter()
            .find(|&root| self.nodes[root].tag == tag)
    }

    /// Concatenate several arrays into one, re-basing every child index.
    pub fn join<'a, I>(arrays: I) -> NodeArray
    where
        I: IntoIterator<Item = &'a NodeArray>,
    {
        let mut joined = NodeArray::new();
        for array in arrays {
            let base = joined.len();
            for node in array.iter() {
                let value = match &node.value {
                    NodeValue::Text(text) => NodeValue::Text(text.clone()),
                    NodeValue::Children(children) => {
                        NodeValue::Children(children.iter().map(|child| child + base).collect())
                    }
                };
                joined.push(Node {
                    value,
                    tag: node.tag.clone(),
                });
            }
        }
        joined
    }
}

impl Index<NodeIndex> for NodeArray {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }
}

impl<'a> IntoIterator for &'a NodeArray {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// #title Hello / ##sub World / #next
    fn sample() -> NodeArray {
        NodeArray::from_nodes(vec![
            Node::children(vec![1, 2], "title"),
            Node::text("Hello", ""),
            Node::children(vec![3], "sub"),
            Node::text("World", ""),
            Node::children(vec![], "next"),
        ])
    }

    #[test]
    fn test_depth_levels() {
        let array = sample();
        assert_eq!(array.depth_level(0), 1);
        assert_eq!(array.depth_level(1), 2);
        assert_eq!(array.depth_level(2), 2);
        assert_eq!(array.depth_level(3), 3);
        assert_eq!(array.depth_level(4), 1);
    }

    #[test]
    fn test_depth_tolerates_forward_slots() {
        let array = NodeArray::from_nodes(vec![Node::children(vec![1], "title")]);
        assert_eq!(array.depth_level(0), 1);
        assert_eq!(array.parent_of(1), Some(0));
    }

    #[test]
    fn test_roots_and_subtrees() {
        let array = sample();
        assert_eq!(array.roots(), vec![0, 4]);
        assert_eq!(array.last_descendant(0), 3);
        assert_eq!(array.subtree_len(0), 4);
        assert_eq!(array.subtree_len(4), 1);
    }

    #[test]
    fn test_values() {
        let array = sample();
        assert_eq!(array.raw_value(0), "HelloWorld");
        assert_eq!(array.first_value(0), "Hello");
        assert_eq!(array.first_value(4), "");
        assert_eq!(array.subtag_value(0, "sub"), Some(""));
        assert_eq!(array.first_text(2), "World");
        assert_eq!(array.child_with_tag(0, "sub"), Some(2));
        assert_eq!(array.child_with_tag(0, "missing"), None);
    }

    #[test]
    fn test_next_sibling_stays_on_level() {
        let array = NodeArray::from_nodes(vec![
            Node::children(vec![1, 2], "a"),
            Node::text("x", ""),
            Node::children(vec![3], "b"),
            Node::text("deep", ""),
            Node::children(vec![5], "b"),
            Node::text("top", ""),
        ]);
        // index 2 is a level 2 "b", index 4 is a level 1 "b"
        assert_eq!(array.next_sibling_with_tag(0, "b"), Some(4));
        assert_eq!(array.next_sibling_with_tag(1, "b"), Some(2));
        assert_eq!(array.next_sibling_with_tag(2, "b"), None);
    }

    #[test]
    fn test_next_sibling_skips_nested_matches() {
        let array = NodeArray::from_nodes(vec![
            Node::children(vec![1, 3], "a"),
            Node::children(vec![2], "c"),
            Node::children(vec![], "b"),
            Node::children(vec![], "b"),
            Node::children(vec![], "b"),
        ]);
        // index 2 is nested under "c", index 3 is the sibling of "c", index 4 is a root
        assert_eq!(array.next_sibling_with_tag(1, "b"), Some(3));
        assert_eq!(array.next_sibling_with_tag(3, "b"), None);
        assert_eq!(array.next_sibling_with_tag(0, "b"), Some(4));
        assert_eq!(array.next_sibling_with_tag(9, "b"), None);
    }

    #[test]
    fn test_join_rebases_indices() {
        let first = sample();
        let second = NodeArray::from_nodes(vec![
            Node::children(vec![1], "para"),
            Node::text("Again", ""),
        ]);
        let joined = NodeArray::join([&first, &second]);
        assert_eq!(joined.len(), 7);
        assert_eq!(joined[5].child_ids(), &[6]);
        assert_eq!(joined.roots(), vec![0, 4, 5]);
    }
}
