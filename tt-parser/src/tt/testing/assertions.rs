//! Fluent assertions over nodes

use crate::tt::ast::{NodeArray, NodeIndex, ID_NAME_TAG};

/// Text matching strategies for assertions
#[derive(Debug, Clone)]
pub enum TextMatch {
    Exact(String),
    Contains(String),
}

impl TextMatch {
    pub fn assert(&self, actual: &str, context: &str) {
        match self {
            TextMatch::Exact(expected) => assert_eq!(
                actual, expected,
                "{}: Expected text to be '{}', but got '{}'",
                context, expected, actual
            ),
            TextMatch::Contains(substring) => assert!(
                actual.contains(substring.as_str()),
                "{}: Expected text to contain '{}', but got '{}'",
                context,
                substring,
                actual
            ),
        }
    }
}

pub struct NodeArrayAssertion<'a> {
    pub(crate) array: &'a NodeArray,
}

impl<'a> NodeArrayAssertion<'a> {
    pub fn len(self, expected: usize) -> Self {
        assert_eq!(
            self.array.len(),
            expected,
            "Expected {} nodes, found {}",
            expected,
            self.array.len()
        );
        self
    }

    pub fn root_count(self, expected: usize) -> Self {
        let actual = self.array.roots().len();
        assert_eq!(
            actual, expected,
            "Expected {} root nodes, found {}",
            expected, actual
        );
        self
    }

    /// Navigate to the n-th level 1 node.
    pub fn root(self, n: usize) -> NodeAssertion<'a> {
        let roots = self.array.roots();
        let index = *roots
            .get(n)
            .unwrap_or_else(|| panic!("Expected a root #{}, found {} roots", n, roots.len()));
        NodeAssertion {
            array: self.array,
            index,
            context: format!("root[{}]", n),
        }
    }

    /// Navigate to a node by array index.
    pub fn node(self, index: NodeIndex) -> NodeAssertion<'a> {
        assert!(
            index < self.array.len(),
            "Expected node {} to exist, array has {} nodes",
            index,
            self.array.len()
        );
        NodeAssertion {
            array: self.array,
            index,
            context: format!("node[{}]", index),
        }
    }
}

pub struct NodeAssertion<'a> {
    pub(crate) array: &'a NodeArray,
    pub(crate) index: NodeIndex,
    pub(crate) context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn tag(self, expected: &str) -> Self {
        let actual = &self.array[self.index].tag;
        assert_eq!(
            actual, expected,
            "{}: Expected tag '{}', found '{}'",
            self.context, expected, actual
        );
        self
    }

    pub fn untagged(self) -> Self {
        self.tag("")
    }

    /// The node is a leaf holding exactly `expected`.
    pub fn text(self, expected: &str) -> Self {
        match self.array[self.index].as_text() {
            Some(actual) => TextMatch::Exact(expected.to_string()).assert(actual, &self.context),
            None => panic!("{}: Expected a text node, found a container", self.context),
        }
        self
    }

    pub fn raw_value(self, expected: &str) -> Self {
        TextMatch::Exact(expected.to_string()).assert(&self.array.raw_value(self.index), &self.context);
        self
    }

    pub fn raw_value_contains(self, substring: &str) -> Self {
        TextMatch::Contains(substring.to_string())
            .assert(&self.array.raw_value(self.index), &self.context);
        self
    }

    pub fn first_value(self, expected: &str) -> Self {
        TextMatch::Exact(expected.to_string())
            .assert(self.array.first_value(self.index), &self.context);
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.array.children(self.index).len();
        assert_eq!(
            actual, expected,
            "{}: Expected {} children, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn depth(self, expected: usize) -> Self {
        let actual = self.array.depth_level(self.index);
        assert_eq!(
            actual, expected,
            "{}: Expected depth level {}, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn id_name(self, expected: &str) -> Self {
        let actual = self.array.subtag_value(self.index, ID_NAME_TAG);
        assert_eq!(
            actual,
            Some(expected),
            "{}: Expected id name '{}', found {:?}",
            self.context,
            expected,
            actual
        );
        self
    }

    /// Navigate to the n-th child.
    pub fn child(self, n: usize) -> NodeAssertion<'a> {
        let children = self.array.children(self.index);
        let index = *children.get(n).unwrap_or_else(|| {
            panic!(
                "{}: Expected a child #{}, found {} children",
                self.context,
                n,
                children.len()
            )
        });
        NodeAssertion {
            array: self.array,
            index,
            context: format!("{} > child[{}]", self.context, n),
        }
    }

    /// Navigate to the first child carrying `tag`.
    pub fn child_tagged(self, tag: &str) -> NodeAssertion<'a> {
        let index = self
            .array
            .child_with_tag(self.index, tag)
            .unwrap_or_else(|| panic!("{}: Expected a child tagged '{}'", self.context, tag));
        NodeAssertion {
            array: self.array,
            index,
            context: format!("{} > {}", self.context, tag),
        }
    }
}
