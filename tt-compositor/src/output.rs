//! The developing output of a publication unit
//!
//!     The output is a tree of branches: a branch is text or a nested branch list. Text is
//!     always appended to the current node, which starts as the root.
//!
//!     One node boundary splits the tree into two zones. `file-opening` writes before it,
//!     `file-ending` writes after it, and then the boundary itself becomes the current node,
//!     so the body lands between the two:
//!
//!         [ "<html>", [ ...body... ], "</html>" ]
//!
//!     The body stays addressable on its own through [OutputTree::body_text].

/// A piece of output: text, or a nested node of the same tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch {
    Text(String),
    /// Index of the nested node in the tree's node store.
    Node(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTree {
    /// Branch lists; index 0 is the root.
    nodes: Vec<Vec<Branch>>,
    current: usize,
    boundary: Option<usize>,
}

impl Default for OutputTree {
    fn default() -> Self {
        OutputTree {
            nodes: vec![Vec::new()],
            current: 0,
            boundary: None,
        }
    }
}

impl OutputTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text to the current node. Empty text adds nothing.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.nodes[self.current].push(Branch::Text(text.to_string()));
    }

    /// Add the node boundary after the last branch of the current node.
    pub fn insert_boundary(&mut self) {
        let boundary = self.nodes.len();
        self.nodes.push(Vec::new());
        self.nodes[self.current].push(Branch::Node(boundary));
        self.boundary = Some(boundary);
    }

    /// Make the boundary the current node. Without a boundary nothing changes.
    pub fn enter_boundary(&mut self) {
        if let Some(boundary) = self.boundary {
            self.current = boundary;
        }
    }

    /// The branches of the root node.
    pub fn branches(&self) -> &[Branch] {
        &self.nodes[0]
    }

    /// The branches of a nested node.
    pub fn node(&self, index: usize) -> Option<&[Branch]> {
        self.nodes.get(index).map(Vec::as_slice)
    }

    /// The flattened text of the whole tree.
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.flatten(0, &mut text);
        text
    }

    /// The flattened text behind the boundary, empty when there is none.
    pub fn body_text(&self) -> String {
        let mut text = String::new();
        if let Some(boundary) = self.boundary {
            self.flatten(boundary, &mut text);
        }
        text
    }

    fn flatten(&self, index: usize, out: &mut String) {
        for branch in self.node(index).unwrap_or(&[]) {
            match branch {
                Branch::Text(text) => out.push_str(text),
                Branch::Node(child) if *child > index => self.flatten(*child, out),
                Branch::Node(_) => {}
            }
        }
    }
}
