//! Testing utilities for node array assertions
//!
//!     Node arrays are flat, so asserting on them index by index gets unreadable fast and
//!     breaks whenever an unrelated node is added in front. The fluent API here navigates
//!     the tree the way the compositor does (roots, children, tags) and reports failures
//!     with the path that led to the node.
//!
//!     ```rust,ignore
//!     use tt_parser::tt::testing::assert_nodes;
//!
//!     let array = DocumentLoader::from_string("#title Hello\n##sub World\n").parse()?;
//!     assert_nodes(&array)
//!         .root_count(1)
//!         .root(0)
//!         .tag("title")
//!         .raw_value("HelloWorld")
//!         .child_tagged("sub")
//!         .depth(2)
//!         .first_value("World");
//!     ```
//!
//!     Prefer checking the tree through these assertions over comparing whole arrays,
//!     except in tests that pin the exact index layout on purpose.

mod assertions;

pub use assertions::{NodeArrayAssertion, NodeAssertion, TextMatch};

use crate::tt::ast::NodeArray;

/// Create an assertion builder for a node array
pub fn assert_nodes(array: &NodeArray) -> NodeArrayAssertion<'_> {
    NodeArrayAssertion { array }
}
