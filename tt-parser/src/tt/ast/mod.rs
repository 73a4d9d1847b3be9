//! Data model shared by the parser and the compositor
//!
//!     Content files, template files and the spine all parse into the same structure, a
//!     [NodeArray] of [Node]s addressed by [NodeIndex].

mod array;
mod node;

pub use array::NodeArray;
pub use node::{Node, NodeIndex, NodeValue, ID_NAME_TAG};
