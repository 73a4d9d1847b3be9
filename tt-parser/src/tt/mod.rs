//! Main module for tagged text library functionality

pub mod ast;
pub mod error;
pub mod escaping;
pub mod formats;
pub mod loader;
pub mod parsing;
pub mod testing;

pub use ast::{Node, NodeArray, NodeIndex, NodeValue, ID_NAME_TAG};
pub use error::ParseError;
pub use loader::{DocumentLoader, LoaderError};
pub use parsing::parse_lines;
