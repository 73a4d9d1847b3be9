//! # tt-parser
//!
//! A parser for the tagged text format.
//!
//! Tagged text is a line oriented markup: hierarchical hashtags (`#title`, `##sub`), empty
//! value hashtags (`#name#`), inline tags (`/*name*/ body */`), comments and escapes. A
//! source file becomes a [`NodeArray`](tt::ast::NodeArray): a flattened tree where every
//! cross reference is an index into the same array.
//!
//! File Layout
//!
//!     src/tt
//!       ├── ast          Node, NodeValue and the NodeArray arena
//!       ├── parsing      line classification, the tag tree parser and inline tags
//!       ├── escaping     escape character handling shared by the parser
//!       ├── formats      persisted json representation and treeviz
//!       ├── loader       loading sources from files or strings
//!       └── testing      fluent assertions over node arrays
//!
//! For testing guidelines, see the [testing module](tt::testing).

pub mod tt;
