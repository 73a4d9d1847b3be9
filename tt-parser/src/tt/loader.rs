//! Document loading utilities
//!
//! This module provides `DocumentLoader`, a utility for loading tagged text from files or
//! strings and parsing it. It is used by the compositor, the CLI and tests alike.
//!
//! # Example
//!
//! ```rust,ignore
//! use tt_parser::tt::loader::DocumentLoader;
//!
//! // From file
//! let array = DocumentLoader::from_path("content.tt")?.parse()?;
//!
//! // From string
//! let array = DocumentLoader::from_string("#title Hello\n").parse()?;
//!
//! // A persisted node array
//! let array = DocumentLoader::load_persisted("json/content.json")?;
//! ```

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::tt::ast::NodeArray;
use crate::tt::error::ParseError;
use crate::tt::formats::json::from_persisted_str;
use crate::tt::parsing::parse_lines;

/// Error that can occur when loading documents
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("invalid persisted node array: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source text plus the name used in error messages.
pub struct DocumentLoader {
    source: String,
    name: String,
}

impl DocumentLoader {
    /// Load from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        Ok(DocumentLoader {
            source,
            name: path.display().to_string(),
        })
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: source.into(),
            name: "<string>".to_string(),
        }
    }

    /// Rename the document for error messages.
    pub fn named<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse the source into a node array
    pub fn parse(&self) -> Result<NodeArray, ParseError> {
        let lines: Vec<&str> = self.source.lines().collect();
        parse_lines(&lines, &self.name)
    }

    /// Read a node array written by [to_persisted_string](crate::tt::formats::to_persisted_string).
    pub fn load_persisted<P: AsRef<Path>>(path: P) -> Result<NodeArray, LoaderError> {
        let source = fs::read_to_string(path)?;
        Ok(from_persisted_str(&source)?)
    }
}
