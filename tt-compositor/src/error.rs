//! Error types for composition, spine interpretation and rendering

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tt_parser::tt::{LoaderError, ParseError};

/// Errors raised while applying template rules.
#[derive(Debug, Error)]
pub enum CompositorError {
    #[error("template '{template}': the subtag 'content' is present more than once, but it must be unique")]
    RepeatedContentSubtag { template: String },

    #[error("the tag '{tag}' has not the expected subtag '{subtag}'")]
    MissingExpectedTag { tag: String, subtag: String },

    #[error("template '{template}' has a not supported rule tag: '{rule_tag}'")]
    UnsupportedRule { template: String, rule_tag: String },

    #[error("template '{template}' has a not supported rule subtag: '{subtag}'")]
    UnsupportedSubtag { template: String, subtag: String },

    #[error("template '{template}': a '{rule_tag}' overlapped to a tag-list is not supported")]
    OverlappedListRule { template: String, rule_tag: String },

    #[error("template '{template}': the catching-tag rule for '{tag}' is not implemented")]
    CatchingTagNotImplemented { template: String, tag: String },

    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },

    #[error("unknown counter '{name}'")]
    UnknownCounter { name: String },

    #[error("counter '{name}': invalid {field} '{value}'")]
    InvalidCounter {
        name: String,
        field: String,
        value: String,
    },

    #[error("unknown template '{name}'")]
    UnknownTemplate { name: String },

    #[error("unknown content file '{name}'")]
    UnknownContent { name: String },

    #[error("cannot read '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors in the spine file, reported before any composition starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpineError {
    #[error("a tagged text name is equal to this template name: '{name}'; file homonyms are forbidden")]
    TemplateNameCollision { name: String },

    #[error(
        "a publish instruction lists {publications} publication files but {contents} content files"
    )]
    PublicationCountMismatch { publications: usize, contents: usize },

    #[error("the spine tag '{tag}' has not the expected subtag '{subtag}'")]
    MissingSubtag { tag: String, subtag: String },

    #[error("a publish instruction names no publication file")]
    EmptyPublish,
}

/// Everything that can stop a render.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot load '{path}': {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: LoaderError,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Spine(#[from] SpineError),

    #[error(transparent)]
    Compositor(#[from] CompositorError),

    #[error("cannot write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
