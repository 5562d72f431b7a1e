//! Error types for GEF metadata extraction.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::tags::GefTag;

/// Result type for extraction operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Extraction failure for one file.
///
/// Extraction is all-or-nothing: when this is returned no metadata is.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Cannot read CPT file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create CPT metadata from '{origin}', line {line} ({tag}): {cause}")]
    Tag {
        origin: String,
        line: usize,
        tag: GefTag,
        #[source]
        cause: TagError,
    },
}

impl ParseError {
    /// The file or content name the error refers to.
    pub fn origin(&self) -> &str {
        match self {
            ParseError::Io { path, .. } => path,
            ParseError::Tag { origin, .. } => origin,
        }
    }

    /// The offending tag, if the failure came from a tag line.
    pub fn tag(&self) -> Option<GefTag> {
        match self {
            ParseError::Io { .. } => None,
            ParseError::Tag { tag, .. } => Some(*tag),
        }
    }

    pub fn is_unsupported_srid(&self) -> bool {
        matches!(
            self,
            ParseError::Tag {
                cause: TagError::UnsupportedSrid(_),
                ..
            }
        )
    }
}

/// What was wrong with a single tag line.
#[derive(Error, Debug, PartialEq)]
pub enum TagError {
    #[error("missing '=' before the payload")]
    MissingPayload,

    #[error("missing element {index} ({name})")]
    MissingElement { index: usize, name: &'static str },

    #[error("expected {expected} elements, found {found}")]
    WrongElementCount { expected: usize, found: usize },

    #[error("invalid integer '{value}' for {name}")]
    InvalidInteger {
        name: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid number '{value}' for {name}")]
    InvalidFloat {
        name: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("non-finite number '{value}' for {name}")]
    NonFinite { name: &'static str, value: String },

    #[error("Unknown SRID '{0}'")]
    UnsupportedSrid(i64),

    #[error("{name} out of range: {value}")]
    DateOutOfRange { name: &'static str, value: i64 },
}
