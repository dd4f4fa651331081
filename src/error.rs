//! Error types for outline and bibliography operations.
//!
//! This module provides the [`BibError`] type for all library operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all library operations.
///
/// Outline build failures ([`BibError::DepthOverflow`], [`BibError::SiblingOverflow`])
/// abort the build in progress. Decode failures only surface when the decoder runs in
/// [`RecoveryMode::Strict`](crate::RecoveryMode::Strict).
#[derive(Error, Debug)]
pub enum BibError {
    /// An outline entry would sit outside depths 1 through 8.
    #[error("Outline depth {depth} outside 1..=8")]
    DepthOverflow {
        /// The offending depth.
        depth: usize,
    },

    /// A 16th sibling was added at the same depth.
    #[error("More than 15 sections at depth {depth}")]
    SiblingOverflow {
        /// Depth at which the sibling rank ran out.
        depth: usize,
    },

    /// An operation needed outline leaves but the outline is empty.
    #[error("Table of contents is empty")]
    EmptyOutline,

    /// A section name would be read back as a table of contents marker.
    #[error("Section name collides with a table of contents marker: {0}")]
    ReservedSectionName(String),

    /// No record with the given id exists in the store.
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// A record block could not be decoded.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A category key could not be parsed.
    #[error("Invalid catid: {0}")]
    InvalidCatId(String),

    /// JSON conversion failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`BibError`].
pub type Result<T> = std::result::Result<T, BibError>;
