// ABOUTME: Error types for OPDS catalog parsing.
// ABOUTME: Provides OpdsError with MalformedXml and MissingFeedRoot variants.

use std::fmt;
use thiserror::Error;

/// Errors that fail a whole catalog parse.
///
/// Per-field anomalies never show up here: catalogs are third-party content,
/// so a broken count or missing element degrades to a default value instead
/// of taking down the rest of the feed.
#[derive(Debug, Error)]
pub enum OpdsError {
    /// The bytes are not a well-formed XML document.
    #[error("malformed catalog XML: {0}")]
    MalformedXml(String),

    /// The document parsed but carries no Atom feed root.
    #[error("catalog has no Atom feed root")]
    MissingFeedRoot,
}

impl OpdsError {
    /// Creates a MalformedXml error from an underlying parser error.
    pub fn malformed(err: impl fmt::Display) -> Self {
        OpdsError::MalformedXml(err.to_string())
    }
}
