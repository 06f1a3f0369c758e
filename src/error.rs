//! Error types for structex.

use std::io;
use thiserror::Error;

/// Result type alias for structex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document structuring.
///
/// An empty document is not an error: a source with zero extractable text
/// produces a valid [`Document`](crate::model::Document) with no pages.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from a source implementation.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The external decoder or extraction service could not be reached,
    /// or returned no usable content. Fatal to the current request.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// An externally supplied document failed validation. The message names
    /// the first violated invariant or missing field.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// An internally assembled document failed its own validation.
    /// This indicates a pipeline defect, not bad external input.
    #[error("Schema mismatch (internal): {0}")]
    SchemaMismatch(String),

    /// Error serializing a document to JSON.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl Error {
    /// Build the validation error kind matching the given provenance.
    pub(crate) fn validation(internal: bool, message: impl Into<String>) -> Self {
        if internal {
            Error::SchemaMismatch(message.into())
        } else {
            Error::MalformedPayload(message.into())
        }
    }
}
