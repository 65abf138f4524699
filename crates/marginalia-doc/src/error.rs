//! Error types for document operations.

use marginalia_types::BlockPath;
use thiserror::Error;

/// Errors that can occur when addressing or mutating a document.
#[derive(Error, Debug)]
pub enum DocError {
    /// No node at this path.
    #[error("no node at path {0}")]
    PathOutOfBounds(BlockPath),

    /// The path addresses a text leaf where an element was required.
    #[error("node at path {0} is not an element")]
    NotAnElement(BlockPath),

    /// The root itself cannot be inserted, removed or replaced.
    #[error("operation not supported on the document root")]
    RootPath,

    /// Document JSON failed to parse or serialize.
    #[error("document serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
