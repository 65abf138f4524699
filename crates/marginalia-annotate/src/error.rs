//! Error types for annotation operations.
//!
//! Resolution itself never fails: unresolvable annotations are skipped. These
//! errors cover the operations around it (discussion editing, draft
//! submission, pass ordering).

use marginalia_types::{AnnotationId, BlockPath, CommentId};
use thiserror::Error;

/// Errors that can occur outside the silent resolution path.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A pass was asked to resolve a block above one it already resolved.
    ///
    /// First-block-wins anchoring only holds when blocks resolve top to bottom.
    #[error("block {next} resolved after {previous}; passes must run in document order")]
    OutOfOrder { previous: BlockPath, next: BlockPath },

    /// No discussion with this id in the store.
    #[error("discussion not found: {0}")]
    DiscussionNotFound(AnnotationId),

    /// No comment with this id in the discussion.
    #[error("comment {comment} not found in discussion {discussion}")]
    CommentNotFound {
        discussion: AnnotationId,
        comment: CommentId,
    },

    /// Draft submission with no draft-marked text in the document.
    #[error("no draft comment in the document")]
    EmptyDraft,

    /// Discussion store JSON failed to parse or serialize.
    #[error("discussion serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
