//! Typed identifiers for annotations, comments, and users.
//!
//! All ids are opaque strings on the wire. The editor assigns them at creation
//! and they never change afterwards. Locally generated ids are UUIDv7 hex
//! (time-ordered), but ids minted elsewhere (nanoid, database keys) are
//! accepted as-is. The `short()` form is for human-facing output only, never
//! used as a lookup key.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity shared by every fragment of one suggestion or one comment thread.
///
/// Suggestions and discussions share this id space: a discussion whose id
/// equals a suggestion's id holds that suggestion's comments.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(String);

/// A single comment inside a discussion thread.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

/// The author of a suggestion or comment.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Reserved thread id for the in-progress, unpersisted comment.
pub const DRAFT_THREAD_ID: &str = "draft";

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_string_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Wrap an existing id string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh time-ordered id (UUIDv7, simple hex).
            pub fn generate() -> Self {
                Self(uuid::Uuid::now_v7().as_simple().to_string())
            }

            /// The raw id string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// At most the first 8 characters, for display only.
            pub fn short(&self) -> &str {
                match self.0.char_indices().nth(8) {
                    Some((idx, _)) => &self.0[..idx],
                    None => &self.0,
                }
            }

            /// Check for the empty string (never a valid id).
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<&str> for $T {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $T {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $T {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $T {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $T {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $T {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.0)
            }
        }
    };
}

impl_string_id!(AnnotationId, "AnnotationId");
impl_string_id!(CommentId, "CommentId");
impl_string_id!(UserId, "UserId");

impl AnnotationId {
    /// The reserved draft thread id.
    pub fn draft() -> Self {
        Self(DRAFT_THREAD_ID.to_string())
    }

    /// Check if this is the draft thread id.
    pub fn is_draft(&self) -> bool {
        self.0 == DRAFT_THREAD_ID
    }
}

// ============================================================================
// Tests
// ============================================================================
