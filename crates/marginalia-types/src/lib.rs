//! Shared identity, path, node and discussion types for marginalia.
//!
//! This crate is the vocabulary every other crate speaks. It has **no internal
//! marginalia dependencies**: a pure leaf crate.
//!
//! # Relationships
//!
//! ```text
//! Document (tree of Node)
//!     └── Element (ElementKind, optional block SuggestionDatum)
//!         └── TextLeaf (text, SuggestionDatum*, comment thread ids, draft flag)
//!
//! AnnotationId ← shared by all fragments of one suggestion or comment thread
//!     └── Discussion (same id) ← comments on a thread or on a suggestion
//!         └── Comment (CommentId, author UserId)
//! ```
//!
//! # Key Types
//!
//! |---------------------|--------------------------------------------|
//! | Type                | Purpose                                    |
//! |---------------------|--------------------------------------------|
//! | [`AnnotationId`]    | Identity of one suggestion / thread        |
//! | [`BlockPath`]       | Positional address of a node               |
//! | [`Node`]            | Text leaf or block element                 |
//! | [`SuggestionDatum`] | One tracked-change fragment                |
//! | [`Discussion`]      | Persisted comment thread                   |
//! |---------------------|--------------------------------------------|

pub mod block;
pub mod discussion;
pub mod ids;
pub mod node;
pub mod path;
pub mod suggestion;

pub use block::ElementKind;
pub use discussion::{Comment, Discussion};
pub use ids::{AnnotationId, CommentId, DRAFT_THREAD_ID, UserId};
pub use node::{Element, Node, TextLeaf};
pub use path::{BlockPath, PathParseError};
pub use suggestion::{PropertyMap, SuggestionDatum, SuggestionKind};
