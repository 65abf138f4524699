//! Suggestion and comment resolution for annotated documents.
//!
//! Tracked changes and comment threads are stored as fragments on document
//! nodes. For each block the editor renders, this crate answers: which
//! annotations does this block display, and what does each one say?
//!
//! # Pipeline
//!
//! ```text
//! block ──▶ resolve_suggestions ──┐
//!   │         (coalesce fragments)  ├──▶ BlockSummary::merge ──▶ gutter + Popover
//!   └────▶ resolve_discussions ───┘      (dedupe, sort by time)
//!
//! both consult an AnnotationRegistry: an annotation spanning several blocks
//! is shown only at the first block it was seen in.
//! ```
//!
//! [`EditorSession`] bundles the registries, the [`DiscussionStore`] and the
//! [`ResolverConfig`]; [`ResolutionPass`] enforces that blocks are resolved
//! top to bottom.

pub mod config;
pub mod discussions;
mod error;
pub mod labels;
pub mod merge;
pub mod popover;
pub mod registry;
pub mod session;
pub mod store;
pub mod suggestions;

pub use config::{BLOCK_PLACEHOLDER, ConfigError, ResolverConfig, SUGGESTION_KEY_PREFIX};
pub use discussions::{DiscussionPreview, ResolvedDiscussion, resolve_discussions};
pub use error::ResolveError;
pub use labels::{format_comment_date, placeholder_lines, plain_text, update_labels};
pub use merge::{AnnotationItem, BlockSummary, Focus, Glyph, dedupe_suggestions, is_resolved_suggestion};
pub use popover::{Popover, PopoverEffect, PopoverState};
pub use registry::AnnotationRegistry;
pub use session::{EditorSession, ResolutionPass};
pub use store::DiscussionStore;
pub use suggestions::{ResolvedKind, ResolvedSuggestion, resolve_suggestions};

/// Result type for annotation operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
