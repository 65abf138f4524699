//! In-memory annotated document model for marginalia.
//!
//! Two things live here:
//!
//! - [`DocumentQuery`]: the narrow read seam between annotation resolution and
//!   whatever editing engine owns the real document. Resolution only needs
//!   node lookup by path, filtered node queries (subtree or whole document) and
//!   the ordered list of blocks.
//! - [`Document`]: a plain tree implementation of that seam, used by tests,
//!   the inspector and any host without its own tree.
//!
//! # Paths
//!
//! Every node is addressed by a [`BlockPath`](marginalia_types::BlockPath) of
//! child indices. Blocks are top-level elements; everything nested reports to
//! its top-level block.

mod document;
mod error;
mod query;

pub use document::{Descendants, Document};
pub use error::DocError;
pub use query::{DocumentQuery, QueryScope};

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocError>;
