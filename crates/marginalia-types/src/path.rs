//! Positional addresses of nodes in the document tree.
//!
//! A [`BlockPath`] is the sequence of child indices from the document root.
//! Paths are not stable under edits; resolution recomputes them every pass.
//! The derived `Ord` is lexicographic, which is document (pre-)order: a parent
//! sorts before its children and siblings sort by index.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Address of a node: child indices from the root.
#[derive(Clone, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockPath(Vec<usize>);

impl BlockPath {
    /// Create a path from raw indices.
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self(indices.into())
    }

    /// The empty path (the document root itself).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of the parent node, `None` for the root.
    pub fn parent(&self) -> Option<BlockPath> {
        self.0.split_last().map(|(_, rest)| Self(rest.to_vec()))
    }

    /// Path of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> BlockPath {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Truncate to the first `depth` indices (the ancestor at that depth).
    pub fn ancestor_at(&self, depth: usize) -> Option<BlockPath> {
        if depth > self.0.len() {
            return None;
        }
        Some(Self(self.0[..depth].to_vec()))
    }

    /// Strict ancestor: `self` is a proper prefix of `other`.
    pub fn is_ancestor_of(&self, other: &BlockPath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    /// Strict descendant: `other` is a proper prefix of `self`.
    pub fn is_descendant_of(&self, other: &BlockPath) -> bool {
        other.is_ancestor_of(self)
    }

    /// `self` equals `other` or lies inside it.
    pub fn is_within(&self, other: &BlockPath) -> bool {
        self.0.starts_with(&other.0)
    }

    /// Post-order comparison: a descendant sorts before its ancestor, unrelated
    /// paths keep document order.
    ///
    /// This is a total order (it is the order of a post-order traversal), so it
    /// is safe to hand to `sort_by`.
    pub fn post_order_cmp(&self, other: &BlockPath) -> Ordering {
        if self.is_descendant_of(other) {
            Ordering::Less
        } else if self.is_ancestor_of(other) {
            Ordering::Greater
        } else {
            self.0.cmp(&other.0)
        }
    }
}

impl From<Vec<usize>> for BlockPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for BlockPath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for BlockPath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl fmt::Debug for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockPath({:?})", self.0)
    }
}

/// Error from parsing a textual block path.
#[derive(Debug, thiserror::Error)]
pub enum PathParseError {
    #[error("invalid path segment '{0}'")]
    InvalidSegment(String),
}

impl FromStr for BlockPath {
    type Err = PathParseError;

    /// Parse `0.2.1`, `0,2,1` or `[0, 2, 1]`. An empty string is the root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('[').trim_end_matches(']').trim();
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        trimmed
            .split(['.', ','])
            .map(|seg| {
                let seg = seg.trim();
                seg.parse::<usize>()
                    .map_err(|_| PathParseError::InvalidSegment(seg.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

// ============================================================================
// Tests
// ============================================================================
