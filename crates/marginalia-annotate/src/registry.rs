//! Annotation anchoring: which block displays which annotation.
//!
//! An annotation's fragments may span several blocks (a deletion across three
//! paragraphs, a comment over a paragraph break). Exactly one block shows its
//! summary: the first block observed to contain it. The registry remembers
//! that choice across render passes and only moves it once the anchoring
//! block no longer holds any fragment of the annotation.
//!
//! Entries are overwritten, never deleted. The map grows with the set of ids
//! seen during the session, which is bounded by the document's edit history.

use std::collections::HashMap;

use marginalia_types::{AnnotationId, BlockPath};

/// Mapping from annotation id to its anchoring block.
#[derive(Clone, Debug, Default)]
pub struct AnnotationRegistry {
    anchors: HashMap<AnnotationId, BlockPath>,
}

impl AnnotationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchoring block of `id`, if it has been observed.
    pub fn get(&self, id: &AnnotationId) -> Option<&BlockPath> {
        self.anchors.get(id)
    }

    /// Whether `id` is anchored at exactly `block`.
    pub fn is_anchored_at(&self, id: &AnnotationId, block: &BlockPath) -> bool {
        self.anchors.get(id) == Some(block)
    }

    /// Record that `id` was observed in `candidate`.
    ///
    /// - no entry: anchor at `candidate`;
    /// - entry still live: keep it, even if `candidate` differs;
    /// - entry no longer live: move to `candidate`.
    pub fn reconcile(&mut self, id: &AnnotationId, candidate: &BlockPath, still_live_at_old: bool) {
        self.reconcile_with(id, candidate, |_| still_live_at_old);
    }

    /// Like [`reconcile`](Self::reconcile), evaluating liveness only when an
    /// entry exists. `is_live` receives the currently anchored block.
    pub fn reconcile_with(
        &mut self,
        id: &AnnotationId,
        candidate: &BlockPath,
        is_live: impl FnOnce(&BlockPath) -> bool,
    ) {
        if let Some(old) = self.anchors.get_mut(id) {
            if *old != *candidate && !is_live(old) {
                tracing::trace!(%id, from = %old, to = %candidate, "re-anchoring annotation");
                *old = candidate.clone();
            }
            return;
        }

        tracing::trace!(%id, block = %candidate, "anchoring annotation");
        self.anchors.insert(id.clone(), candidate.clone());
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AnnotationId, &BlockPath)> {
        self.anchors.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
