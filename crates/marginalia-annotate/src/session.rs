//! Editor session: the state that outlives a single render pass.
//!
//! Anchoring is first-block-wins, so it depends on the order in which blocks
//! are resolved. A [`ResolutionPass`] makes that order explicit and refuses to
//! go backwards.

use chrono::{DateTime, Utc};
use marginalia_doc::{Document, DocumentQuery};
use marginalia_types::{AnnotationId, BlockPath, Comment, Discussion, UserId};

use crate::config::ResolverConfig;
use crate::discussions::{ResolvedDiscussion, resolve_discussions};
use crate::merge::BlockSummary;
use crate::registry::AnnotationRegistry;
use crate::store::DiscussionStore;
use crate::suggestions::{ResolvedSuggestion, resolve_suggestions};
use crate::{ResolveError, Result};

/// Resolver configuration, anchoring registries and discussions of one
/// open document.
#[derive(Clone, Debug, Default)]
pub struct EditorSession {
    config: ResolverConfig,
    suggestion_registry: AnnotationRegistry,
    comment_registry: AnnotationRegistry,
    discussions: DiscussionStore,
}

impl EditorSession {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Builder: start from a loaded discussion store.
    pub fn with_discussions(mut self, discussions: DiscussionStore) -> Self {
        self.discussions = discussions;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn discussions(&self) -> &DiscussionStore {
        &self.discussions
    }

    pub fn discussions_mut(&mut self) -> &mut DiscussionStore {
        &mut self.discussions
    }

    pub fn suggestion_registry(&self) -> &AnnotationRegistry {
        &self.suggestion_registry
    }

    pub fn comment_registry(&self) -> &AnnotationRegistry {
        &self.comment_registry
    }

    pub fn resolve_suggestions<D: DocumentQuery + ?Sized>(
        &mut self,
        doc: &D,
        block: &BlockPath,
    ) -> Vec<ResolvedSuggestion> {
        resolve_suggestions(
            doc,
            &mut self.suggestion_registry,
            &self.discussions,
            &self.config,
            block,
        )
    }

    pub fn resolve_discussions<D: DocumentQuery + ?Sized>(
        &mut self,
        doc: &D,
        block: &BlockPath,
    ) -> Vec<ResolvedDiscussion> {
        resolve_discussions(doc, &mut self.comment_registry, &self.discussions, block)
    }

    /// Resolve and merge everything `block` displays.
    pub fn summarize_block<D: DocumentQuery + ?Sized>(
        &mut self,
        doc: &D,
        block: &BlockPath,
    ) -> BlockSummary {
        let discussions = self.resolve_discussions(doc, block);
        let suggestions = self.resolve_suggestions(doc, block);
        BlockSummary::merge(block.clone(), discussions, suggestions)
    }

    /// Start a top-to-bottom pass over the document's blocks.
    pub fn begin_pass(&mut self) -> ResolutionPass<'_> {
        ResolutionPass {
            session: self,
            last: None,
        }
    }

    /// Summaries of every block, in document order.
    pub fn resolve_document<D: DocumentQuery + ?Sized>(
        &mut self,
        doc: &D,
    ) -> Result<Vec<BlockSummary>> {
        let mut pass = self.begin_pass();
        doc.blocks()
            .iter()
            .map(|block| pass.resolve_block(doc, block))
            .collect()
    }

    /// Turn the draft comment into a persisted discussion.
    ///
    /// The draft markers in `doc` are re-pointed at the new thread. Returns the
    /// new discussion id.
    pub fn submit_draft(
        &mut self,
        doc: &mut Document,
        user_id: UserId,
        content_rich: serde_json::Value,
        at: DateTime<Utc>,
    ) -> Result<AnnotationId> {
        let quoted = doc.draft_text();
        if quoted.is_empty() {
            return Err(ResolveError::EmptyDraft);
        }

        let id = AnnotationId::generate();
        let comment = Comment::new(id.clone(), user_id.clone(), content_rich, at);
        let discussion = Discussion::new(id.clone(), user_id, at)
            .with_document_content(quoted)
            .with_comment(comment);

        let promoted = doc.promote_draft_comment(&id);
        self.discussions.insert(discussion);
        tracing::debug!(%id, leaves = promoted, "submitted draft comment");
        Ok(id)
    }
}

/// One document-order sweep over blocks.
pub struct ResolutionPass<'s> {
    session: &'s mut EditorSession,
    last: Option<BlockPath>,
}

impl ResolutionPass<'_> {
    /// Summarize `block`, which must not come before the previous block.
    pub fn resolve_block<D: DocumentQuery + ?Sized>(
        &mut self,
        doc: &D,
        block: &BlockPath,
    ) -> Result<BlockSummary> {
        if let Some(previous) = &self.last
            && block < previous
        {
            tracing::warn!(%previous, next = %block, "out-of-order block resolution");
            return Err(ResolveError::OutOfOrder {
                previous: previous.clone(),
                next: block.clone(),
            });
        }
        let summary = self.session.summarize_block(doc, block);
        self.last = Some(block.clone());
        Ok(summary)
    }

    /// The most recently resolved block.
    pub fn last_block(&self) -> Option<&BlockPath> {
        self.last.as_ref()
    }
}

// ============================================================================
// Tests
// ============================================================================
