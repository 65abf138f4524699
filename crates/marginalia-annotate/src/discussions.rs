//! Discussion resolution: which comment threads a block displays.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use marginalia_doc::{DocumentQuery, QueryScope};
use marginalia_types::{AnnotationId, BlockPath, Comment, Discussion, Node, UserId};
use serde::Serialize;

use crate::registry::AnnotationRegistry;
use crate::store::DiscussionStore;

/// An unresolved discussion anchored at a block.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDiscussion {
    pub id: AnnotationId,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_content: Option<String>,
}

/// What a collapsed discussion card shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscussionPreview<'a> {
    pub first_comment: Option<&'a Comment>,
    /// The commented text as it was when the thread started.
    pub document_content: Option<&'a str>,
    /// Comments after the first.
    pub reply_count: usize,
}

impl ResolvedDiscussion {
    pub fn first_comment(&self) -> Option<&Comment> {
        self.comments.first()
    }

    pub fn preview(&self) -> DiscussionPreview<'_> {
        DiscussionPreview {
            first_comment: self.first_comment(),
            document_content: self.document_content.as_deref(),
            reply_count: self.comments.len().saturating_sub(1),
        }
    }
}

impl From<&Discussion> for ResolvedDiscussion {
    fn from(discussion: &Discussion) -> Self {
        Self {
            id: discussion.id.clone(),
            comments: discussion.comments.clone(),
            created_at: discussion.created_at,
            user_id: discussion.user_id.clone(),
            document_content: discussion.document_content.clone(),
        }
    }
}

/// Resolve the discussions anchored at `block`, in store order.
///
/// A discussion is kept when it is anchored at `block`, still has a comment
/// marker in the document, has a marker under `block`, and is not resolved.
pub fn resolve_discussions<D: DocumentQuery + ?Sized>(
    doc: &D,
    registry: &mut AnnotationRegistry,
    store: &DiscussionStore,
    block: &BlockPath,
) -> Vec<ResolvedDiscussion> {
    let nodes = doc.query_nodes(block, QueryScope::Subtree, &Node::has_comment);

    let mut here: HashSet<AnnotationId> = HashSet::new();
    for (node, _) in &nodes {
        for id in node.comment_thread_ids() {
            registry.reconcile_with(&id, block, |old| {
                doc.any_node(old, QueryScope::Subtree, &|n| n.references_comment(&id))
            });
            here.insert(id);
        }
    }

    store
        .iter()
        .filter(|d| here.contains(&d.id))
        .filter(|d| registry.is_anchored_at(&d.id, block))
        .filter(|d| !d.is_resolved)
        .filter(|d| {
            let live = doc.any_node(&BlockPath::root(), QueryScope::WholeDocument, &|n| {
                n.references_comment(&d.id)
            });
            if !live {
                tracing::debug!(id = %d.id, "discussion has no comment marker; skipping");
            }
            live
        })
        .map(ResolvedDiscussion::from)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
