//! Discussion store: id → thread, in insertion order.
//!
//! Mirrors what the discussion backend persists. Resolution only reads it; the
//! editing operations here are the ones the comment UI performs (reply, edit,
//! delete, resolve) so that a session can keep its local copy current between
//! backend round trips.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use marginalia_types::{AnnotationId, Comment, CommentId, Discussion, UserId};

use crate::{ResolveError, Result};

/// Discussions keyed by id, iterated in insertion order.
#[derive(Clone, Debug, Default)]
pub struct DiscussionStore {
    discussions: IndexMap<AnnotationId, Discussion>,
}

impl DiscussionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of discussions. Later duplicates replace earlier ones.
    pub fn from_json(json: &str) -> Result<Self> {
        let list: Vec<Discussion> = serde_json::from_str(json)?;
        Ok(list.into_iter().collect())
    }

    /// Serialize as a JSON array in store order.
    pub fn to_json(&self) -> Result<String> {
        let list: Vec<&Discussion> = self.discussions.values().collect();
        Ok(serde_json::to_string_pretty(&list)?)
    }

    /// Insert or replace a discussion. Returns the previous one with that id.
    pub fn insert(&mut self, discussion: Discussion) -> Option<Discussion> {
        self.discussions.insert(discussion.id.clone(), discussion)
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&Discussion> {
        self.discussions.get(id)
    }

    pub fn get_mut(&mut self, id: &AnnotationId) -> Option<&mut Discussion> {
        self.discussions.get_mut(id)
    }

    /// Remove a discussion, keeping the order of the rest.
    pub fn remove(&mut self, id: &AnnotationId) -> Option<Discussion> {
        self.discussions.shift_remove(id)
    }

    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.discussions.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Discussion> {
        self.discussions.values()
    }

    pub fn len(&self) -> usize {
        self.discussions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discussions.is_empty()
    }

    /// Comments of discussion `id`, empty when there is none.
    pub fn comments_for(&self, id: &AnnotationId) -> &[Comment] {
        self.discussions
            .get(id)
            .map(|d| d.comments.as_slice())
            .unwrap_or(&[])
    }

    fn discussion_mut(&mut self, id: &AnnotationId) -> Result<&mut Discussion> {
        self.discussions
            .get_mut(id)
            .ok_or_else(|| ResolveError::DiscussionNotFound(id.clone()))
    }

    /// Append a reply. Returns the new comment's id.
    pub fn add_comment(
        &mut self,
        discussion_id: &AnnotationId,
        user_id: UserId,
        content_rich: serde_json::Value,
        at: DateTime<Utc>,
    ) -> Result<CommentId> {
        let discussion = self.discussion_mut(discussion_id)?;
        let comment = Comment::new(discussion_id.clone(), user_id, content_rich, at);
        let id = comment.id.clone();
        discussion.comments.push(comment);
        Ok(id)
    }

    /// Replace a comment's content and flag it as edited.
    pub fn edit_comment(
        &mut self,
        discussion_id: &AnnotationId,
        comment_id: &CommentId,
        content_rich: serde_json::Value,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let comment = self
            .discussion_mut(discussion_id)?
            .comments
            .iter_mut()
            .find(|c| &c.id == comment_id)
            .ok_or_else(|| ResolveError::CommentNotFound {
                discussion: discussion_id.clone(),
                comment: comment_id.clone(),
            })?;
        comment.content_rich = content_rich;
        comment.updated_at = Some(at);
        comment.is_edited = true;
        Ok(())
    }

    /// Delete a comment from a discussion.
    pub fn remove_comment(
        &mut self,
        discussion_id: &AnnotationId,
        comment_id: &CommentId,
    ) -> Result<Comment> {
        let discussion = self.discussion_mut(discussion_id)?;
        let idx = discussion
            .comments
            .iter()
            .position(|c| &c.id == comment_id)
            .ok_or_else(|| ResolveError::CommentNotFound {
                discussion: discussion_id.clone(),
                comment: comment_id.clone(),
            })?;
        Ok(discussion.comments.remove(idx))
    }

    /// Mark a discussion resolved (or reopen it).
    pub fn set_resolved(&mut self, discussion_id: &AnnotationId, resolved: bool) -> Result<()> {
        self.discussion_mut(discussion_id)?.is_resolved = resolved;
        Ok(())
    }
}

impl FromIterator<Discussion> for DiscussionStore {
    fn from_iter<I: IntoIterator<Item = Discussion>>(iter: I) -> Self {
        let mut store = Self::new();
        for discussion in iter {
            store.insert(discussion);
        }
        store
    }
}

// ============================================================================
// Tests
// ============================================================================
