//! Persisted discussion threads and their comments.
//!
//! Wire format is camelCase JSON with ISO-8601 timestamps, as stored by the
//! discussion backend. Timestamps are parsed into structured UTC values on
//! load; nothing downstream ever sees the raw strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AnnotationId, CommentId, UserId};

/// One comment in a discussion thread.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub discussion_id: AnnotationId,
    /// Rich-text value as produced by the comment editor.
    pub content_rich: serde_json::Value,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub user_id: UserId,
    #[serde(default)]
    pub is_edited: bool,
}

/// A comment thread anchored to document text (or to a suggestion).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub id: AnnotationId,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_resolved: bool,
    pub user_id: UserId,
    /// Snapshot of the commented text at creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_content: Option<String>,
}

impl Comment {
    pub fn new(
        discussion_id: AnnotationId,
        user_id: UserId,
        content_rich: serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CommentId::generate(),
            discussion_id,
            content_rich,
            created_at,
            updated_at: None,
            user_id,
            is_edited: false,
        }
    }
}

impl Discussion {
    pub fn new(id: AnnotationId, user_id: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            comments: Vec::new(),
            created_at,
            is_resolved: false,
            user_id,
            document_content: None,
        }
    }

    /// Builder: set the commented-text snapshot.
    pub fn with_document_content(mut self, content: impl Into<String>) -> Self {
        self.document_content = Some(content.into());
        self
    }

    /// Builder: append a comment.
    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    pub fn first_comment(&self) -> Option<&Comment> {
        self.comments.first()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const WIRE: &str = r#"{
        "id": "t1",
        "createdAt": "2025-03-01T10:00:00.000Z",
        "isResolved": false,
        "userId": "amy",
        "documentContent": "draft",
        "comments": [
            {
                "id": "c1",
                "discussionId": "t1",
                "contentRich": [{"type": "p", "children": [{"text": "Reword?"}]}],
                "createdAt": "2025-03-01T10:00:00Z",
                "userId": "amy",
                "isEdited": false
            }
        ]
    }"#;

    #[test]
    fn test_parses_iso_timestamps() {
        let d: Discussion = serde_json::from_str(WIRE).unwrap();
        assert_eq!(d.id, AnnotationId::new("t1"));
        assert_eq!(d.created_at.to_rfc3339(), "2025-03-01T10:00:00+00:00");
        assert_eq!(d.first_comment().map(|c| c.id.as_str()), Some("c1"));
        assert_eq!(d.document_content.as_deref(), Some("draft"));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let d: Discussion = serde_json::from_str(
            r#"{"id": "t2", "createdAt": "2025-03-01T10:00:00Z", "userId": "bo"}"#,
        )
        .unwrap();
        assert!(!d.is_resolved);
        assert!(d.comments.is_empty());
        assert_eq!(d.document_content, None);
    }

    #[test]
    fn test_roundtrip() {
        let d: Discussion = serde_json::from_str(WIRE).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        let parsed: Discussion = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);
    }

    #[test]
    fn test_new_comment_gets_fresh_id() {
        let at = Utc::now();
        let a = Comment::new("t1".into(), "amy".into(), serde_json::Value::Null, at);
        let b = Comment::new("t1".into(), "amy".into(), serde_json::Value::Null, at);
        assert_ne!(a.id, b.id);
        assert!(!a.is_edited);
    }
}
