//! Per-block presentation: one chronological list of discussions and
//! suggestions, plus what the gutter shows for it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use marginalia_types::{AnnotationId, BlockPath, UserId};
use serde::Serialize;

use crate::discussions::ResolvedDiscussion;
use crate::suggestions::ResolvedSuggestion;

/// One entry of a block's merged annotation list.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum AnnotationItem {
    Discussion(ResolvedDiscussion),
    Suggestion(ResolvedSuggestion),
}

impl AnnotationItem {
    pub fn id(&self) -> &AnnotationId {
        match self {
            AnnotationItem::Discussion(d) => &d.id,
            AnnotationItem::Suggestion(s) => &s.suggestion_id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            AnnotationItem::Discussion(d) => d.created_at,
            AnnotationItem::Suggestion(s) => s.created_at,
        }
    }

    pub fn user_id(&self) -> &UserId {
        match self {
            AnnotationItem::Discussion(d) => &d.user_id,
            AnnotationItem::Suggestion(s) => &s.user_id,
        }
    }

    pub fn as_suggestion(&self) -> Option<&ResolvedSuggestion> {
        match self {
            AnnotationItem::Suggestion(s) => Some(s),
            AnnotationItem::Discussion(_) => None,
        }
    }

    pub fn as_discussion(&self) -> Option<&ResolvedDiscussion> {
        match self {
            AnnotationItem::Discussion(d) => Some(d),
            AnnotationItem::Suggestion(_) => None,
        }
    }
}

/// Whether a merged list entry is a resolved suggestion.
pub fn is_resolved_suggestion(item: &AnnotationItem) -> bool {
    matches!(item, AnnotationItem::Suggestion(_))
}

/// Gutter icon for a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    /// Suggestions only.
    Edit,
    /// Discussions only.
    Comment,
    Mixed,
}

/// What the user is currently pointing at in the document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Focus {
    pub suggestion: Option<AnnotationId>,
    pub comment: Option<AnnotationId>,
}

impl Focus {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn suggestion(id: impl Into<AnnotationId>) -> Self {
        Self {
            suggestion: Some(id.into()),
            comment: None,
        }
    }

    pub fn comment(id: impl Into<AnnotationId>) -> Self {
        Self {
            suggestion: None,
            comment: Some(id.into()),
        }
    }
}

/// Keep one record per suggestion id, the one with the highest priority.
///
/// Output follows the first appearance of each id.
pub fn dedupe_suggestions(suggestions: Vec<ResolvedSuggestion>) -> Vec<ResolvedSuggestion> {
    let mut slots: HashMap<AnnotationId, usize> = HashMap::new();
    let mut kept: Vec<ResolvedSuggestion> = Vec::new();
    for suggestion in suggestions {
        match slots.get(&suggestion.suggestion_id) {
            Some(&slot) => {
                if suggestion.kind.priority() > kept[slot].kind.priority() {
                    kept[slot] = suggestion;
                }
            }
            None => {
                slots.insert(suggestion.suggestion_id.clone(), kept.len());
                kept.push(suggestion);
            }
        }
    }
    kept
}

/// Everything a block displays about its annotations.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSummary {
    pub block: BlockPath,
    /// Discussions and suggestions, oldest first.
    pub items: Vec<AnnotationItem>,
    pub suggestion_count: usize,
    pub discussion_count: usize,
}

impl BlockSummary {
    /// Merge a block's resolved annotations into display order.
    pub fn merge(
        block: BlockPath,
        discussions: Vec<ResolvedDiscussion>,
        suggestions: Vec<ResolvedSuggestion>,
    ) -> Self {
        let suggestions = dedupe_suggestions(suggestions);
        let suggestion_count = suggestions.len();
        let discussion_count = discussions.len();

        let mut items: Vec<AnnotationItem> = discussions
            .into_iter()
            .map(AnnotationItem::Discussion)
            .chain(suggestions.into_iter().map(AnnotationItem::Suggestion))
            .collect();
        items.sort_by_key(AnnotationItem::created_at);

        Self {
            block,
            items,
            suggestion_count,
            discussion_count,
        }
    }

    pub fn total(&self) -> usize {
        self.suggestion_count + self.discussion_count
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn glyph(&self) -> Option<Glyph> {
        match (self.suggestion_count > 0, self.discussion_count > 0) {
            (true, true) => Some(Glyph::Mixed),
            (true, false) => Some(Glyph::Edit),
            (false, true) => Some(Glyph::Comment),
            (false, false) => None,
        }
    }

    /// Count shown next to the glyph; a single annotation shows none.
    pub fn badge(&self) -> Option<usize> {
        let total = self.total();
        (total > 1).then_some(total)
    }

    pub fn suggestions(&self) -> impl Iterator<Item = &ResolvedSuggestion> {
        self.items.iter().filter_map(AnnotationItem::as_suggestion)
    }

    pub fn discussions(&self) -> impl Iterator<Item = &ResolvedDiscussion> {
        self.items.iter().filter_map(AnnotationItem::as_discussion)
    }

    /// The item matching `focus`; a focused suggestion wins over a focused
    /// discussion.
    pub fn active_item(&self, focus: &Focus) -> Option<&AnnotationItem> {
        let suggestion = focus.suggestion.as_ref().and_then(|id| {
            self.items
                .iter()
                .find(|item| is_resolved_suggestion(item) && item.id() == id)
        });
        suggestion.or_else(|| {
            let id = focus.comment.as_ref()?;
            self.items
                .iter()
                .find(|item| !is_resolved_suggestion(item) && item.id() == id)
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
