//! Annotation popover state for one block.
//!
//! ```text
//! Closed ──open──▶ All ◀──────────▶ Single(id)
//!    ▲              │                  │
//!    └────close─────┴──────close───────┘
//! ```

use marginalia_types::AnnotationId;

use crate::merge::{BlockSummary, Focus};

/// What the popover shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PopoverState {
    #[default]
    Closed,
    /// Every annotation of the block.
    All,
    /// Just the focused annotation.
    Single(AnnotationId),
}

/// Side effect the caller must carry out after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopoverEffect {
    None,
    /// Clear draft comment markers from the document.
    DiscardDraft,
}

/// Popover for a single block.
#[derive(Clone, Debug, Default)]
pub struct Popover {
    state: PopoverState,
}

impl Popover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PopoverState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PopoverState::Closed
    }

    /// Open from the gutter: the focused item if the block has one, else all.
    pub fn open(&mut self, summary: &BlockSummary, focus: &Focus) -> &PopoverState {
        self.state = match summary.active_item(focus) {
            Some(item) => PopoverState::Single(item.id().clone()),
            None => PopoverState::All,
        };
        &self.state
    }

    /// The document focus moved.
    pub fn focus(&mut self, summary: &BlockSummary, focus: &Focus) -> &PopoverState {
        match summary.active_item(focus) {
            Some(item) => self.state = PopoverState::Single(item.id().clone()),
            None if matches!(self.state, PopoverState::Single(_)) => {
                self.state = PopoverState::All;
            }
            None => {}
        }
        &self.state
    }

    /// A draft comment was started on this block.
    pub fn begin_draft(&mut self) -> &PopoverState {
        self.state = PopoverState::All;
        &self.state
    }

    /// Close; a draft on this block is discarded with it.
    pub fn close(&mut self, draft_here: bool) -> PopoverEffect {
        let was_open = self.is_open();
        self.state = PopoverState::Closed;
        if draft_here {
            tracing::debug!(was_open, "closing popover with a pending draft");
            PopoverEffect::DiscardDraft
        } else {
            PopoverEffect::None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use marginalia_types::BlockPath;

    use super::*;
    use crate::discussions::ResolvedDiscussion;

    fn summary() -> BlockSummary {
        let discussion = ResolvedDiscussion {
            id: "t1".into(),
            comments: Vec::new(),
            created_at: DateTime::from_timestamp(1_740_000_000, 0).unwrap(),
            user_id: "amy".into(),
            document_content: None,
        };
        BlockSummary::merge(BlockPath::from([0]), vec![discussion], vec![])
    }

    #[test]
    fn test_open_without_focus_shows_all() {
        let mut popover = Popover::new();
        assert_eq!(popover.open(&summary(), &Focus::none()), &PopoverState::All);
    }

    #[test]
    fn test_open_with_focus_shows_single() {
        let mut popover = Popover::new();
        assert_eq!(
            popover.open(&summary(), &Focus::comment("t1")),
            &PopoverState::Single("t1".into())
        );
    }

    #[test]
    fn test_focus_transitions() {
        let s = summary();
        let mut popover = Popover::new();

        // Closed stays closed without a match.
        assert_eq!(popover.focus(&s, &Focus::none()), &PopoverState::Closed);

        assert_eq!(popover.focus(&s, &Focus::comment("t1")), &PopoverState::Single("t1".into()));
        assert_eq!(popover.focus(&s, &Focus::comment("elsewhere")), &PopoverState::All);
        // All stays All without a match.
        assert_eq!(popover.focus(&s, &Focus::none()), &PopoverState::All);
    }

    #[test]
    fn test_draft_then_close_discards() {
        let mut popover = Popover::new();
        assert_eq!(popover.begin_draft(), &PopoverState::All);
        assert_eq!(popover.close(true), PopoverEffect::DiscardDraft);
        assert!(!popover.is_open());

        popover.open(&summary(), &Focus::none());
        assert_eq!(popover.close(false), PopoverEffect::None);
        assert_eq!(popover.state(), &PopoverState::Closed);
    }
}
