//! Tracked-change data carried by document nodes.
//!
//! A text leaf may carry several stacked data (an update layered on an insert,
//! or two overlapping edits). A block element carries at most one, describing
//! the insertion or removal of the block itself (or of the line break that
//! separates it from its predecessor).

use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::ids::{AnnotationId, UserId};

/// Mark properties touched by an update suggestion, in insertion order.
pub type PropertyMap = IndexMap<String, serde_json::Value>;

/// Which kind of change a fragment records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum SuggestionKind {
    /// Text or block proposed for insertion.
    Insert,
    /// Text or block proposed for removal.
    #[strum(serialize = "remove", serialize = "delete")]
    Remove,
    /// Mark properties changed (bold added, italic removed, ...).
    Update,
}

impl SuggestionKind {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Insert => "insert",
            SuggestionKind::Remove => "remove",
            SuggestionKind::Update => "update",
        }
    }
}

impl std::fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One suggestion datum attached to a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionDatum {
    pub id: AnnotationId,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    /// Properties being removed (update only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyMap>,
    /// Properties being added (update only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_properties: Option<PropertyMap>,
    /// Block datum standing for a paragraph split/join rather than a whole block.
    #[serde(default)]
    pub is_line_break: bool,
    pub user_id: UserId,
    /// Unix milliseconds on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl SuggestionDatum {
    fn with_kind(
        kind: SuggestionKind,
        id: impl Into<AnnotationId>,
        user_id: impl Into<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            properties: None,
            new_properties: None,
            is_line_break: false,
            user_id: user_id.into(),
            created_at,
        }
    }

    pub fn insert(
        id: impl Into<AnnotationId>,
        user_id: impl Into<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::with_kind(SuggestionKind::Insert, id, user_id, created_at)
    }

    pub fn remove(
        id: impl Into<AnnotationId>,
        user_id: impl Into<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::with_kind(SuggestionKind::Remove, id, user_id, created_at)
    }

    /// An update datum removing `properties` and adding `new_properties`.
    pub fn update(
        id: impl Into<AnnotationId>,
        user_id: impl Into<UserId>,
        created_at: DateTime<Utc>,
        properties: PropertyMap,
        new_properties: PropertyMap,
    ) -> Self {
        let mut datum = Self::with_kind(SuggestionKind::Update, id, user_id, created_at);
        datum.properties = Some(properties);
        datum.new_properties = Some(new_properties);
        datum
    }

    /// Mark this (block) datum as a line break.
    pub fn line_break(mut self) -> Self {
        self.is_line_break = true;
        self
    }

    pub fn is_update(&self) -> bool {
        matches!(self.kind, SuggestionKind::Update)
    }
}

// ============================================================================
// Tests
// ============================================================================
