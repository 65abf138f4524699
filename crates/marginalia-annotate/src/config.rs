//! Resolver configuration: placeholder token, key prefix and block labels.
//!
//! Loaded from RON so that labels can be localized without a rebuild. Every
//! field has a default, so a file only needs the entries it overrides:
//!
//! ```ron
//! (
//!     fallback_block_label: "saltos de línea",
//!     block_labels: {
//!         paragraph: "Párrafo",
//!         heading1: "Título 1",
//!     },
//! )
//! ```

use std::path::Path;

use indexmap::IndexMap;
use marginalia_types::{Element, ElementKind};
use serde::{Deserialize, Serialize};

/// Token standing in for a whole block inside resolved suggestion text.
pub const BLOCK_PLACEHOLDER: &str = "__block__";

/// Prefix of the per-suggestion mark key (`suggestion_<id>`).
pub const SUGGESTION_KEY_PREFIX: &str = "suggestion_";

/// Label configuration for suggestion resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Token appended to `text`/`newText` for each block-level fragment.
    pub block_placeholder: String,
    /// Prefix used to build `keyId` from a suggestion id.
    pub suggestion_key_prefix: String,
    /// Label for block kinds missing from `block_labels`.
    pub fallback_block_label: String,
    /// Label for list paragraphs.
    pub list_label: String,
    /// Label for to-do list paragraphs.
    pub todo_list_label: String,
    /// Per-kind overrides of the built-in English labels.
    pub block_labels: IndexMap<ElementKind, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            block_placeholder: BLOCK_PLACEHOLDER.to_string(),
            suggestion_key_prefix: SUGGESTION_KEY_PREFIX.to_string(),
            fallback_block_label: "line breaks".to_string(),
            list_label: "List".to_string(),
            todo_list_label: "Todo List".to_string(),
            block_labels: IndexMap::new(),
        }
    }
}

impl ResolverConfig {
    /// Parse a RON configuration string.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load a RON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path.as_ref())?;
        let config: ResolverConfig = ron::de::from_bytes(&bytes)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            labels = config.block_labels.len(),
            "loaded resolver config"
        );
        Ok(config)
    }

    /// Human-readable label for a block element.
    ///
    /// List paragraphs are labelled by list type; other kinds use the
    /// configured label, then the built-in label for kinds that have one.
    pub fn block_label(&self, element: &Element) -> &str {
        if element.kind == ElementKind::Paragraph {
            match element.list_style.as_deref() {
                Some("todo") => return &self.todo_list_label,
                Some(_) => return &self.list_label,
                None => {}
            }
        }
        if let Some(label) = self.block_labels.get(&element.kind) {
            return label;
        }
        self.builtin_label(element.kind)
    }

    fn builtin_label(&self, kind: ElementKind) -> &str {
        match kind {
            // Structural containers have no meaningful name of their own.
            ElementKind::ColumnGroup | ElementKind::Column | ElementKind::HorizontalRule => {
                &self.fallback_block_label
            }
            other => other.default_label(),
        }
    }

    /// The `keyId` for a suggestion id.
    pub fn suggestion_key(&self, id: &str) -> String {
        format!("{}{}", self.suggestion_key_prefix, id)
    }

    /// Copy of this config with every built-in label written out explicitly.
    ///
    /// Handy as a starting point for a translation file.
    pub fn with_builtin_labels(mut self) -> Self {
        for kind in ALL_KINDS {
            let label = self.builtin_label(kind).to_string();
            self.block_labels.entry(kind).or_insert(label);
        }
        self
    }
}

const ALL_KINDS: [ElementKind; 22] = [
    ElementKind::Paragraph,
    ElementKind::Heading1,
    ElementKind::Heading2,
    ElementKind::Heading3,
    ElementKind::Heading4,
    ElementKind::Heading5,
    ElementKind::Heading6,
    ElementKind::Blockquote,
    ElementKind::CodeBlock,
    ElementKind::Callout,
    ElementKind::ColumnGroup,
    ElementKind::Column,
    ElementKind::Equation,
    ElementKind::File,
    ElementKind::Image,
    ElementKind::MediaEmbed,
    ElementKind::Table,
    ElementKind::TableOfContents,
    ElementKind::Toggle,
    ElementKind::Video,
    ElementKind::Audio,
    ElementKind::HorizontalRule,
];

/// Errors that can occur when loading a resolver configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use marginalia_types::TextLeaf;

    use super::*;

    #[test]
    fn test_default_labels() {
        let config = ResolverConfig::default();
        let para = Element::paragraph(TextLeaf::new("x"));
        assert_eq!(config.block_label(&para), "Paragraph");
        assert_eq!(config.block_label(&para.clone().with_list_style("disc")), "List");
        assert_eq!(config.block_label(&para.with_list_style("todo")), "Todo List");
        assert_eq!(
            config.block_label(&Element::new(ElementKind::Heading2, vec![])),
            "Heading 2"
        );
        assert_eq!(
            config.block_label(&Element::new(ElementKind::Column, vec![])),
            "line breaks"
        );
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = ResolverConfig::from_ron(
            r#"(
                fallback_block_label: "saltos de línea",
                block_labels: { paragraph: "Párrafo" },
            )"#,
        )
        .unwrap();

        assert_eq!(config.block_placeholder, BLOCK_PLACEHOLDER);
        assert_eq!(config.list_label, "List");
        assert_eq!(
            config.block_label(&Element::paragraph(TextLeaf::new("x"))),
            "Párrafo"
        );
        assert_eq!(
            config.block_label(&Element::new(ElementKind::Column, vec![])),
            "saltos de línea"
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"(suggestion_key_prefix: "s:")"#).unwrap();

        let config = ResolverConfig::load(file.path()).unwrap();
        assert_eq!(config.suggestion_key("abc"), "s:abc");
    }

    #[test]
    fn test_bad_ron_is_an_error() {
        let err = ResolverConfig::from_ron("(block_labels: [").unwrap_err();
        assert!(matches!(err, ConfigError::Ron(_)));

        let err = ResolverConfig::load("/nonexistent/marginalia.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_shipped_labels_file_parses() {
        let config = ResolverConfig::from_ron(include_str!("../assets/labels.ron")).unwrap();
        assert_eq!(config, ResolverConfig::default().with_builtin_labels());
    }
}
