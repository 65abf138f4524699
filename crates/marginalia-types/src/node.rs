//! Document nodes: text leaves and block elements.
//!
//! Nodes are a plain tagged union. Annotations live *on* the nodes as data:
//! a leaf lists the suggestion data and comment thread ids covering its text,
//! an element may carry one block-level suggestion datum.

use serde::{Deserialize, Serialize};

use crate::block::ElementKind;
use crate::ids::AnnotationId;
use crate::suggestion::{PropertyMap, SuggestionDatum};

/// A node in the document tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Text(TextLeaf),
    Element(Element),
}

/// A run of text with uniform marks and annotations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextLeaf {
    pub text: String,
    /// Formatting marks (bold, italic, ...).
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub marks: PropertyMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<SuggestionDatum>,
    /// Persisted comment threads covering this text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<AnnotationId>,
    /// Covered by the in-progress draft comment.
    #[serde(default)]
    pub draft_comment: bool,
}

/// A block (or inline container) element.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    /// List style for list paragraphs (`disc`, `decimal`, `todo`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_style: Option<String>,
    /// Block-level suggestion (block inserted/removed, or line break).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<SuggestionDatum>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl TextLeaf {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Builder: add a suggestion datum.
    pub fn with_suggestion(mut self, datum: SuggestionDatum) -> Self {
        self.suggestions.push(datum);
        self
    }

    /// Builder: add a comment thread id.
    pub fn with_comment(mut self, id: impl Into<AnnotationId>) -> Self {
        self.comments.push(id.into());
        self
    }

    /// Builder: mark as covered by the draft comment.
    pub fn with_draft_comment(mut self) -> Self {
        self.draft_comment = true;
        self
    }

    /// Builder: set a formatting mark.
    pub fn with_mark(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.marks.insert(key.into(), value);
        self
    }
}

impl Element {
    pub fn new(kind: ElementKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            children,
            ..Default::default()
        }
    }

    /// A paragraph holding a single text leaf.
    pub fn paragraph(leaf: TextLeaf) -> Self {
        Self::new(ElementKind::Paragraph, vec![Node::Text(leaf)])
    }

    /// Builder: attach a block-level suggestion.
    pub fn with_suggestion(mut self, datum: SuggestionDatum) -> Self {
        self.suggestion = Some(datum);
        self
    }

    /// Builder: set the list style.
    pub fn with_list_style(mut self, style: impl Into<String>) -> Self {
        self.list_style = Some(style.into());
        self
    }
}

impl From<TextLeaf> for Node {
    fn from(leaf: TextLeaf) -> Self {
        Node::Text(leaf)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(TextLeaf::new(text))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn as_text(&self) -> Option<&TextLeaf> {
        match self {
            Node::Text(leaf) => Some(leaf),
            Node::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(element) => &element.children,
            Node::Text(_) => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Element(element) => Some(&mut element.children),
            Node::Text(_) => None,
        }
    }

    // ── Suggestions ─────────────────────────────────────────────────────────

    /// All suggestion data on this node.
    pub fn suggestion_data(&self) -> Vec<&SuggestionDatum> {
        match self {
            Node::Text(leaf) => leaf.suggestions.iter().collect(),
            Node::Element(element) => element.suggestion.iter().collect(),
        }
    }

    /// Whether this node carries any suggestion data.
    pub fn has_suggestion(&self) -> bool {
        match self {
            Node::Text(leaf) => !leaf.suggestions.is_empty(),
            Node::Element(element) => element.suggestion.is_some(),
        }
    }

    /// Primary suggestion id: the first datum of a leaf, the datum of an element.
    pub fn suggestion_id(&self) -> Option<&AnnotationId> {
        match self {
            Node::Text(leaf) => leaf.suggestions.first().map(|d| &d.id),
            Node::Element(element) => element.suggestion.as_ref().map(|d| &d.id),
        }
    }

    /// Whether any suggestion datum on this node has the given id.
    pub fn references_suggestion(&self, id: &AnnotationId) -> bool {
        match self {
            Node::Text(leaf) => leaf.suggestions.iter().any(|d| &d.id == id),
            Node::Element(element) => element.suggestion.as_ref().is_some_and(|d| &d.id == id),
        }
    }

    // ── Comments ────────────────────────────────────────────────────────────

    /// Whether this node carries a comment marker (persisted or draft).
    pub fn has_comment(&self) -> bool {
        match self {
            Node::Text(leaf) => !leaf.comments.is_empty() || leaf.draft_comment,
            Node::Element(_) => false,
        }
    }

    /// Thread id of this node: the first persisted thread, else the draft id.
    pub fn comment_thread_id(&self) -> Option<AnnotationId> {
        let leaf = self.as_text()?;
        match leaf.comments.first() {
            Some(id) => Some(id.clone()),
            None if leaf.draft_comment => Some(AnnotationId::draft()),
            None => None,
        }
    }

    /// Every thread covering this node: the persisted threads, or the draft
    /// when there are none.
    pub fn comment_thread_ids(&self) -> Vec<AnnotationId> {
        let Some(leaf) = self.as_text() else {
            return Vec::new();
        };
        if leaf.comments.is_empty() && leaf.draft_comment {
            return vec![AnnotationId::draft()];
        }
        leaf.comments.clone()
    }

    /// Whether this node is covered by the given comment thread.
    pub fn references_comment(&self, id: &AnnotationId) -> bool {
        match self {
            Node::Text(leaf) => {
                if id.is_draft() {
                    leaf.draft_comment
                } else {
                    leaf.comments.contains(id)
                }
            }
            Node::Element(_) => false,
        }
    }

    // ── Content ─────────────────────────────────────────────────────────────

    /// Concatenated text of this node's subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Node::Text(leaf) => out.push_str(&leaf.text),
            Node::Element(element) => {
                for child in &element.children {
                    child.push_text(out);
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    fn at() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn test_leaf_suggestion_accessors() {
        let node: Node = TextLeaf::new("hi")
            .with_suggestion(SuggestionDatum::insert("a", "amy", at()))
            .with_suggestion(SuggestionDatum::remove("b", "amy", at()))
            .into();

        assert!(node.has_suggestion());
        assert_eq!(node.suggestion_id(), Some(&AnnotationId::new("a")));
        assert!(node.references_suggestion(&AnnotationId::new("b")));
        assert!(!node.references_suggestion(&AnnotationId::new("c")));
        assert_eq!(node.suggestion_data().len(), 2);
    }

    #[test]
    fn test_element_suggestion_accessors() {
        let node: Node = Element::paragraph(TextLeaf::new("x"))
            .with_suggestion(SuggestionDatum::remove("s", "amy", at()).line_break())
            .into();
        assert_eq!(node.suggestion_id(), Some(&AnnotationId::new("s")));
        assert!(!node.has_comment());
    }

    #[test]
    fn test_comment_thread_id_prefers_persisted() {
        let both: Node = TextLeaf::new("x").with_comment("t1").with_draft_comment().into();
        assert_eq!(both.comment_thread_id(), Some(AnnotationId::new("t1")));

        let nested: Node = TextLeaf::new("x").with_comment("t1").with_comment("t2").into();
        assert_eq!(
            nested.comment_thread_ids(),
            vec![AnnotationId::new("t1"), AnnotationId::new("t2")]
        );

        let draft: Node = TextLeaf::new("x").with_draft_comment().into();
        assert_eq!(draft.comment_thread_id(), Some(AnnotationId::draft()));
        assert_eq!(draft.comment_thread_ids(), vec![AnnotationId::draft()]);
        assert!(draft.references_comment(&AnnotationId::draft()));

        let plain = Node::text("x");
        assert_eq!(plain.comment_thread_id(), None);
        assert!(!plain.has_comment());
    }

    #[test]
    fn test_text_content() {
        let node: Node = Element::new(
            ElementKind::Blockquote,
            vec![Node::text("Hello "), Element::paragraph(TextLeaf::new("world")).into()],
        )
        .into();
        assert_eq!(node.text_content(), "Hello world");
    }

    #[test]
    fn test_json_shape() {
        let node: Node = Element::paragraph(TextLeaf::new("hi").with_comment("t1")).into();
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["node"], "element");
        assert_eq!(json["kind"], "paragraph");
        assert_eq!(json["children"][0]["node"], "text");
        assert_eq!(json["children"][0]["comments"][0], "t1");

        let parsed: Node = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, node);
    }
}
