//! In-memory annotated document.
//!
//! A plain tree of [`Node`]s rooted in an implicit document node. It stands in
//! for the editing engine: enough structure to address nodes by path, walk
//! them in document order and apply the handful of mutations the annotation
//! layer performs itself (draft comment markers). Keystroke-level editing is
//! someone else's job.
//!
//! # Structure
//!
//! ```text
//! Document (root, path [])
//! ├── Element [0] paragraph          ← a block
//! │   ├── Text [0, 0] "Hello "
//! │   └── Text [0, 1] "world"        (suggestions: remove s1)
//! └── Element [1] blockquote         ← a block
//!     └── Element [1, 0] paragraph
//!         └── Text [1, 0, 0] "quoted" (comments: t1)
//! ```

use marginalia_types::{AnnotationId, BlockPath, Node};
use serde::{Deserialize, Serialize};

use crate::{DocError, Result};

/// Root of an annotated document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    children: Vec<Node>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a document from JSON (`{"children": [...]}`).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Top-level nodes.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Node at `path`. The root path addresses no node.
    pub fn get(&self, path: &BlockPath) -> Option<&Node> {
        let (first, rest) = path.as_slice().split_first()?;
        let mut node = self.children.get(*first)?;
        for &idx in rest {
            node = node.children().get(idx)?;
        }
        Some(node)
    }

    fn get_mut(&mut self, path: &BlockPath) -> Option<&mut Node> {
        let (first, rest) = path.as_slice().split_first()?;
        let mut node = self.children.get_mut(*first)?;
        for &idx in rest {
            node = node.children_mut()?.get_mut(idx)?;
        }
        Some(node)
    }

    /// Children vector of the node at `path` (the root's for the empty path).
    fn children_at_mut(&mut self, path: &BlockPath) -> Result<&mut Vec<Node>> {
        if path.is_root() {
            return Ok(&mut self.children);
        }
        let node = self
            .get_mut(path)
            .ok_or_else(|| DocError::PathOutOfBounds(path.clone()))?;
        node.children_mut()
            .ok_or_else(|| DocError::NotAnElement(path.clone()))
    }

    /// Iterate all nodes in document order (pre-order) with their paths.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::new(&self.children, BlockPath::root())
    }

    /// Iterate the node at `anchor` and everything beneath it, in document order.
    ///
    /// The root anchor yields the whole document.
    pub fn subtree(&self, anchor: &BlockPath) -> Descendants<'_> {
        if anchor.is_root() {
            return self.descendants();
        }
        match self.get(anchor) {
            Some(node) => Descendants::single(node, anchor.clone()),
            None => Descendants::empty(),
        }
    }

    /// Concatenated text of the whole document, blocks separated by newlines.
    pub fn full_text(&self) -> String {
        self.children
            .iter()
            .map(Node::text_content)
            .collect::<Vec<_>>()
            .join("\n")
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert `node` so that it ends up at `path`, shifting later siblings.
    pub fn insert_node(&mut self, path: &BlockPath, node: Node) -> Result<()> {
        let (&index, _) = path.as_slice().split_last().ok_or(DocError::RootPath)?;
        let parent = path.parent().unwrap_or_default();
        let siblings = self.children_at_mut(&parent)?;
        if index > siblings.len() {
            return Err(DocError::PathOutOfBounds(path.clone()));
        }
        siblings.insert(index, node);
        Ok(())
    }

    /// Remove and return the node at `path`.
    pub fn remove_node(&mut self, path: &BlockPath) -> Result<Node> {
        let (&index, _) = path.as_slice().split_last().ok_or(DocError::RootPath)?;
        let parent = path.parent().unwrap_or_default();
        let siblings = self.children_at_mut(&parent)?;
        if index >= siblings.len() {
            return Err(DocError::PathOutOfBounds(path.clone()));
        }
        Ok(siblings.remove(index))
    }

    /// Replace the node at `path`, returning the old one.
    pub fn replace_node(&mut self, path: &BlockPath, node: Node) -> Result<Node> {
        if path.is_root() {
            return Err(DocError::RootPath);
        }
        let slot = self
            .get_mut(path)
            .ok_or_else(|| DocError::PathOutOfBounds(path.clone()))?;
        Ok(std::mem::replace(slot, node))
    }

    /// Text covered by the draft comment, in document order.
    pub fn draft_text(&self) -> String {
        self.descendants()
            .filter_map(|(node, _)| node.as_text())
            .filter(|leaf| leaf.draft_comment)
            .map(|leaf| leaf.text.as_str())
            .collect()
    }

    /// Clear every draft comment marker. Returns how many leaves changed.
    pub fn discard_draft_comment(&mut self) -> usize {
        let changed = self.for_each_leaf_mut(|leaf| std::mem::take(&mut leaf.draft_comment));
        if changed > 0 {
            tracing::debug!(leaves = changed, "discarded draft comment markers");
        }
        changed
    }

    /// Turn draft comment markers into markers for thread `id`.
    ///
    /// Returns how many leaves were promoted.
    pub fn promote_draft_comment(&mut self, id: &AnnotationId) -> usize {
        self.for_each_leaf_mut(|leaf| {
            if !leaf.draft_comment {
                return false;
            }
            leaf.draft_comment = false;
            if !leaf.comments.contains(id) {
                leaf.comments.push(id.clone());
            }
            true
        })
    }

    /// Apply `f` to every text leaf; count the leaves for which it returned true.
    fn for_each_leaf_mut(
        &mut self,
        mut f: impl FnMut(&mut marginalia_types::TextLeaf) -> bool,
    ) -> usize {
        let mut changed = 0;
        let mut stack: Vec<&mut Node> = self.children.iter_mut().rev().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Text(leaf) => {
                    if f(leaf) {
                        changed += 1;
                    }
                }
                Node::Element(element) => stack.extend(element.children.iter_mut().rev()),
            }
        }
        changed
    }
}

/// Pre-order iterator over nodes with their paths.
pub struct Descendants<'a> {
    stack: Vec<(&'a Node, BlockPath)>,
}

impl<'a> Descendants<'a> {
    fn new(children: &'a [Node], parent: BlockPath) -> Self {
        // Push in reverse so the first child pops first
        let stack = children
            .iter()
            .enumerate()
            .rev()
            .map(|(idx, node)| (node, parent.child(idx)))
            .collect();
        Self { stack }
    }

    fn single(node: &'a Node, path: BlockPath) -> Self {
        Self {
            stack: vec![(node, path)],
        }
    }

    fn empty() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (&'a Node, BlockPath);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, path) = self.stack.pop()?;
        for (idx, child) in node.children().iter().enumerate().rev() {
            self.stack.push((child, path.child(idx)));
        }
        Some((node, path))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use marginalia_types::{Element, ElementKind, TextLeaf};
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> Document {
        Document::new(vec![
            Element::new(
                ElementKind::Paragraph,
                vec![Node::text("Hello "), Node::text("world")],
            )
            .into(),
            Element::new(
                ElementKind::Blockquote,
                vec![Element::paragraph(TextLeaf::new("quoted").with_draft_comment()).into()],
            )
            .into(),
        ])
    }

    #[test]
    fn test_get_by_path() {
        let doc = sample();
        assert_eq!(doc.get(&BlockPath::from([0, 1])).map(Node::text_content), Some("world".into()));
        assert_eq!(doc.get(&BlockPath::from([1, 0, 0])).map(Node::text_content), Some("quoted".into()));
        assert!(doc.get(&BlockPath::root()).is_none());
        assert!(doc.get(&BlockPath::from([5])).is_none());
        assert!(doc.get(&BlockPath::from([0, 0, 0])).is_none());
    }

    #[test]
    fn test_descendants_in_document_order() {
        let doc = sample();
        let paths: Vec<String> = doc.descendants().map(|(_, p)| p.to_string()).collect();
        assert_eq!(paths, vec!["0", "0.0", "0.1", "1", "1.0", "1.0.0"]);
    }

    #[test]
    fn test_subtree_includes_anchor() {
        let doc = sample();
        let paths: Vec<String> = doc
            .subtree(&BlockPath::from([1]))
            .map(|(_, p)| p.to_string())
            .collect();
        assert_eq!(paths, vec!["1", "1.0", "1.0.0"]);
        assert_eq!(doc.subtree(&BlockPath::from([9])).count(), 0);
        assert_eq!(doc.subtree(&BlockPath::root()).count(), 6);
    }

    #[test]
    fn test_insert_remove_replace() {
        let mut doc = sample();

        doc.insert_node(&BlockPath::from([0]), Element::paragraph(TextLeaf::new("first")).into())
            .unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.full_text(), "first\nHello world\nquoted");

        let removed = doc.remove_node(&BlockPath::from([1, 1])).unwrap();
        assert_eq!(removed.text_content(), "world");

        doc.replace_node(&BlockPath::from([1, 0]), Node::text("Bye")).unwrap();
        assert_eq!(doc.full_text(), "first\nBye\nquoted");

        assert!(matches!(doc.remove_node(&BlockPath::root()), Err(DocError::RootPath)));
        assert!(matches!(
            doc.insert_node(&BlockPath::from([0, 0, 0]), Node::text("x")),
            Err(DocError::NotAnElement(_))
        ));
        assert!(matches!(
            doc.remove_node(&BlockPath::from([7])),
            Err(DocError::PathOutOfBounds(_))
        ));
    }

    #[test]
    fn test_draft_markers() {
        let mut doc = sample();
        assert_eq!(doc.draft_text(), "quoted");

        let id = AnnotationId::new("t9");
        assert_eq!(doc.promote_draft_comment(&id), 1);
        assert_eq!(doc.draft_text(), "");
        let leaf = doc.get(&BlockPath::from([1, 0, 0])).unwrap();
        assert!(leaf.references_comment(&id));

        let mut other = sample();
        assert_eq!(other.discard_draft_comment(), 1);
        assert_eq!(other.discard_draft_comment(), 0);
    }

    #[test]
    fn test_json_roundtrip() {
        let doc = sample();
        let json = doc.to_json().unwrap();
        let parsed = Document::from_json(&json).unwrap();
        assert_eq!(parsed, doc);
    }
}
