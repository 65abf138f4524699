//! The narrow read interface annotation resolution needs from an editor.
//!
//! Resolution never walks an editor's internals directly. It asks for nodes by
//! path, for filtered node lists under an anchor or across the document, and
//! for the list of blocks in document order. Any editing engine can sit behind
//! this trait; [`Document`] is the in-memory implementation.

use marginalia_types::{BlockPath, Node};

use crate::Document;

/// How far a node query reaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryScope {
    /// The anchor node and its descendants.
    Subtree,
    /// Every node in the document; the anchor is ignored.
    WholeDocument,
}

/// Read access to an annotated document tree.
pub trait DocumentQuery {
    /// Node at `path`, if any.
    fn node(&self, path: &BlockPath) -> Option<&Node>;

    /// Matching nodes with their paths, in document order.
    fn query_nodes(
        &self,
        anchor: &BlockPath,
        scope: QueryScope,
        predicate: &dyn Fn(&Node) -> bool,
    ) -> Vec<(&Node, BlockPath)>;

    /// Paths of the blocks that display annotation summaries, in document order.
    ///
    /// Blocks are the top-level elements. Nested elements (table cells,
    /// columns, quoted paragraphs) report to their top-level block so that a
    /// table does not render one summary per cell.
    fn blocks(&self) -> Vec<BlockPath>;

    /// The block owning the node at `path`.
    fn owning_block_path(&self, path: &BlockPath) -> Option<BlockPath> {
        let block = path.ancestor_at(1)?;
        match self.node(&block) {
            Some(Node::Element(_)) => Some(block),
            _ => None,
        }
    }

    /// Whether any node matches.
    fn any_node(
        &self,
        anchor: &BlockPath,
        scope: QueryScope,
        predicate: &dyn Fn(&Node) -> bool,
    ) -> bool {
        !self.query_nodes(anchor, scope, predicate).is_empty()
    }
}

impl DocumentQuery for Document {
    fn node(&self, path: &BlockPath) -> Option<&Node> {
        self.get(path)
    }

    fn query_nodes(
        &self,
        anchor: &BlockPath,
        scope: QueryScope,
        predicate: &dyn Fn(&Node) -> bool,
    ) -> Vec<(&Node, BlockPath)> {
        let nodes = match scope {
            QueryScope::Subtree => self.subtree(anchor),
            QueryScope::WholeDocument => self.descendants(),
        };
        nodes.filter(|(node, _)| predicate(*node)).collect()
    }

    fn blocks(&self) -> Vec<BlockPath> {
        self.children()
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_element())
            .map(|(idx, _)| BlockPath::from([idx]))
            .collect()
    }

    fn any_node(
        &self,
        anchor: &BlockPath,
        scope: QueryScope,
        predicate: &dyn Fn(&Node) -> bool,
    ) -> bool {
        let mut nodes = match scope {
            QueryScope::Subtree => self.subtree(anchor),
            QueryScope::WholeDocument => self.descendants(),
        };
        nodes.any(|(node, _)| predicate(node))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use marginalia_types::{Element, ElementKind, TextLeaf};

    use super::*;

    fn sample() -> Document {
        Document::new(vec![
            Element::paragraph(TextLeaf::new("one").with_comment("t1")).into(),
            Node::text("stray"),
            Element::new(
                ElementKind::Table,
                vec![Element::paragraph(TextLeaf::new("cell").with_comment("t1")).into()],
            )
            .into(),
        ])
    }

    #[test]
    fn test_blocks_are_top_level_elements() {
        let doc = sample();
        assert_eq!(doc.blocks(), vec![BlockPath::from([0]), BlockPath::from([2])]);
    }

    #[test]
    fn test_owning_block_path() {
        let doc = sample();
        assert_eq!(
            doc.owning_block_path(&BlockPath::from([2, 0, 0])),
            Some(BlockPath::from([2]))
        );
        assert_eq!(doc.owning_block_path(&BlockPath::from([1])), None);
        assert_eq!(doc.owning_block_path(&BlockPath::root()), None);
    }

    #[test]
    fn test_query_scopes() {
        let doc = sample();
        let commented = |n: &Node| n.has_comment();

        let local = doc.query_nodes(&BlockPath::from([2]), QueryScope::Subtree, &commented);
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].1, BlockPath::from([2, 0, 0]));

        let all = doc.query_nodes(&BlockPath::from([2]), QueryScope::WholeDocument, &commented);
        let paths: Vec<_> = all.into_iter().map(|(_, p)| p).collect();
        assert_eq!(paths, vec![BlockPath::from([0, 0]), BlockPath::from([2, 0, 0])]);

        assert!(doc.any_node(&BlockPath::from([0]), QueryScope::Subtree, &commented));
        assert!(!doc.any_node(&BlockPath::from([1]), QueryScope::Subtree, &commented));
    }
}
