//! Suggestion coalescing: one record per tracked change shown at a block.
//!
//! A single suggestion is stored as fragments scattered over many nodes (each
//! text run it touches, plus any blocks it inserted or removed). For a block,
//! the coalescer finds the ids anchored there, gathers every fragment of each
//! id across the whole document and folds them into [`ResolvedSuggestion`]s.

use chrono::{DateTime, Utc};
use marginalia_doc::{DocumentQuery, QueryScope};
use marginalia_types::{
    AnnotationId, BlockPath, Comment, Node, PropertyMap, SuggestionDatum, SuggestionKind, UserId,
};
use serde::Serialize;

use crate::config::ResolverConfig;
use crate::registry::AnnotationRegistry;
use crate::store::DiscussionStore;

/// Shape of a resolved suggestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedKind {
    Insert,
    Remove,
    /// Removed and inserted text under one id.
    Replace,
    /// Mark properties changed.
    Update,
}

impl ResolvedKind {
    /// Rank used when several records share an id; higher wins.
    pub fn priority(&self) -> u8 {
        match self {
            ResolvedKind::Update => 3,
            ResolvedKind::Replace => 2,
            ResolvedKind::Insert => 1,
            ResolvedKind::Remove => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedKind::Insert => "insert",
            ResolvedKind::Remove => "remove",
            ResolvedKind::Replace => "replace",
            ResolvedKind::Update => "update",
        }
    }
}

impl std::fmt::Display for ResolvedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A coalesced suggestion, ready for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSuggestion {
    pub suggestion_id: AnnotationId,
    /// Mark key of this suggestion (`suggestion_<id>`).
    pub key_id: String,
    #[serde(rename = "type")]
    pub kind: ResolvedKind,
    /// Removed text (`remove`, `replace`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inserted text (`insert`, `replace`, `update`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_text: Option<String>,
    /// Removed mark properties (`update`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyMap>,
    /// Added mark properties (`update`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_properties: Option<PropertyMap>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    /// Replies attached to this suggestion.
    pub comments: Vec<Comment>,
}

/// Resolve the suggestions anchored at `block`.
///
/// Updates `registry` with every id observed under `block`. Ids anchored
/// elsewhere, and ids whose fragments cannot be coalesced, are skipped.
pub fn resolve_suggestions<D: DocumentQuery + ?Sized>(
    doc: &D,
    registry: &mut AnnotationRegistry,
    discussions: &DiscussionStore,
    config: &ResolverConfig,
    block: &BlockPath,
) -> Vec<ResolvedSuggestion> {
    let nodes = doc.query_nodes(block, QueryScope::Subtree, &Node::has_suggestion);

    let mut ids: Vec<&AnnotationId> = Vec::new();
    for (node, _) in &nodes {
        for id in extract_ids(node) {
            registry.reconcile_with(id, block, |old| suggestion_live_at(doc, id, old));
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }

    ids.into_iter()
        .filter(|id| registry.is_anchored_at(id, block))
        .flat_map(|id| coalesce(doc, discussions, config, id))
        .collect()
}

/// Ids a node contributes. Update data shadow the other data on the node.
fn extract_ids(node: &Node) -> Vec<&AnnotationId> {
    let data = node.suggestion_data();
    let has_update = data.iter().any(|d| d.is_update());

    let mut ids: Vec<&AnnotationId> = Vec::new();
    for datum in data {
        if has_update && !datum.is_update() {
            continue;
        }
        if !ids.contains(&&datum.id) {
            ids.push(&datum.id);
        }
    }
    ids
}

/// Whether a fragment of `id` remains at the block `old`.
fn suggestion_live_at<D: DocumentQuery + ?Sized>(
    doc: &D,
    id: &AnnotationId,
    old: &BlockPath,
) -> bool {
    doc.any_node(old, QueryScope::Subtree, &|node| node.references_suggestion(id))
}

#[derive(Default)]
struct Accumulator {
    text: String,
    new_text: String,
    properties: PropertyMap,
    new_properties: PropertyMap,
    saw_update: bool,
}

impl Accumulator {
    fn merge_update(&mut self, datum: &SuggestionDatum) {
        self.saw_update = true;
        if let Some(props) = &datum.properties {
            self.properties
                .extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Some(props) = &datum.new_properties {
            self.new_properties
                .extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }

    fn push_block(&mut self, datum: &SuggestionDatum, label: &str, config: &ResolverConfig) {
        let target = match datum.kind {
            SuggestionKind::Insert => &mut self.new_text,
            SuggestionKind::Remove => &mut self.text,
            SuggestionKind::Update => {
                self.merge_update(datum);
                return;
            }
        };
        target.push_str(&config.block_placeholder);
        if !datum.is_line_break {
            target.push_str(label);
        }
    }
}

/// Fold every fragment of `id` into its resolved records.
fn coalesce<D: DocumentQuery + ?Sized>(
    doc: &D,
    discussions: &DiscussionStore,
    config: &ResolverConfig,
    id: &AnnotationId,
) -> Vec<ResolvedSuggestion> {
    let mut fragments = doc.query_nodes(&BlockPath::root(), QueryScope::WholeDocument, &|node| {
        node.references_suggestion(id)
    });
    if fragments.is_empty() {
        tracing::debug!(%id, "suggestion has no fragments in the document; skipping");
        return Vec::new();
    }
    fragments.sort_by(|(_, a), (_, b)| a.post_order_cmp(b));

    let mut acc = Accumulator::default();
    for (node, _) in &fragments {
        match node {
            Node::Text(leaf) => {
                let mut inserted = false;
                for datum in leaf.suggestions.iter().filter(|d| &d.id == id) {
                    match datum.kind {
                        SuggestionKind::Remove => acc.text.push_str(&leaf.text),
                        SuggestionKind::Insert => inserted = true,
                        SuggestionKind::Update => {
                            acc.merge_update(datum);
                            inserted = true;
                        }
                    }
                }
                // A run carrying both insert and update data is one run of new text.
                if inserted {
                    acc.new_text.push_str(&leaf.text);
                }
            }
            Node::Element(element) => {
                if let Some(datum) = element.suggestion.as_ref().filter(|d| &d.id == id) {
                    acc.push_block(datum, config.block_label(element), config);
                }
            }
        }
    }

    let Some(lead) = lead_datum(fragments[0].0, id) else {
        tracing::debug!(%id, "no lead datum for suggestion; skipping");
        return Vec::new();
    };

    let record = |kind: ResolvedKind| ResolvedSuggestion {
        suggestion_id: id.clone(),
        key_id: config.suggestion_key(id.as_str()),
        kind,
        text: None,
        new_text: None,
        properties: None,
        new_properties: None,
        user_id: lead.user_id.clone(),
        created_at: lead.created_at,
        comments: discussions.comments_for(id).to_vec(),
    };

    let has_text = !acc.text.is_empty();
    let has_new_text = !acc.new_text.is_empty();
    let replace = has_text && has_new_text;

    let mut out = Vec::new();
    if acc.saw_update {
        out.push(ResolvedSuggestion {
            properties: Some(acc.properties.clone()),
            new_properties: Some(acc.new_properties.clone()),
            new_text: Some(acc.new_text.clone()),
            ..record(ResolvedKind::Update)
        });
    }
    if replace {
        out.push(ResolvedSuggestion {
            text: Some(acc.text.clone()),
            new_text: Some(acc.new_text.clone()),
            ..record(ResolvedKind::Replace)
        });
    }
    if has_new_text && !replace {
        out.push(ResolvedSuggestion {
            new_text: Some(acc.new_text.clone()),
            ..record(ResolvedKind::Insert)
        });
    }
    if has_text && !replace {
        out.push(ResolvedSuggestion {
            text: Some(acc.text.clone()),
            ..record(ResolvedKind::Remove)
        });
    }
    out
}

/// The datum supplying author and timestamp: first match on the node, an
/// update datum if there is one.
fn lead_datum<'a>(node: &'a Node, id: &AnnotationId) -> Option<&'a SuggestionDatum> {
    let matching: Vec<&SuggestionDatum> = node
        .suggestion_data()
        .into_iter()
        .filter(|d| &d.id == id)
        .collect();
    matching
        .iter()
        .find(|d| d.is_update())
        .or(matching.first())
        .copied()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use marginalia_doc::Document;
    use marginalia_types::{Element, ElementKind, TextLeaf};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_740_000_000 + secs, 0).unwrap()
    }

    fn resolve(doc: &Document, reg: &mut AnnotationRegistry, block: usize) -> Vec<ResolvedSuggestion> {
        resolve_suggestions(
            doc,
            reg,
            &DiscussionStore::new(),
            &ResolverConfig::default(),
            &BlockPath::from([block]),
        )
    }

    fn kinds(records: &[ResolvedSuggestion]) -> Vec<ResolvedKind> {
        records.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_plain_insert() {
        let doc = Document::new(vec![
            Element::new(
                ElementKind::Paragraph,
                vec![
                    Node::text("Hello "),
                    TextLeaf::new("brave ")
                        .with_suggestion(SuggestionDatum::insert("s1", "amy", at(0)))
                        .into(),
                    Node::text("world"),
                ],
            )
            .into(),
        ]);
        let mut reg = AnnotationRegistry::new();
        let out = resolve(&doc, &mut reg, 0);

        assert_eq!(kinds(&out), vec![ResolvedKind::Insert]);
        assert_eq!(out[0].new_text.as_deref(), Some("brave "));
        assert_eq!(out[0].text, None);
        assert_eq!(out[0].key_id, "suggestion_s1");
        assert_eq!(out[0].user_id, UserId::new("amy"));
    }

    #[test]
    fn test_remove_and_insert_make_replace() {
        let doc = Document::new(vec![
            Element::new(
                ElementKind::Paragraph,
                vec![
                    TextLeaf::new("cat")
                        .with_suggestion(SuggestionDatum::remove("s1", "amy", at(0)))
                        .into(),
                    TextLeaf::new("dog")
                        .with_suggestion(SuggestionDatum::insert("s1", "amy", at(0)))
                        .into(),
                ],
            )
            .into(),
        ]);
        let out = resolve(&doc, &mut AnnotationRegistry::new(), 0);

        assert_eq!(kinds(&out), vec![ResolvedKind::Replace]);
        assert_eq!(out[0].text.as_deref(), Some("cat"));
        assert_eq!(out[0].new_text.as_deref(), Some("dog"));
    }

    #[test]
    fn test_block_fragments_use_placeholder_and_label() {
        let doc = Document::new(vec![
            Element::paragraph(TextLeaf::new("keep")).into(),
            Element::new(ElementKind::Heading2, vec![Node::text("")])
                .with_suggestion(SuggestionDatum::insert("s1", "amy", at(0)))
                .into(),
            Element::paragraph(TextLeaf::new(""))
                .with_suggestion(SuggestionDatum::insert("s1", "amy", at(0)).line_break())
                .into(),
        ]);
        let out = resolve(&doc, &mut AnnotationRegistry::new(), 1);

        assert_eq!(kinds(&out), vec![ResolvedKind::Insert]);
        assert_eq!(
            out[0].new_text.as_deref(),
            Some("__block__Heading 2__block__")
        );
    }

    #[test]
    fn test_update_merges_properties_in_order() {
        let first = SuggestionDatum::update(
            "u1",
            "amy",
            at(5),
            PropertyMap::from([("italic".to_string(), json!(true))]),
            PropertyMap::from([("bold".to_string(), json!(true))]),
        );
        let second = SuggestionDatum::update(
            "u1",
            "amy",
            at(6),
            PropertyMap::new(),
            PropertyMap::from([
                ("underline".to_string(), json!(true)),
                ("bold".to_string(), json!(false)),
            ]),
        );
        let doc = Document::new(vec![
            Element::new(
                ElementKind::Paragraph,
                vec![
                    TextLeaf::new("ab").with_suggestion(first).into(),
                    TextLeaf::new("cd").with_suggestion(second).into(),
                ],
            )
            .into(),
        ]);
        let out = resolve(&doc, &mut AnnotationRegistry::new(), 0);

        // Update-only text also yields an insert record; the merge drops it.
        assert_eq!(kinds(&out), vec![ResolvedKind::Update, ResolvedKind::Insert]);
        let update = &out[0];
        assert_eq!(update.new_text.as_deref(), Some("abcd"));
        let keys: Vec<&str> = update
            .new_properties
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["bold", "underline"]);
        assert_eq!(update.new_properties.as_ref().unwrap()["bold"], json!(false));
        assert_eq!(update.created_at, at(5));
    }

    #[test]
    fn test_update_shadows_other_ids_on_node() {
        let doc = Document::new(vec![
            Element::paragraph(
                TextLeaf::new("x")
                    .with_suggestion(SuggestionDatum::insert("ins", "amy", at(0)))
                    .with_suggestion(SuggestionDatum::update(
                        "upd",
                        "bo",
                        at(1),
                        PropertyMap::new(),
                        PropertyMap::from([("bold".to_string(), json!(true))]),
                    )),
            )
            .into(),
        ]);
        let mut reg = AnnotationRegistry::new();
        let out = resolve(&doc, &mut reg, 0);

        assert!(out.iter().all(|r| r.suggestion_id == AnnotationId::new("upd")));
        assert_eq!(reg.get(&AnnotationId::new("ins")), None);
    }

    #[test]
    fn test_lead_datum_prefers_update() {
        let leaf = TextLeaf::new("x")
            .with_suggestion(SuggestionDatum::insert("s", "amy", at(0)))
            .with_suggestion(SuggestionDatum::update(
                "s",
                "bo",
                at(9),
                PropertyMap::new(),
                PropertyMap::new(),
            ));
        let node: Node = leaf.into();
        let lead = lead_datum(&node, &AnnotationId::new("s")).unwrap();
        assert_eq!(lead.user_id, UserId::new("bo"));
        assert_eq!(lead_datum(&node, &AnnotationId::new("zz")), None);
    }

    #[test]
    fn test_ids_anchored_elsewhere_are_skipped() {
        let removed = || {
            TextLeaf::new("gone").with_suggestion(SuggestionDatum::remove("s1", "amy", at(0)))
        };
        let doc = Document::new(vec![
            Element::paragraph(removed()).into(),
            Element::paragraph(removed()).into(),
        ]);
        let mut reg = AnnotationRegistry::new();

        let first = resolve(&doc, &mut reg, 0);
        let second = resolve(&doc, &mut reg, 1);

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].text.as_deref(), Some("gonegone"));
        assert!(second.is_empty());
    }

    #[test]
    fn test_nested_block_datum_counts_as_live() {
        let nested = Element::paragraph(TextLeaf::new("row"))
            .with_suggestion(SuggestionDatum::insert("s1", "amy", at(0)));
        let doc = Document::new(vec![
            Element::new(ElementKind::Table, vec![nested.into()]).into(),
            Element::paragraph(
                TextLeaf::new("tail").with_suggestion(SuggestionDatum::insert("s1", "amy", at(0))),
            )
            .into(),
        ]);
        assert!(suggestion_live_at(&doc, &AnnotationId::new("s1"), &BlockPath::from([0])));

        let mut reg = AnnotationRegistry::new();
        assert_eq!(resolve(&doc, &mut reg, 0).len(), 1);
        assert!(resolve(&doc, &mut reg, 1).is_empty());
        assert_eq!(reg.get(&AnnotationId::new("s1")), Some(&BlockPath::from([0])));
    }

    #[test]
    fn test_comments_attached_from_store() {
        let doc = Document::new(vec![
            Element::paragraph(
                TextLeaf::new("x").with_suggestion(SuggestionDatum::insert("s1", "amy", at(0))),
            )
            .into(),
        ]);
        let mut store = DiscussionStore::new();
        store.insert(marginalia_types::Discussion::new("s1".into(), "bo".into(), at(1)));
        store
            .add_comment(&"s1".into(), "bo".into(), json!("why?"), at(2))
            .unwrap();

        let out = resolve_suggestions(
            &doc,
            &mut AnnotationRegistry::new(),
            &store,
            &ResolverConfig::default(),
            &BlockPath::from([0]),
        );
        assert_eq!(out[0].comments.len(), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let doc = Document::new(vec![
            Element::paragraph(
                TextLeaf::new("x").with_suggestion(SuggestionDatum::remove("s1", "amy", at(0))),
            )
            .into(),
        ]);
        let out = resolve(&doc, &mut AnnotationRegistry::new(), 0);
        let json = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(json["type"], "remove");
        assert_eq!(json["suggestionId"], "s1");
        assert_eq!(json["keyId"], "suggestion_s1");
        assert!(json.get("newText").is_none());
    }
}
