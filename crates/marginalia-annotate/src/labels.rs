//! Display text for annotation cards.

use chrono::{DateTime, Utc};
use marginalia_types::PropertyMap;
use serde_json::Value;

use crate::config::ResolverConfig;

/// Split resolved suggestion text into display lines.
///
/// Each placeholder token starts a new line; the label that follows it (if
/// any) becomes that line's text. Empty leading text is dropped.
pub fn placeholder_lines<'a>(text: &'a str, config: &ResolverConfig) -> Vec<&'a str> {
    if config.block_placeholder.is_empty() {
        return vec![text];
    }
    let mut parts = text.split(config.block_placeholder.as_str());
    let mut lines = Vec::new();
    if let Some(head) = parts.next().filter(|head| !head.is_empty()) {
        lines.push(head);
    }
    lines.extend(parts);
    lines
}

/// Labels for an update suggestion: `Un<key>` for each removed property, the
/// capitalized key for each added one.
pub fn update_labels(properties: Option<&PropertyMap>, new_properties: Option<&PropertyMap>) -> Vec<String> {
    let removed = properties
        .into_iter()
        .flat_map(|props| props.keys())
        .map(|key| format!("Un{key}"));
    let added = new_properties
        .into_iter()
        .flat_map(|props| props.keys())
        .map(|key| capitalize(key));
    removed.chain(added).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Relative timestamp for a comment: `5m`, `3h`, `1d`, else `MM/DD/YYYY`.
pub fn format_comment_date(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes().max(0);
    let hours = elapsed.num_hours().max(0);
    let days = elapsed.num_days().max(0);

    if minutes < 60 {
        format!("{minutes}m")
    } else if hours < 24 {
        format!("{hours}h")
    } else if days < 2 {
        format!("{days}d")
    } else {
        at.format("%m/%d/%Y").to_string()
    }
}

/// Plain text of a rich comment value.
///
/// Text leaves (`{"text": ..}`) are concatenated; top-level blocks are
/// separated by newlines. A bare string is returned as is.
pub fn plain_text(content_rich: &Value) -> String {
    match content_rich {
        Value::Array(blocks) => blocks
            .iter()
            .map(|block| {
                let mut out = String::new();
                push_leaf_text(block, &mut out);
                out
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => {
            let mut out = String::new();
            push_leaf_text(other, &mut out);
            out
        }
    }
}

fn push_leaf_text(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Array(items) => items.iter().for_each(|item| push_leaf_text(item, out)),
        Value::Object(map) => {
            if let Some(Value::String(text)) = map.get("text") {
                out.push_str(text);
            } else if let Some(children) = map.get("children") {
                push_leaf_text(children, out);
            }
        }
        _ => {}
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_placeholder_lines() {
        let config = ResolverConfig::default();
        assert_eq!(
            placeholder_lines("__block__Heading 2__block__", &config),
            vec!["Heading 2", ""]
        );
        assert_eq!(
            placeholder_lines("tail__block__Paragraph", &config),
            vec!["tail", "Paragraph"]
        );
        assert_eq!(placeholder_lines("plain", &config), vec!["plain"]);
    }

    #[test]
    fn test_update_labels() {
        let removed = PropertyMap::from([("italic".to_string(), json!(true))]);
        let added = PropertyMap::from([
            ("bold".to_string(), json!(true)),
            ("underline".to_string(), json!(true)),
        ]);
        assert_eq!(
            update_labels(Some(&removed), Some(&added)),
            vec!["Unitalic", "Bold", "Underline"]
        );
        assert!(update_labels(None, None).is_empty());
    }

    #[test]
    fn test_format_comment_date_thresholds() {
        let now = DateTime::from_timestamp(1_740_000_000, 0).unwrap();
        let ago = |d: Duration| format_comment_date(now - d, now);

        assert_eq!(ago(Duration::seconds(30)), "0m");
        assert_eq!(ago(Duration::minutes(59)), "59m");
        assert_eq!(ago(Duration::minutes(60)), "1h");
        assert_eq!(ago(Duration::hours(23)), "23h");
        assert_eq!(ago(Duration::hours(24)), "1d");
        assert_eq!(ago(Duration::hours(47)), "1d");

        let old = now - Duration::days(2);
        assert_eq!(format_comment_date(old, now), old.format("%m/%d/%Y").to_string());
        assert_eq!(ago(Duration::days(2)).len(), "MM/DD/YYYY".len());
    }

    #[test]
    fn test_plain_text() {
        let rich = json!([
            {"type": "p", "children": [{"text": "Hello "}, {"text": "there", "bold": true}]},
            {"type": "p", "children": [{"text": "second"}]},
        ]);
        assert_eq!(plain_text(&rich), "Hello there\nsecond");
        assert_eq!(plain_text(&json!("bare")), "bare");
        assert_eq!(plain_text(&json!(null)), "");
    }
}
