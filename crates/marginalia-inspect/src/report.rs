//! Block annotation summaries as ASCII tree lines.

use chrono::{DateTime, Utc};
use marginalia_annotate::{
    AnnotationItem, BlockSummary, Glyph, ResolvedDiscussion, ResolvedKind, ResolvedSuggestion,
    ResolverConfig, format_comment_date, placeholder_lines, plain_text, update_labels,
};
use marginalia_doc::{Document, DocumentQuery};

/// Format block summaries, skipping blocks with nothing to show unless
/// `include_empty` is set.
pub fn format_report(
    doc: &Document,
    summaries: &[BlockSummary],
    config: &ResolverConfig,
    now: DateTime<Utc>,
    include_empty: bool,
) -> Vec<String> {
    let mut lines = Vec::new();
    for summary in summaries {
        if summary.is_empty() && !include_empty {
            continue;
        }
        lines.push(format_block_header(doc, summary, config));
        for (idx, item) in summary.items.iter().enumerate() {
            let connector = if idx + 1 == summary.items.len() {
                "└─ "
            } else {
                "├─ "
            };
            lines.push(format!("{connector}{}", format_item(item, config, now)));
        }
    }
    lines
}

fn format_block_header(doc: &Document, summary: &BlockSummary, config: &ResolverConfig) -> String {
    let label = doc
        .node(&summary.block)
        .and_then(|node| node.as_element())
        .map(|element| config.block_label(element))
        .unwrap_or("?");

    let glyph = match summary.glyph() {
        Some(Glyph::Edit) => " [edit]",
        Some(Glyph::Comment) => " [comment]",
        Some(Glyph::Mixed) => " [mixed]",
        None => "",
    };
    let badge = summary
        .badge()
        .map(|n| format!(" ×{n}"))
        .unwrap_or_default();

    format!("[{}] {label}{glyph}{badge}", summary.block)
}

fn format_item(item: &AnnotationItem, config: &ResolverConfig, now: DateTime<Utc>) -> String {
    let when = format_comment_date(item.created_at(), now);
    match item {
        AnnotationItem::Suggestion(s) => {
            format!("{} · {} · {when}", format_suggestion(s, config), s.user_id)
        }
        AnnotationItem::Discussion(d) => {
            format!("{} · {} · {when}", format_discussion(d), d.user_id)
        }
    }
}

fn format_suggestion(s: &ResolvedSuggestion, config: &ResolverConfig) -> String {
    let shown = |text: &Option<String>| {
        let lines = text
            .as_deref()
            .map(|t| placeholder_lines(t, config))
            .unwrap_or_default();
        format_content_summary(&lines.join(" ¶ "), 40)
    };

    match s.kind {
        ResolvedKind::Insert => format!("insert \"{}\"", shown(&s.new_text)),
        ResolvedKind::Remove => format!("remove \"{}\"", shown(&s.text)),
        ResolvedKind::Replace => {
            format!("replace \"{}\" → \"{}\"", shown(&s.text), shown(&s.new_text))
        }
        ResolvedKind::Update => {
            let labels =
                update_labels(s.properties.as_ref(), s.new_properties.as_ref()).join(", ");
            format!("update {labels} on \"{}\"", shown(&s.new_text))
        }
    }
}

fn format_discussion(d: &ResolvedDiscussion) -> String {
    let preview = d.preview();
    let first = preview
        .first_comment
        .map(|c| plain_text(&c.content_rich))
        .unwrap_or_default();

    let mut out = format!("comment \"{}\"", format_content_summary(&first, 40));
    if preview.reply_count > 0 {
        out.push_str(&format!(" (+{} replies)", preview.reply_count));
    }
    if let Some(quoted) = preview.document_content {
        out.push_str(&format!(" on \"{}\"", format_content_summary(quoted, 24)));
    }
    out
}

fn format_content_summary(content: &str, max_chars: usize) -> String {
    let first_line = content.lines().next().unwrap_or("");
    let trimmed = first_line.trim();

    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        let truncated: String = trimmed.chars().take(max_chars - 3).collect();
        format!("{truncated}...")
    }
}

// ============================================================================
// Tests
// ============================================================================
