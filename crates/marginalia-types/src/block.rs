//! Block element kinds.
//!
//! What a block element *is*. Resolution only needs the kind to label
//! block-level suggestions ("Paragraph", "Heading 2", ...); everything else
//! about rendering a kind belongs to the editor.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// Kind of a block element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum ElementKind {
    #[default]
    #[strum(serialize = "paragraph", serialize = "p")]
    Paragraph,
    #[strum(serialize = "heading1", serialize = "h1")]
    Heading1,
    #[strum(serialize = "heading2", serialize = "h2")]
    Heading2,
    #[strum(serialize = "heading3", serialize = "h3")]
    Heading3,
    #[strum(serialize = "heading4", serialize = "h4")]
    Heading4,
    #[strum(serialize = "heading5", serialize = "h5")]
    Heading5,
    #[strum(serialize = "heading6", serialize = "h6")]
    Heading6,
    Blockquote,
    #[strum(serialize = "code_block", serialize = "codeblock")]
    CodeBlock,
    Callout,
    #[strum(serialize = "column_group", serialize = "columngroup")]
    ColumnGroup,
    Column,
    Equation,
    File,
    #[strum(serialize = "image", serialize = "img")]
    Image,
    #[strum(serialize = "media_embed", serialize = "mediaembed")]
    MediaEmbed,
    Table,
    #[strum(serialize = "table_of_contents", serialize = "toc")]
    TableOfContents,
    Toggle,
    Video,
    Audio,
    #[strum(serialize = "horizontal_rule", serialize = "hr")]
    HorizontalRule,
}

impl ElementKind {
    /// Parse from string (case-insensitive, accepts short aliases like `h2`).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Paragraph => "paragraph",
            ElementKind::Heading1 => "heading1",
            ElementKind::Heading2 => "heading2",
            ElementKind::Heading3 => "heading3",
            ElementKind::Heading4 => "heading4",
            ElementKind::Heading5 => "heading5",
            ElementKind::Heading6 => "heading6",
            ElementKind::Blockquote => "blockquote",
            ElementKind::CodeBlock => "code_block",
            ElementKind::Callout => "callout",
            ElementKind::ColumnGroup => "column_group",
            ElementKind::Column => "column",
            ElementKind::Equation => "equation",
            ElementKind::File => "file",
            ElementKind::Image => "image",
            ElementKind::MediaEmbed => "media_embed",
            ElementKind::Table => "table",
            ElementKind::TableOfContents => "table_of_contents",
            ElementKind::Toggle => "toggle",
            ElementKind::Video => "video",
            ElementKind::Audio => "audio",
            ElementKind::HorizontalRule => "horizontal_rule",
        }
    }

    /// Default English label used when no label configuration overrides it.
    pub fn default_label(&self) -> &'static str {
        match self {
            ElementKind::Paragraph => "Paragraph",
            ElementKind::Heading1 => "Heading 1",
            ElementKind::Heading2 => "Heading 2",
            ElementKind::Heading3 => "Heading 3",
            ElementKind::Heading4 => "Heading 4",
            ElementKind::Heading5 => "Heading 5",
            ElementKind::Heading6 => "Heading 6",
            ElementKind::Blockquote => "Blockquote",
            ElementKind::CodeBlock => "Code Block",
            ElementKind::Callout => "Callout",
            ElementKind::ColumnGroup => "Columns",
            ElementKind::Column => "Column",
            ElementKind::Equation => "Equation",
            ElementKind::File => "File",
            ElementKind::Image => "Image",
            ElementKind::MediaEmbed => "Media",
            ElementKind::Table => "Table",
            ElementKind::TableOfContents => "Table of Contents",
            ElementKind::Toggle => "Toggle",
            ElementKind::Video => "Video",
            ElementKind::Audio => "Audio",
            ElementKind::HorizontalRule => "Divider",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
