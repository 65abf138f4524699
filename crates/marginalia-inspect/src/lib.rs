//! Library side of the `marginalia-inspect` binary.
//!
//! Loads a document, its discussions and a label configuration from disk,
//! runs a resolution pass and formats what each block displays.

pub mod report;

use std::path::Path;

use anyhow::{Context, Result, bail};
use marginalia_annotate::{BlockSummary, DiscussionStore, EditorSession, ResolverConfig};
use marginalia_doc::{Document, DocumentQuery};
use marginalia_types::BlockPath;

/// Everything read from disk for one inspection.
#[derive(Debug)]
pub struct Inputs {
    pub document: Document,
    pub discussions: DiscussionStore,
    pub config: ResolverConfig,
}

impl Inputs {
    /// Read the document and, when given, the discussions and configuration.
    pub fn load(
        document: &Path,
        discussions: Option<&Path>,
        config: Option<&Path>,
    ) -> Result<Self> {
        let text = std::fs::read_to_string(document)
            .with_context(|| format!("reading document {}", document.display()))?;
        let document = Document::from_json(&text)
            .with_context(|| format!("parsing document {}", document.display()))?;

        let discussions = match discussions {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading discussions {}", path.display()))?;
                DiscussionStore::from_json(&text)
                    .with_context(|| format!("parsing discussions {}", path.display()))?
            }
            None => DiscussionStore::new(),
        };

        let config = match config {
            Some(path) => ResolverConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ResolverConfig::default(),
        };

        tracing::info!(
            blocks = document.len(),
            discussions = discussions.len(),
            "loaded inputs"
        );
        Ok(Self {
            document,
            discussions,
            config,
        })
    }

    pub fn into_session(self) -> (Document, EditorSession) {
        let session = EditorSession::new(self.config).with_discussions(self.discussions);
        (self.document, session)
    }
}

/// Summary of the block owning `path`.
///
/// Every block above it is resolved first, so anchoring matches what a full
/// top-to-bottom pass would show.
pub fn summarize_through(
    session: &mut EditorSession,
    doc: &Document,
    path: &BlockPath,
) -> Result<BlockSummary> {
    let Some(target) = doc.owning_block_path(path) else {
        bail!("no block at {path}");
    };

    let mut pass = session.begin_pass();
    for block in doc.blocks() {
        let summary = pass.resolve_block(doc, &block)?;
        if block == target {
            return Ok(summary);
        }
    }
    bail!("block {target} is not a top-level element")
}

// ============================================================================
// Tests
// ============================================================================
