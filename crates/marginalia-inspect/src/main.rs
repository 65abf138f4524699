//! marginalia inspector binary.
//!
//! Resolves the annotations of a document and prints what each block shows.
//!
//! Usage:
//!   marginalia-inspect doc.json
//!   marginalia-inspect doc.json --discussions discussions.json --config labels.ron
//!   marginalia-inspect doc.json --block 2 --json
//!
//! Set `RUST_LOG=marginalia_annotate=debug` to see skipped annotations.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use marginalia_inspect::{Inputs, report, summarize_through};
use marginalia_types::BlockPath;

/// Print the annotations each block of a document displays.
#[derive(Parser, Debug)]
#[command(name = "marginalia-inspect")]
#[command(about = "Resolve document suggestions and comments per block")]
struct Args {
    /// Document JSON file
    document: PathBuf,

    /// Discussions JSON file (array of discussions)
    #[arg(short, long)]
    discussions: Option<PathBuf>,

    /// RON label configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only the block owning this path (e.g. `2` or `2.0.1`)
    #[arg(short, long)]
    block: Option<BlockPath>,

    /// Print summaries as JSON instead of a tree
    #[arg(long)]
    json: bool,

    /// Include blocks without annotations
    #[arg(short, long)]
    all: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable with --json
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let inputs = Inputs::load(
        &args.document,
        args.discussions.as_deref(),
        args.config.as_deref(),
    )?;
    let (doc, mut session) = inputs.into_session();

    let summaries = match &args.block {
        Some(path) => vec![summarize_through(&mut session, &doc, path)?],
        None => session.resolve_document(&doc)?,
    };
    tracing::info!(blocks = summaries.len(), "resolved");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let include_empty = args.all || args.block.is_some();
    let lines = report::format_report(
        &doc,
        &summaries,
        session.config(),
        chrono::Utc::now(),
        include_empty,
    );
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
