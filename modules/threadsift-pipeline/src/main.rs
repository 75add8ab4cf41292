use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use threadsift_common::{PipelineConfig, RawPost};
use threadsift_pipeline::{export, FileIndex, Pipeline};

/// Process a batch of scraped bookmarks: dedup, thread, score, summarize.
#[derive(Parser, Debug)]
#[command(name = "threadsift")]
struct Args {
    /// Path to the collector's batch file (JSON array of raw posts).
    #[arg(long)]
    input: PathBuf,

    /// Directory for the export files.
    #[arg(long, default_value = "out")]
    output: PathBuf,

    /// Path to the persisted dedup index (JSON lines, appended across runs).
    #[arg(long, default_value = "dedup-index.jsonl")]
    index: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("threadsift_pipeline=info".parse()?))
        .init();

    info!("Threadsift starting...");

    let args = Args::parse();
    let config = PipelineConfig::from_env();

    // Input loading is fatal: no partial output on a bad batch.
    let input = std::fs::read_to_string(&args.input)
        .with_context(|| format!("read input batch {}", args.input.display()))?;
    let batch: Vec<RawPost> = serde_json::from_str(&input)
        .with_context(|| format!("parse input batch {}", args.input.display()))?;
    info!(posts = batch.len(), input = %args.input.display(), "Loaded input batch");

    // The index is read once up front; appended only after a successful run.
    let mut index = FileIndex::load(&args.index)?;

    let mut pipeline = Pipeline::new(config.clone(), &mut index);
    let output = pipeline.run(&batch, Utc::now())?;

    export::write_all(&args.output, &output, &config)?;
    let appended = index.commit()?;
    info!(appended, "Dedup index updated");

    info!("{}", output.stats);
    Ok(())
}
