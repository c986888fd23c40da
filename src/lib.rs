pub mod cli;
pub mod error;
pub mod model;
pub mod parser;
pub mod paths;
pub mod processor;
pub mod writer;

pub use error::SplitError;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use log::info;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // 1. ── Parse ──────────────────────────────────────────────────────
    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Reading {}", args.input.display()))?;
    let map = parser::load_from_json(&json)
        .with_context(|| format!("Parsing {}", args.input.display()))?;
    info!(
        "loaded {}x{} map with {} layers",
        map.width,
        map.height,
        map.layers.len()
    );

    // 2. ── Split ──────────────────────────────────────────────────────
    let size = processor::ChunkSize::new(args.chunk_width, args.chunk_height)?;
    let mut output =
        processor::split_parallel(&map, size, args.jobs).with_context(|| "Splitting map")?;

    // 3. ── Relocate asset paths ───────────────────────────────────────
    if !args.keep_paths {
        let input_dir = args.input.parent().unwrap_or(Path::new(""));
        paths::relocate(&mut output, input_dir, &args.output)
            .with_context(|| "Rewriting tileset paths")?;
    }

    // 4. ── Write outputs ──────────────────────────────────────────────
    writer::json::emit(&output, &args.output, args.pretty)
        .with_context(|| format!("Writing chunks to {}", args.output.display()))?;

    Ok(())
}
