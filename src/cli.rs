use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Split a Tiled JSON map into chunk files")]
pub struct Cli {
    /// Input .json map file
    pub input: PathBuf,
    /// Output directory for master.json and chunk<N>.json
    pub output: PathBuf,
    /// Chunk width in tiles
    #[arg(long, default_value_t = 32)]
    pub chunk_width: u32,
    /// Chunk height in tiles
    #[arg(long, default_value_t = 32)]
    pub chunk_height: u32,
    /// Worker threads used to build chunks
    #[arg(short, long, default_value = "1")]
    pub jobs: NonZeroUsize,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
    /// Leave tileset and image paths as they are in the input
    #[arg(long)]
    pub keep_paths: bool,
}
