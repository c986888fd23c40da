//! The functional core: map in, master + chunks out.
//!
//! Pure transformations only; reading and writing files lives in `lib.rs`
//! and `writer`.
pub mod codec;
pub mod extractor;
pub mod grid;
pub mod splitter;

pub use grid::{ChunkGeometry, ChunkSize, Grid};
pub use splitter::{split, split_parallel};
