//! Cuts one chunk's tiles out of a full, row-major tile layer.

use super::grid::ChunkGeometry;

/// Copy the tiles covered by `chunk` out of `tiles`.
///
/// `tiles` is the whole decoded layer, `map_width` tiles per row. The result
/// is row-major with `chunk.width` tiles per row; edge chunks come out
/// smaller, never padded.
///
/// The caller guarantees `tiles.len()` is a whole number of `map_width`-tile
/// rows and that `chunk` lies inside them; `split` checks the tile count
/// against the map size before any chunk is cut.
pub fn extract(tiles: &[u32], map_width: u32, chunk: &ChunkGeometry) -> Vec<u32> {
    let map_width = map_width as usize;
    let left = chunk.top_left_x as usize;
    let right = left + chunk.width as usize;

    debug_assert!(right <= map_width);
    debug_assert!((chunk.top_left_y + chunk.height) as usize * map_width <= tiles.len());

    let mut out = Vec::with_capacity(chunk.area());
    for row in tiles
        .chunks_exact(map_width)
        .skip(chunk.top_left_y as usize)
        .take(chunk.height as usize)
    {
        out.extend_from_slice(&row[left..right]);
    }
    out
}
