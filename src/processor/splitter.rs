//! Builds the master record and every chunk record for a map.

use std::num::NonZeroUsize;
use std::thread;

use log::{debug, info};

use super::codec;
use super::extractor;
use super::grid::{ChunkGeometry, ChunkSize, Grid, compute_grid};
use crate::error::{Result, SplitError};
use crate::model::{ChunkFile, Encoding, Extra, Map, MasterFile, SplitOutput, TileLayer};

/// A tile layer decoded once for all chunks.
///
/// Holds the layer's fields minus its stored `data`, so building a chunk
/// only ever copies the chunk's own tiles.
#[derive(Debug)]
struct DecodedLayer {
    encoding: Option<Encoding>,
    compression: Option<String>,
    extra: Extra,
    tiles: Vec<u32>,
}

impl DecodedLayer {
    fn new(layer: &TileLayer, tiles: Vec<u32>) -> Self {
        DecodedLayer {
            encoding: layer.encoding,
            compression: layer.compression.clone(),
            extra: layer.extra.clone(),
            tiles,
        }
    }

    /// The part of this layer covered by `geometry`, re-encoded.
    fn chunk_layer(&self, map_width: u32, geometry: &ChunkGeometry) -> TileLayer {
        let tiles = extractor::extract(&self.tiles, map_width, geometry);
        TileLayer {
            encoding: self.encoding,
            compression: self.compression.clone(),
            data: codec::encode(self.encoding.unwrap_or_default(), &tiles),
            width: geometry.width,
            height: geometry.height,
            extra: self.extra.clone(),
        }
    }
}

/// Split `map` into chunks of `size`, on the calling thread.
pub fn split(map: &Map, size: ChunkSize) -> Result<SplitOutput> {
    split_parallel(map, size, NonZeroUsize::MIN)
}

/// Same as [`split`], with chunk construction spread over `workers` threads.
///
/// The chunks still come back ordered by id.
pub fn split_parallel(map: &Map, size: ChunkSize, workers: NonZeroUsize) -> Result<SplitOutput> {
    if map.width == 0 || map.height == 0 {
        return Err(SplitError::MalformedData(format!(
            "map must be at least 1x1 tiles, got {}x{}",
            map.width, map.height
        )));
    }

    let grid = compute_grid(map.width, map.height, size);
    let layers = decode_layers(map)?;
    let master = master_file(map, size, grid);

    info!(
        "splitting {}x{} map into {} chunks ({}x{} grid of {}x{})",
        map.width,
        map.height,
        grid.total(),
        grid.horizontal,
        grid.vertical,
        size.width(),
        size.height()
    );

    let build = |id: usize| {
        let geometry = grid.geometry_for(id, size, map.width, map.height);
        build_chunk(map, &layers, &geometry)
    };

    let total = grid.total();
    let workers = workers.get().min(total.max(1));
    let chunks: Vec<ChunkFile> = if workers == 1 {
        (0..total).map(build).collect()
    } else {
        let per_worker = total.div_ceil(workers);
        debug!("building chunks on {workers} threads, {per_worker} each");

        thread::scope(|scope| {
            let handles: Vec<_> = (0..total)
                .step_by(per_worker)
                .map(|start| {
                    let end = (start + per_worker).min(total);
                    let build = &build;
                    scope.spawn(move || (start..end).map(build).collect::<Vec<_>>())
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    };

    Ok(SplitOutput { master, chunks })
}

fn decode_layers(map: &Map) -> Result<Vec<DecodedLayer>> {
    let expected = map.width as usize * map.height as usize;

    map.tile_layers()
        .map(|layer| {
            let tiles = codec::decode(layer)?;
            if tiles.len() != expected {
                return Err(SplitError::MalformedData(format!(
                    "layer `{}` has {} tiles, a {}x{} map needs {}",
                    layer.name(),
                    tiles.len(),
                    map.width,
                    map.height,
                    expected
                )));
            }
            debug!("decoded layer `{}` ({} tiles)", layer.name(), tiles.len());
            Ok(DecodedLayer::new(layer, tiles))
        })
        .collect()
}

fn master_file(map: &Map, size: ChunkSize, grid: Grid) -> MasterFile {
    MasterFile {
        chunk_width: size.width(),
        chunk_height: size.height(),
        horizontal_chunk_amount: grid.horizontal,
        vertical_chunk_amount: grid.vertical,
        layer_amount: map.layers.len(),
        map_height: map.height,
        map_width: map.width,
        tile_width: map.tile_width,
        tile_height: map.tile_height,
        global_layers: map.passthrough_layers().cloned().collect(),
        tilesets: map.tilesets.clone(),
    }
}

fn build_chunk(map: &Map, layers: &[DecodedLayer], geometry: &ChunkGeometry) -> ChunkFile {
    let layers = layers
        .iter()
        .map(|decoded| decoded.chunk_layer(map.width, geometry))
        .collect();

    let mut extra = map.extra.clone();
    extra.remove("id");

    ChunkFile {
        id: geometry.id,
        width: geometry.width,
        height: geometry.height,
        tile_width: map.tile_width,
        tile_height: map.tile_height,
        tilesets: map.tilesets.clone(),
        layers,
        extra,
    }
}
