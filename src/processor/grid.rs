//! Chunk grid layout: how many chunks a map splits into and where each
//! chunk sits.

use crate::error::{Result, SplitError};

/// Nominal chunk dimensions in tiles. Both sides are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSize {
    width: u32,
    height: u32,
}

impl ChunkSize {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SplitError::InvalidChunkSize { width, height });
        }
        Ok(ChunkSize { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Number of chunk columns and rows covering a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub horizontal: u32,
    pub vertical: u32,
}

/// Position and clipped size of one chunk, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkGeometry {
    pub id: usize,
    pub top_left_x: u32,
    pub top_left_y: u32,
    pub width: u32,
    pub height: u32,
}

impl ChunkGeometry {
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

pub fn compute_grid(map_width: u32, map_height: u32, size: ChunkSize) -> Grid {
    Grid {
        horizontal: map_width.div_ceil(size.width),
        vertical: map_height.div_ceil(size.height),
    }
}

impl Grid {
    pub fn total(&self) -> usize {
        self.horizontal as usize * self.vertical as usize
    }

    /// Geometry of chunk `id`, ids running row-major over the grid.
    ///
    /// `id` must be below [`Grid::total`].
    pub fn geometry_for(
        &self,
        id: usize,
        size: ChunkSize,
        map_width: u32,
        map_height: u32,
    ) -> ChunkGeometry {
        debug_assert!(id < self.total(), "chunk {id} outside a {self:?} grid");

        let columns = self.horizontal as usize;
        let column = (id % columns) as u32;
        let row = (id / columns) as u32;

        let top_left_x = column * size.width;
        let top_left_y = row * size.height;

        ChunkGeometry {
            id,
            top_left_x,
            top_left_y,
            width: size.width.min(map_width - top_left_x),
            height: size.height.min(map_height - top_left_y),
        }
    }

    /// Every chunk of the grid in ascending id order.
    pub fn geometries(
        &self,
        size: ChunkSize,
        map_width: u32,
        map_height: u32,
    ) -> impl Iterator<Item = ChunkGeometry> + '_ {
        (0..self.total()).map(move |id| self.geometry_for(id, size, map_width, map_height))
    }
}
