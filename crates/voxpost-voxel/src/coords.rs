//! Chunk coordinates and world ↔ chunk ↔ local conversions.
//!
//! Chunks tile the XZ plane; each one spans the full vertical extent of the
//! world. Chunk `(0, 0)` is centred on the world origin, so chunk `(cx, cz)`
//! covers world X in `[cx * size_x - size_x / 2, cx * size_x + size_x / 2)`
//! and likewise for Z.

use glam::IVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies a chunk's position on the horizontal chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// Chunk-grid X coordinate.
    pub x: i32,
    /// Chunk-grid Z coordinate.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the coordinate offset by `(dx, dz)` chunks.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// Chebyshev (chessboard) distance in chunks.
    pub fn chebyshev_distance(self, other: ChunkCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    /// All coordinates within Chebyshev `radius` of `self`, nearest rings first.
    ///
    /// Radius 1 yields the 3×3 block centred on `self`.
    pub fn square_around(self, radius: u32) -> Vec<ChunkCoord> {
        let r = radius as i32;
        let mut coords = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
        for dx in -r..=r {
            for dz in -r..=r {
                coords.push(self.offset(dx, dz));
            }
        }
        coords.sort_by_key(|c| (c.chebyshev_distance(self), c.x, c.z));
        coords
    }
}

/// Errors for malformed chunk dimensions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkLayoutError {
    /// Horizontal chunk sizes must be positive and even so the origin chunk
    /// straddles the world origin symmetrically.
    #[error("horizontal chunk size must be positive and even, got {0}")]
    InvalidHorizontalSize(usize),
    /// The chunk needs at least one layer.
    #[error("vertical chunk size must be positive")]
    ZeroHeight,
}

/// Dimensions shared by every chunk in a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkLayout {
    size_x: usize,
    size_y: usize,
    size_z: usize,
}

impl ChunkLayout {
    /// Creates a layout, validating the dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkLayoutError`] when a horizontal size is zero or odd, or
    /// the vertical size is zero.
    pub fn new(size_x: usize, size_y: usize, size_z: usize) -> Result<Self, ChunkLayoutError> {
        for size in [size_x, size_z] {
            if size == 0 || size % 2 != 0 {
                return Err(ChunkLayoutError::InvalidHorizontalSize(size));
            }
        }
        if size_y == 0 {
            return Err(ChunkLayoutError::ZeroHeight);
        }
        Ok(Self {
            size_x,
            size_y,
            size_z,
        })
    }

    /// Columns along X.
    pub fn size_x(&self) -> usize {
        self.size_x
    }

    /// Layers along Y.
    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// Columns along Z.
    pub fn size_z(&self) -> usize {
        self.size_z
    }

    /// Number of columns per chunk.
    pub fn column_count(&self) -> usize {
        self.size_x * self.size_z
    }

    /// Number of cells per chunk.
    pub fn volume(&self) -> usize {
        self.size_x * self.size_y * self.size_z
    }

    /// World-space X/Z of the chunk's local `(0, 0)` column.
    pub fn chunk_origin(&self, coord: ChunkCoord) -> (i32, i32) {
        let sx = self.size_x as i32;
        let sz = self.size_z as i32;
        (coord.x * sx - sx / 2, coord.z * sz - sz / 2)
    }

    /// The chunk containing world column `(wx, wz)`.
    pub fn chunk_of(&self, wx: i32, wz: i32) -> ChunkCoord {
        let sx = self.size_x as i32;
        let sz = self.size_z as i32;
        ChunkCoord::new((wx + sx / 2).div_euclid(sx), (wz + sz / 2).div_euclid(sz))
    }

    /// The chunk containing a continuous world position (e.g. the player).
    pub fn chunk_of_position(&self, x: f64, z: f64) -> ChunkCoord {
        self.chunk_of(x.floor() as i32, z.floor() as i32)
    }

    /// Splits a world cell into its owning chunk and chunk-local coordinates.
    ///
    /// The local Y equals the world Y and may lie outside `0..size_y`.
    pub fn locate(&self, cell: IVec3) -> (ChunkCoord, IVec3) {
        let coord = self.chunk_of(cell.x, cell.z);
        let (ox, oz) = self.chunk_origin(coord);
        (coord, IVec3::new(cell.x - ox, cell.y, cell.z - oz))
    }

    /// World cell for a chunk-local position.
    pub fn local_to_world(&self, coord: ChunkCoord, lx: usize, ly: usize, lz: usize) -> IVec3 {
        let (ox, oz) = self.chunk_origin(coord);
        IVec3::new(ox + lx as i32, ly as i32, oz + lz as i32)
    }

    /// Whether a world Y lies inside the vertical extent.
    pub fn contains_y(&self, y: i32) -> bool {
        y >= 0 && (y as usize) < self.size_y
    }
}
