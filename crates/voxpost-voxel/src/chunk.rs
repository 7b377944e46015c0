//! Dense voxel storage for one chunk plus its per-column height cache.
//!
//! One byte per cell. Unlike palette-compressed storage this keeps random
//! access branch-free, which the visibility pass hits six times per cell.

use crate::coords::{ChunkCoord, ChunkLayout};
use crate::kind::VoxelKind;

/// Generated voxel data for a single chunk.
///
/// Cells are indexed with X varying fastest: `x + y * size_x + z * size_x * size_y`.
/// The height cache stores, per column, the topmost solid cell's Y.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkVoxels {
    coord: ChunkCoord,
    layout: ChunkLayout,
    cells: Vec<VoxelKind>,
    heights: Vec<i32>,
}

impl ChunkVoxels {
    /// Creates an all-air chunk with a zeroed height cache.
    pub fn new_air(coord: ChunkCoord, layout: ChunkLayout) -> Self {
        Self {
            coord,
            layout,
            cells: vec![VoxelKind::Air; layout.volume()],
            heights: vec![0; layout.column_count()],
        }
    }

    /// The chunk's grid coordinate.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// The chunk's dimensions.
    pub fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    #[inline]
    fn linear_index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.layout.size_x() && y < self.layout.size_y() && z < self.layout.size_z());
        x + y * self.layout.size_x() + z * self.layout.size_x() * self.layout.size_y()
    }

    #[inline]
    fn column_index(&self, x: usize, z: usize) -> usize {
        x + z * self.layout.size_x()
    }

    /// Returns the kind at local `(x, y, z)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> VoxelKind {
        self.cells[self.linear_index(x, y, z)]
    }

    /// Returns the kind at signed local coordinates, or `None` outside the chunk.
    pub fn get_checked(&self, x: i32, y: i32, z: i32) -> Option<VoxelKind> {
        let in_range = |v: i32, size: usize| v >= 0 && (v as usize) < size;
        if in_range(x, self.layout.size_x())
            && in_range(y, self.layout.size_y())
            && in_range(z, self.layout.size_z())
        {
            Some(self.get(x as usize, y as usize, z as usize))
        } else {
            None
        }
    }

    /// Sets the kind at local `(x, y, z)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, kind: VoxelKind) {
        let idx = self.linear_index(x, y, z);
        self.cells[idx] = kind;
    }

    /// Cached topmost solid Y for local column `(x, z)`.
    #[inline]
    pub fn height(&self, x: usize, z: usize) -> i32 {
        self.heights[self.column_index(x, z)]
    }

    /// Records the topmost solid Y for local column `(x, z)`.
    #[inline]
    pub fn set_height(&mut self, x: usize, z: usize, height: i32) {
        let idx = self.column_index(x, z);
        self.heights[idx] = height;
    }

    /// The full height cache, indexed `x + z * size_x`.
    pub fn heights(&self) -> &[i32] {
        &self.heights
    }

    /// The raw cell array.
    pub fn cells(&self) -> &[VoxelKind] {
        &self.cells
    }

    /// Number of cells holding `kind`.
    pub fn count(&self, kind: VoxelKind) -> usize {
        self.cells.iter().filter(|&&k| k == kind).count()
    }
}
