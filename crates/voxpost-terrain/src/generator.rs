//! Terrain generator: column queries, per-cell kinds, and bulk chunk fill.

use std::time::Instant;

use voxpost_voxel::{ChunkCoord, ChunkLayout, ChunkLayoutError, ChunkVoxels, VoxelKind};

use crate::biome::Biome;
use crate::column::{ColumnSample, TerrainFields};
use crate::error::TerrainError;
use crate::params::TerrainParams;

/// Caves are never carved at or below this Y.
pub const CAVE_FLOOR: i32 = 4;

/// Deterministic terrain generator for one world.
///
/// Holds the validated parameters and the seven seeded noise fields. All
/// queries are pure functions of `(params, coordinates)`.
#[derive(Clone)]
pub struct TerrainGenerator {
    params: TerrainParams,
    fields: TerrainFields,
}

impl TerrainGenerator {
    /// Validates `params` and builds the noise fields.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError`] for malformed configuration.
    pub fn new(params: TerrainParams) -> Result<Self, TerrainError> {
        params.validate()?;
        let fields = TerrainFields::new(params.seed);
        Ok(Self { params, fields })
    }

    /// The generator's configuration.
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Chunk dimensions fitting this terrain: `size × (height_scale + 1 + headroom) × size`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkLayoutError`] when `size` is zero or odd.
    pub fn layout(&self, size: usize, headroom: usize) -> Result<ChunkLayout, ChunkLayoutError> {
        ChunkLayout::new(size, self.params.height_scale as usize + 1 + headroom, size)
    }

    /// Samples height, biome and climate for world column `(x, z)`.
    pub fn sample_column(&self, x: i32, z: i32) -> ColumnSample {
        self.fields.sample_column(&self.params, x, z)
    }

    /// Surface height of world column `(x, z)`, ignoring edits.
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        self.sample_column(x, z).height
    }

    /// Biome of world column `(x, z)`.
    pub fn biome_at(&self, x: i32, z: i32) -> Biome {
        self.sample_column(x, z).biome
    }

    /// Generated kind of a single world cell, without generating its chunk.
    pub fn kind_at(&self, x: i32, y: i32, z: i32) -> VoxelKind {
        if y < 0 {
            return VoxelKind::Stone;
        }
        let column = self.sample_column(x, z);
        self.fill_kind(&column, x, y, z)
    }

    /// Whether the cave fields carve `(x, y, z)` under a column of `ground` height.
    fn is_cave(&self, ground: i32, x: i32, y: i32, z: i32) -> bool {
        if y >= ground - 1 || y <= CAVE_FLOOR {
            return false;
        }
        self.fields.cave_value(&self.params, x, y, z) > 1.0 - self.params.cave_threshold
    }

    fn fill_kind(&self, column: &ColumnSample, x: i32, y: i32, z: i32) -> VoxelKind {
        let ground = column.height;
        let sea_level = self.params.sea_level;
        let open = || {
            if y <= sea_level {
                VoxelKind::Water
            } else {
                VoxelKind::Air
            }
        };

        if y == 0 {
            return VoxelKind::Stone;
        }
        if y > ground {
            return open();
        }
        if self.is_cave(ground, x, y, z) {
            return open();
        }
        match ground - y {
            0 => column.biome.top_material(),
            1..=3 => column.biome.subsurface_material(),
            _ => VoxelKind::Stone,
        }
    }

    /// Fills a chunk's voxels and height cache.
    ///
    /// The height cache records the topmost solid cell actually written for
    /// each column.
    pub fn generate_chunk_voxels(&self, coord: ChunkCoord, layout: ChunkLayout) -> ChunkVoxels {
        let start = Instant::now();
        let mut chunk = ChunkVoxels::new_air(coord, layout);
        let (origin_x, origin_z) = layout.chunk_origin(coord);

        for lz in 0..layout.size_z() {
            for lx in 0..layout.size_x() {
                let wx = origin_x + lx as i32;
                let wz = origin_z + lz as i32;
                let column = self.sample_column(wx, wz);

                let mut top_solid = 0;
                for ly in 0..layout.size_y() {
                    let kind = self.fill_kind(&column, wx, ly as i32, wz);
                    if kind.is_solid() {
                        top_solid = ly as i32;
                    }
                    if kind != VoxelKind::Air {
                        chunk.set(lx, ly, lz, kind);
                    }
                }
                chunk.set_height(lx, lz, top_solid);
            }
        }

        tracing::debug!(
            cx = coord.x,
            cz = coord.z,
            elapsed_us = start.elapsed().as_micros() as u64,
            "generated chunk voxels"
        );
        chunk
    }
}
