//! Procedural terrain: seeded gradient noise, fractal composition, multi-noise
//! height and biome sampling, voxel column fill, and deterministic foliage.

mod biome;
mod column;
mod error;
mod fbm;
mod foliage;
mod generator;
mod noise_field;
mod params;
mod seed;

pub use biome::Biome;
pub use column::{Climate, ColumnSample, TerrainFields};
pub use error::TerrainError;
pub use fbm::{FractalParams, fbm_2d};
pub use foliage::{ChunkFoliage, FoliageKind, FoliageStructure, place_foliage};
pub use generator::{CAVE_FLOOR, TerrainGenerator};
pub use noise_field::{Perlin2D, Perlin3D};
pub use params::{BiomePreset, NoiseScales, TerrainParams};
pub use seed::{chunk_rng, derive_chunk_seed, hash_chunk_voxels};
