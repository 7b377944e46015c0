//! Resolved world settings: terrain parameters plus chunk and cache sizing.

use voxpost_config::Config;
use voxpost_terrain::TerrainParams;

use crate::error::WorldError;

/// Everything a [`crate::ChunkManager`] needs to build chunks.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSettings {
    /// Terrain generator parameters.
    pub params: TerrainParams,
    /// Horizontal chunk edge in cells.
    pub chunk_size: usize,
    /// Air cells above the maximum terrain height.
    pub headroom: usize,
    /// Emit a snow-cap batch on surfaces at or above `sea_level + 10`.
    pub snow_caps: bool,
    /// Loaded chunk cap for eviction; `0` disables eviction.
    pub max_loaded_chunks: usize,
}

impl WorldSettings {
    /// Default sizing around the given terrain parameters.
    pub fn new(params: TerrainParams) -> Self {
        Self {
            params,
            chunk_size: 64,
            headroom: 16,
            snow_caps: false,
            max_loaded_chunks: 0,
        }
    }

    /// Resolves the preset name and seed from a loaded config.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Terrain`] for an unknown preset name.
    pub fn from_config(config: &Config) -> Result<Self, WorldError> {
        let params = TerrainParams::from_preset_name(&config.world.preset, config.world.seed)?;
        Ok(Self {
            params,
            chunk_size: config.world.chunk_size as usize,
            headroom: config.world.headroom as usize,
            snow_caps: config.world.snow_caps,
            max_loaded_chunks: config.streaming.max_loaded_chunks as usize,
        })
    }

    /// Surfaces at or above this height get a snow cap.
    pub fn snow_line(&self) -> i32 {
        self.params.sea_level + 10
    }
}
