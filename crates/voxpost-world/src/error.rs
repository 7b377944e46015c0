//! World construction errors.

use thiserror::Error;
use voxpost_terrain::TerrainError;
use voxpost_voxel::ChunkLayoutError;

/// Errors raised while building a world or its streamer.
///
/// Generation itself never fails; everything here surfaces at construction.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Terrain parameters or preset name are invalid.
    #[error("invalid terrain configuration: {0}")]
    Terrain(#[from] TerrainError),

    /// Chunk dimensions are invalid.
    #[error("invalid chunk layout: {0}")]
    Layout(#[from] ChunkLayoutError),

    /// Streaming radius exceeds the supported maximum.
    #[error("stream radius {radius} exceeds maximum {max}")]
    InvalidStreamRadius {
        /// Requested radius.
        radius: u32,
        /// Largest accepted radius.
        max: u32,
    },

    /// A generation worker thread could not be started.
    #[error("failed to spawn chunk worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}
