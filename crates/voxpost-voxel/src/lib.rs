//! Voxel data model: block kinds, chunk coordinates, dense chunk storage, and
//! the removed-cells overlay layered over generated terrain.

pub mod chunk;
pub mod coords;
pub mod kind;
pub mod overlay;

pub use chunk::ChunkVoxels;
pub use coords::{ChunkCoord, ChunkLayout, ChunkLayoutError};
pub use kind::{UnknownVoxelKind, VoxelKind};
pub use overlay::RemovedCells;
