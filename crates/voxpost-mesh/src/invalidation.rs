//! Mesh invalidation: determines which chunks need remeshing after an edit.

use voxpost_voxel::{ChunkCoord, ChunkLayout};

use crate::FaceDirection;

/// Determines which chunks need remeshing after a voxel edit.
pub struct MeshInvalidator;

impl MeshInvalidator {
    /// Returns the chunks whose meshes depend on local column `(x, z)` of
    /// `edited_chunk`.
    ///
    /// The edited chunk itself is always first. A neighbor is added when the
    /// edit sits on the boundary it shares, because that neighbor's
    /// visibility pass reads the edited cell. Chunks span the full height, so
    /// Y never crosses a chunk boundary.
    pub fn invalidate(edited_chunk: ChunkCoord, x: usize, z: usize, layout: &ChunkLayout) -> Vec<ChunkCoord> {
        let mut dirty = vec![edited_chunk];

        if x == 0 {
            dirty.push(neighbor_coord(edited_chunk, FaceDirection::NegX));
        }
        if x == layout.size_x() - 1 {
            dirty.push(neighbor_coord(edited_chunk, FaceDirection::PosX));
        }
        if z == 0 {
            dirty.push(neighbor_coord(edited_chunk, FaceDirection::NegZ));
        }
        if z == layout.size_z() - 1 {
            dirty.push(neighbor_coord(edited_chunk, FaceDirection::PosZ));
        }

        dirty
    }
}

/// Returns the chunk coordinate of the neighbor in the given horizontal direction.
fn neighbor_coord(coord: ChunkCoord, dir: FaceDirection) -> ChunkCoord {
    let d = dir.delta();
    coord.offset(d.x, d.z)
}
