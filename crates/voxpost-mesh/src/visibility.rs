//! Visible cell detection: decides which voxels are exposed and need an
//! instance.

use voxpost_voxel::{ChunkVoxels, VoxelKind};

use crate::face_direction::FaceDirection;
use crate::neighborhood::{Neighborhood, effective_kind};

/// Whether a cell of kind `own` shows a face towards a neighbor of kind `neighbor`.
///
/// Air always exposes. Water exposes against anything that is neither air
/// nor water, and solids expose against water, so a water/solid interface
/// renders from both sides.
#[inline]
pub fn exposes(own: VoxelKind, neighbor: VoxelKind) -> bool {
    if neighbor.is_air() {
        return true;
    }
    if own.is_water() {
        !neighbor.is_water()
    } else {
        neighbor.is_water()
    }
}

/// Whether local cell `(x, y, z)` needs an instance.
///
/// Removed cells and air never do.
pub fn is_cell_visible<N: Neighborhood + ?Sized>(
    chunk: &ChunkVoxels,
    neighborhood: &N,
    x: usize,
    y: usize,
    z: usize,
) -> bool {
    let (x, y, z) = (x as i32, y as i32, z as i32);
    let own = effective_kind(chunk, neighborhood, x, y, z);
    if own.is_air() {
        return false;
    }
    FaceDirection::ALL.iter().any(|dir| {
        let (nx, ny, nz) = dir.offset(x, y, z);
        exposes(own, effective_kind(chunk, neighborhood, nx, ny, nz))
    })
}
