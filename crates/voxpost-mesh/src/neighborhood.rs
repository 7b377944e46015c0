//! Everything a visibility pass needs to know beyond the chunk's own cells.
//!
//! Meshing one chunk reads one cell past each horizontal edge and has to
//! treat player-removed cells as air. A [`Neighborhood`] answers both
//! questions, so the mesher never touches the chunk map or the overlay
//! directly.

use glam::IVec3;
use voxpost_voxel::{ChunkVoxels, VoxelKind};

/// Source of removed-cell and out-of-chunk information for one mesh pass.
pub trait Neighborhood {
    /// Whether the world cell has been removed by an edit.
    fn is_removed(&self, cell: IVec3) -> bool;

    /// Generated kind of a world cell outside the chunk being meshed.
    ///
    /// Only called for cells inside the world's vertical extent; removal is
    /// applied by the caller.
    fn outside_kind(&self, cell: IVec3) -> VoxelKind;
}

/// A chunk surrounded by air with no edits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Isolated;

impl Neighborhood for Isolated {
    fn is_removed(&self, _cell: IVec3) -> bool {
        false
    }

    fn outside_kind(&self, _cell: IVec3) -> VoxelKind {
        VoxelKind::Air
    }
}

/// Adapts a pair of closures into a [`Neighborhood`].
pub struct FnNeighborhood<R, O> {
    removed: R,
    outside: O,
}

impl<R, O> FnNeighborhood<R, O>
where
    R: Fn(IVec3) -> bool,
    O: Fn(IVec3) -> VoxelKind,
{
    /// Wraps `removed` and `outside`.
    pub fn new(removed: R, outside: O) -> Self {
        Self { removed, outside }
    }
}

impl<R, O> Neighborhood for FnNeighborhood<R, O>
where
    R: Fn(IVec3) -> bool,
    O: Fn(IVec3) -> VoxelKind,
{
    fn is_removed(&self, cell: IVec3) -> bool {
        (self.removed)(cell)
    }

    fn outside_kind(&self, cell: IVec3) -> VoxelKind {
        (self.outside)(cell)
    }
}

/// Kind of local cell `(x, y, z)` relative to `chunk` as the mesher sees it.
///
/// Removed cells read as air. Below the world floor reads as stone, above
/// the chunk ceiling as air, and horizontal overflow is answered by
/// `neighborhood`.
pub fn effective_kind<N: Neighborhood + ?Sized>(
    chunk: &ChunkVoxels,
    neighborhood: &N,
    x: i32,
    y: i32,
    z: i32,
) -> VoxelKind {
    let layout = chunk.layout();
    if y < 0 {
        return VoxelKind::Stone;
    }
    if y >= layout.size_y() as i32 {
        return VoxelKind::Air;
    }
    let (ox, oz) = layout.chunk_origin(chunk.coord());
    let world = IVec3::new(ox + x, y, oz + z);
    if neighborhood.is_removed(world) {
        return VoxelKind::Air;
    }
    match chunk.get_checked(x, y, z) {
        Some(kind) => kind,
        None => neighborhood.outside_kind(world),
    }
}
