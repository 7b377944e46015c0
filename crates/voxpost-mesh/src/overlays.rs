//! Column-scan overlays that emit a single synthetic batch kind.

use glam::IVec3;
use voxpost_voxel::ChunkVoxels;

use crate::instances::{BatchKind, InstanceBatch};
use crate::neighborhood::{Neighborhood, effective_kind};

/// Topmost solid, non-removed cell of local column `(x, z)`, or `None` when
/// the column has been dug out completely.
pub fn visible_surface<N: Neighborhood + ?Sized>(
    chunk: &ChunkVoxels,
    neighborhood: &N,
    x: usize,
    z: usize,
) -> Option<i32> {
    let (xi, zi) = (x as i32, z as i32);
    (0..=chunk.height(x, z))
        .rev()
        .find(|&y| effective_kind(chunk, neighborhood, xi, y, zi).is_solid())
}

fn scan_columns<N, F>(chunk: &ChunkVoxels, neighborhood: &N, kind: BatchKind, mut emit: F) -> Option<InstanceBatch>
where
    N: Neighborhood + ?Sized,
    F: FnMut(i32, &mut dyn FnMut(i32)),
{
    let layout = chunk.layout();
    let coord = chunk.coord();
    let mut positions = Vec::new();
    for z in 0..layout.size_z() {
        for x in 0..layout.size_x() {
            let Some(surface) = visible_surface(chunk, neighborhood, x, z) else {
                continue;
            };
            let column = layout.local_to_world(coord, x, 0, z);
            emit(surface, &mut |y| positions.push(IVec3::new(column.x, y, column.z)));
        }
    }
    (!positions.is_empty()).then_some(InstanceBatch { kind, positions })
}

/// Snow cap on every visible surface at or above `threshold`.
pub fn snow_cap_overlay<N: Neighborhood + ?Sized>(
    chunk: &ChunkVoxels,
    neighborhood: &N,
    threshold: i32,
) -> Option<InstanceBatch> {
    scan_columns(chunk, neighborhood, BatchKind::SnowCap, |surface, push| {
        if surface >= threshold {
            push(surface);
        }
    })
}

/// Every cell between the visible surface and `sea_level`, inclusive of sea level.
pub fn water_fill_overlay<N: Neighborhood + ?Sized>(
    chunk: &ChunkVoxels,
    neighborhood: &N,
    sea_level: i32,
) -> Option<InstanceBatch> {
    scan_columns(chunk, neighborhood, BatchKind::WaterSurface, |surface, push| {
        for y in surface + 1..=sea_level {
            push(y);
        }
    })
}
