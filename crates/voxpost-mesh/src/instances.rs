//! Per-kind instance batches: the render boundary of a meshed chunk.

use std::time::Instant;

use glam::IVec3;
use serde::{Deserialize, Serialize};
use voxpost_terrain::ChunkFoliage;
use voxpost_voxel::{ChunkVoxels, VoxelKind};

use crate::neighborhood::Neighborhood;
use crate::visibility::is_cell_visible;

/// What a batch draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BatchKind {
    /// Full blocks of one voxel kind.
    Block(VoxelKind),
    /// Thin snow layer on high surfaces.
    SnowCap,
    /// Water filled up to sea level, for renderers that draw water apart
    /// from terrain.
    WaterSurface,
}

impl BatchKind {
    /// Stable external material identifier.
    pub fn material_name(self) -> &'static str {
        match self {
            Self::Block(kind) => kind.material_name(),
            Self::SnowCap => "snow_cap",
            Self::WaterSurface => "water_surface",
        }
    }
}

/// World-space cell positions sharing one [`BatchKind`], drawn with one
/// instanced call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceBatch {
    /// Kind shared by every instance.
    pub kind: BatchKind,
    /// World cell coordinates.
    pub positions: Vec<IVec3>,
}

impl InstanceBatch {
    /// Number of instances.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the batch has no instances.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Collects positions per voxel kind and emits non-empty batches in
/// discriminant order.
#[derive(Default)]
struct KindBuckets {
    buckets: [Vec<IVec3>; VoxelKind::ALL.len()],
}

impl KindBuckets {
    fn push(&mut self, kind: VoxelKind, position: IVec3) {
        self.buckets[kind.as_u8() as usize].push(position);
    }

    fn into_batches(self) -> Vec<InstanceBatch> {
        VoxelKind::ALL
            .into_iter()
            .zip(self.buckets)
            .filter(|(_, positions)| !positions.is_empty())
            .map(|(kind, positions)| InstanceBatch {
                kind: BatchKind::Block(kind),
                positions,
            })
            .collect()
    }
}

/// Builds one batch per non-air kind holding every visible cell of the chunk.
///
/// Cells the neighborhood reports as removed are treated as air both for
/// themselves and for their neighbors' visibility.
pub fn build_chunk_instances<N: Neighborhood + ?Sized>(
    chunk: &ChunkVoxels,
    neighborhood: &N,
) -> Vec<InstanceBatch> {
    let start = Instant::now();
    let layout = chunk.layout();
    let coord = chunk.coord();
    let mut buckets = KindBuckets::default();

    for z in 0..layout.size_z() {
        for y in 0..layout.size_y() {
            for x in 0..layout.size_x() {
                let kind = chunk.get(x, y, z);
                if kind.is_air() || !is_cell_visible(chunk, neighborhood, x, y, z) {
                    continue;
                }
                buckets.push(kind, layout.local_to_world(coord, x, y, z));
            }
        }
    }

    let batches = buckets.into_batches();
    tracing::debug!(
        cx = coord.x,
        cz = coord.z,
        batches = batches.len(),
        instances = batches.iter().map(InstanceBatch::len).sum::<usize>(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "built chunk instances"
    );
    batches
}

/// Batches for placed foliage: trunks as wood, cactus bodies and leaves.
pub fn foliage_instances(foliage: &ChunkFoliage) -> Vec<InstanceBatch> {
    let mut buckets = KindBuckets::default();
    for (kind, position) in foliage.cells() {
        buckets.push(kind, position);
    }
    buckets.into_batches()
}
