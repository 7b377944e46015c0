//! A generated chunk as the manager stores it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use voxpost_mesh::InstanceBatch;
use voxpost_terrain::ChunkFoliage;
use voxpost_voxel::{ChunkCoord, ChunkVoxels};

use crate::sync::{read_lock, write_lock};

/// Voxels, foliage and the current instance batches of one chunk.
///
/// Voxels and foliage never change after generation; only the batches are
/// replaced when an edit forces a rebuild.
#[derive(Debug)]
pub struct ChunkEntry {
    voxels: ChunkVoxels,
    foliage: ChunkFoliage,
    batches: RwLock<Vec<InstanceBatch>>,
    last_touched: AtomicU64,
    rebuilds: AtomicU64,
}

impl ChunkEntry {
    pub(crate) fn new(voxels: ChunkVoxels, foliage: ChunkFoliage, batches: Vec<InstanceBatch>) -> Self {
        Self {
            voxels,
            foliage,
            batches: RwLock::new(batches),
            last_touched: AtomicU64::new(0),
            rebuilds: AtomicU64::new(0),
        }
    }

    /// The chunk's grid coordinate.
    pub fn coord(&self) -> ChunkCoord {
        self.voxels.coord()
    }

    /// Generated voxel data, untouched by edits.
    pub fn voxels(&self) -> &ChunkVoxels {
        &self.voxels
    }

    /// Placed foliage.
    pub fn foliage(&self) -> &ChunkFoliage {
        &self.foliage
    }

    /// Snapshot of the current instance batches.
    pub fn batches(&self) -> Vec<InstanceBatch> {
        read_lock(&self.batches).clone()
    }

    /// Runs `f` over the current batches without cloning them.
    pub fn with_batches<R>(&self, f: impl FnOnce(&[InstanceBatch]) -> R) -> R {
        f(&read_lock(&self.batches))
    }

    /// Total instances across all batches.
    pub fn instance_count(&self) -> usize {
        self.with_batches(|batches| batches.iter().map(InstanceBatch::len).sum())
    }

    /// How many times the batches were rebuilt after generation.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }

    /// Logical time of the last access, for eviction ordering.
    pub fn last_touched(&self) -> u64 {
        self.last_touched.load(Ordering::Relaxed)
    }

    pub(crate) fn touch(&self, tick: u64) {
        self.last_touched.fetch_max(tick, Ordering::Relaxed);
    }

    pub(crate) fn replace_batches(&self, batches: Vec<InstanceBatch>) {
        *write_lock(&self.batches) = batches;
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
    }
}
