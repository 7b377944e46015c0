//! Central owner for all generated chunks and the removed-cells overlay.
//!
//! The [`ChunkManager`] is the single authority for which chunks exist, what
//! the player has dug out, and which foliage cells collide. Every public
//! operation takes `&self`, so one manager can be shared behind an `Arc`
//! between the streamer's workers and the host.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, RwLock};
use std::time::Instant;

use dashmap::DashMap;
use glam::IVec3;
use rustc_hash::FxHashSet;
use tracing::{debug, info};
use voxpost_config::Config;
use voxpost_mesh::{
    BatchKind, InstanceBatch, MeshInvalidator, Neighborhood, build_chunk_instances,
    foliage_instances, snow_cap_overlay, visible_surface,
};
use voxpost_terrain::{Biome, ChunkFoliage, TerrainGenerator, place_foliage};
use voxpost_voxel::{ChunkCoord, ChunkLayout, ChunkVoxels, RemovedCells, VoxelKind};

use crate::entry::ChunkEntry;
use crate::error::WorldError;
use crate::settings::WorldSettings;
use crate::stats::WorldStats;
use crate::sync::{read_lock, write_lock};

/// Per-coordinate slot. The `OnceLock` is the in-flight marker: concurrent
/// `ensure_chunk` calls for one coordinate block on the same initialisation.
type ChunkSlot = Arc<OnceLock<Arc<ChunkEntry>>>;

/// Owns generated chunks, the removed-cells overlay and the foliage
/// collision set.
pub struct ChunkManager {
    generator: TerrainGenerator,
    settings: WorldSettings,
    layout: ChunkLayout,
    chunks: DashMap<ChunkCoord, ChunkSlot>,
    removed: RwLock<RemovedCells>,
    foliage_cells: RwLock<FxHashSet<IVec3>>,
    clock: AtomicU64,
}

/// The mesher's view of the world: overlay plus generated data, loaded or not.
struct WorldView<'a> {
    manager: &'a ChunkManager,
    removed: &'a RemovedCells,
}

impl Neighborhood for WorldView<'_> {
    fn is_removed(&self, cell: IVec3) -> bool {
        self.removed.contains(cell)
    }

    fn outside_kind(&self, cell: IVec3) -> VoxelKind {
        self.manager.generated_kind(cell)
    }
}

impl ChunkManager {
    /// Builds the generator and chunk layout for `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] for invalid terrain parameters or chunk size.
    pub fn new(settings: WorldSettings) -> Result<Self, WorldError> {
        let generator = TerrainGenerator::new(settings.params.clone())?;
        let layout = generator.layout(settings.chunk_size, settings.headroom)?;
        info!(
            seed = settings.params.seed,
            size_x = layout.size_x(),
            size_y = layout.size_y(),
            size_z = layout.size_z(),
            "chunk manager ready"
        );
        Ok(Self {
            generator,
            settings,
            layout,
            chunks: DashMap::new(),
            removed: RwLock::new(RemovedCells::new()),
            foliage_cells: RwLock::new(FxHashSet::default()),
            clock: AtomicU64::new(0),
        })
    }

    /// Builds a manager from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] for an unknown preset or invalid chunk size.
    pub fn from_config(config: &Config) -> Result<Self, WorldError> {
        Self::new(WorldSettings::from_config(config)?)
    }

    /// The terrain generator shared by every chunk.
    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Chunk dimensions.
    pub fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    /// Resolved settings.
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Pure terrain height at world column `(x, z)`, ignoring edits.
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        self.generator.height_at(x, z)
    }

    /// Biome at world column `(x, z)`.
    pub fn biome_at(&self, x: i32, z: i32) -> Biome {
        self.generator.biome_at(x, z)
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The chunk at `coord` if its generation has finished.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<Arc<ChunkEntry>> {
        self.chunks
            .get(&coord)
            .and_then(|slot| slot.value().get().cloned())
    }

    /// Whether `coord` has finished generating.
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunk(coord).is_some()
    }

    /// Number of chunks with finished generation.
    pub fn loaded_count(&self) -> usize {
        self.chunks.iter().filter(|slot| slot.value().get().is_some()).count()
    }

    /// Every loaded chunk, ordered by coordinate.
    pub fn loaded_chunks(&self) -> Vec<Arc<ChunkEntry>> {
        let mut entries: Vec<Arc<ChunkEntry>> = self
            .chunks
            .iter()
            .filter_map(|slot| slot.value().get().cloned())
            .collect();
        entries.sort_by_key(|entry| entry.coord());
        entries
    }

    /// Generates the chunk at `coord` unless it already exists.
    ///
    /// Idempotent: later calls return the same entry. Concurrent calls for one
    /// coordinate wait for a single generation instead of duplicating it.
    pub fn ensure_chunk(&self, coord: ChunkCoord) -> Arc<ChunkEntry> {
        let slot: ChunkSlot = Arc::clone(self.chunks.entry(coord).or_default().value());
        let entry = slot.get_or_init(|| Arc::new(self.generate_entry(coord)));
        entry.touch(self.tick());
        Arc::clone(entry)
    }

    fn generate_entry(&self, coord: ChunkCoord) -> ChunkEntry {
        let start = Instant::now();
        let params = self.generator.params();
        let voxels = self.generator.generate_chunk_voxels(coord, self.layout);
        let foliage = place_foliage(params.seed, params.sea_level, &voxels);
        let batches = {
            let removed = read_lock(&self.removed);
            self.build_batches(&voxels, &foliage, &removed)
        };
        write_lock(&self.foliage_cells).extend(foliage.collidable_cells());

        debug!(
            cx = coord.x,
            cz = coord.z,
            foliage = foliage.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "generated chunk"
        );
        ChunkEntry::new(voxels, foliage, batches)
    }

    fn build_batches(
        &self,
        voxels: &ChunkVoxels,
        foliage: &ChunkFoliage,
        removed: &RemovedCells,
    ) -> Vec<InstanceBatch> {
        let view = WorldView {
            manager: self,
            removed,
        };
        let mut batches = build_chunk_instances(voxels, &view);
        batches.extend(foliage_instances(foliage));
        if self.settings.snow_caps
            && let Some(caps) = snow_cap_overlay(voxels, &view, self.settings.snow_line())
        {
            batches.push(caps);
        }
        batches
    }

    /// Entry for `coord`, blocking while another thread is still generating
    /// it. `None` only when no slot exists.
    fn settled_chunk(&self, coord: ChunkCoord) -> Option<Arc<ChunkEntry>> {
        // Clone the slot out so the map shard is not held while waiting.
        let slot: ChunkSlot = self.chunks.get(&coord).map(|s| Arc::clone(s.value()))?;
        Some(Arc::clone(slot.wait()))
    }

    /// Re-runs the visibility pass of a chunk against the current overlay.
    ///
    /// A chunk that is mid-generation is waited for and then rebuilt, since
    /// its batches may predate the latest edit. Returns `false` when the
    /// chunk is neither loaded nor generating.
    pub fn rebuild_chunk(&self, coord: ChunkCoord) -> bool {
        let Some(entry) = self.settled_chunk(coord) else {
            return false;
        };
        let start = Instant::now();
        let batches = {
            let removed = read_lock(&self.removed);
            self.build_batches(entry.voxels(), entry.foliage(), &removed)
        };
        entry.replace_batches(batches);
        debug!(
            cx = coord.x,
            cz = coord.z,
            elapsed_us = start.elapsed().as_micros() as u64,
            "rebuilt chunk"
        );
        true
    }

    /// Generated kind of a world cell, from loaded data when available and
    /// the pure generator otherwise. Ignores the overlay.
    fn generated_kind(&self, cell: IVec3) -> VoxelKind {
        if cell.y < 0 {
            return VoxelKind::Stone;
        }
        if !self.layout.contains_y(cell.y) {
            return VoxelKind::Air;
        }
        let (coord, local) = self.layout.locate(cell);
        match self.chunk(coord) {
            Some(entry) => entry
                .voxels()
                .get(local.x as usize, local.y as usize, local.z as usize),
            None => self.generator.kind_at(cell.x, cell.y, cell.z),
        }
    }

    /// Chunks whose visibility depends on `cell`.
    fn dependents(&self, cell: IVec3) -> Vec<ChunkCoord> {
        let (coord, local) = self.layout.locate(cell);
        MeshInvalidator::invalidate(coord, local.x as usize, local.z as usize, &self.layout)
    }

    fn rebuild_all(&self, coords: impl IntoIterator<Item = ChunkCoord>) -> usize {
        coords.into_iter().filter(|&c| self.rebuild_chunk(c)).count()
    }

    /// Marks a world cell as removed and rebuilds every loaded chunk whose
    /// mesh depends on it.
    ///
    /// Returns `false` if the cell was already removed, in which case nothing
    /// is rebuilt.
    pub fn remove_terrain_block_at_world(&self, cell: IVec3) -> bool {
        if !write_lock(&self.removed).insert(cell) {
            return false;
        }
        let rebuilt = self.rebuild_all(self.dependents(cell));
        debug!(x = cell.x, y = cell.y, z = cell.z, rebuilt, "removed terrain block");
        true
    }

    /// Undoes a removal and rebuilds the same chunks.
    ///
    /// Returns `false` if the cell was not removed.
    pub fn restore_terrain_block_at_world(&self, cell: IVec3) -> bool {
        if !write_lock(&self.removed).remove(cell) {
            return false;
        }
        let rebuilt = self.rebuild_all(self.dependents(cell));
        debug!(x = cell.x, y = cell.y, z = cell.z, rebuilt, "restored terrain block");
        true
    }

    /// Loads a persisted overlay, rebuilding each affected loaded chunk once.
    ///
    /// Returns how many cells were newly added.
    pub fn replay_removed_cells(&self, cells: impl IntoIterator<Item = IVec3>) -> usize {
        let mut dirty: FxHashSet<ChunkCoord> = FxHashSet::default();
        let mut added = 0;
        {
            let mut removed = write_lock(&self.removed);
            for cell in cells {
                if removed.insert(cell) {
                    added += 1;
                    dirty.extend(self.dependents(cell));
                }
            }
        }
        let rebuilt = self.rebuild_all(dirty);
        info!(added, rebuilt, "replayed removed cells");
        added
    }

    /// The overlay's cells in sorted order, for persistence.
    pub fn removed_cells(&self) -> Vec<IVec3> {
        let mut cells: Vec<IVec3> = read_lock(&self.removed).iter().collect();
        cells.sort_by_key(|c| (c.x, c.y, c.z));
        cells
    }

    /// Whether the world cell is solid terrain.
    ///
    /// The overlay wins, then loaded chunk data, then the pure generator, so
    /// the answer never waits on generation.
    pub fn is_terrain_solid_at_world(&self, cell: IVec3) -> bool {
        if read_lock(&self.removed).contains(cell) {
            return false;
        }
        self.generated_kind(cell).is_solid()
    }

    /// Topmost solid, non-removed cell of world column `(x, z)`, or `None`
    /// when the column has been dug out to the bottom.
    pub fn get_surface_height_at(&self, x: i32, z: i32) -> Option<i32> {
        let removed = read_lock(&self.removed);
        let (coord, local) = self.layout.locate(IVec3::new(x, 0, z));
        match self.chunk(coord) {
            Some(entry) => {
                let view = WorldView {
                    manager: self,
                    removed: &removed,
                };
                visible_surface(entry.voxels(), &view, local.x as usize, local.z as usize)
            }
            None => (0..=self.generator.height_at(x, z)).rev().find(|&y| {
                !removed.contains(IVec3::new(x, y, z)) && self.generator.kind_at(x, y, z).is_solid()
            }),
        }
    }

    /// Instance batches of every loaded chunk, merged into one batch per kind.
    pub fn get_all_terrain_meshes(&self) -> Vec<InstanceBatch> {
        let mut merged: BTreeMap<BatchKind, Vec<IVec3>> = BTreeMap::new();
        for entry in self.loaded_chunks() {
            entry.with_batches(|batches| {
                for batch in batches {
                    merged
                        .entry(batch.kind)
                        .or_default()
                        .extend_from_slice(&batch.positions);
                }
            });
        }
        merged
            .into_iter()
            .map(|(kind, positions)| InstanceBatch { kind, positions })
            .collect()
    }

    /// Snapshot of every collidable foliage cell in loaded chunks.
    pub fn get_foliage_collision_cells(&self) -> FxHashSet<IVec3> {
        read_lock(&self.foliage_cells).clone()
    }

    /// Whether a trunk or cactus occupies the world cell.
    pub fn is_foliage_solid_at(&self, cell: IVec3) -> bool {
        read_lock(&self.foliage_cells).contains(&cell)
    }

    /// Evicts least recently touched chunks farther than `keep_radius` from
    /// `center` until at most `max_loaded_chunks` remain.
    ///
    /// The overlay is kept, so an evicted chunk regenerates identically.
    /// Returns the number of chunks evicted; always `0` when the cap is unset.
    pub fn evict_outside(&self, center: ChunkCoord, keep_radius: u32) -> usize {
        let cap = self.settings.max_loaded_chunks;
        if cap == 0 {
            return 0;
        }
        let loaded = self.loaded_chunks();
        if loaded.len() <= cap {
            return 0;
        }
        let excess = loaded.len() - cap;

        let mut candidates: Vec<Arc<ChunkEntry>> = loaded
            .into_iter()
            .filter(|entry| entry.coord().chebyshev_distance(center) > keep_radius)
            .collect();
        candidates.sort_by_key(|entry| (entry.last_touched(), entry.coord()));

        let mut evicted = 0;
        for entry in candidates.into_iter().take(excess) {
            if self.chunks.remove(&entry.coord()).is_none() {
                continue;
            }
            let mut cells = write_lock(&self.foliage_cells);
            for cell in entry.foliage().collidable_cells() {
                cells.remove(&cell);
            }
            evicted += 1;
        }
        if evicted > 0 {
            info!(evicted, cx = center.x, cz = center.z, "evicted chunks");
        }
        evicted
    }

    /// Current counters.
    pub fn stats(&self) -> WorldStats {
        let loaded = self.loaded_chunks();
        WorldStats {
            loaded_chunks: loaded.len(),
            removed_cells: read_lock(&self.removed).len(),
            foliage_collision_cells: read_lock(&self.foliage_cells).len(),
            total_instances: loaded.iter().map(|e| e.instance_count()).sum(),
        }
    }
}
