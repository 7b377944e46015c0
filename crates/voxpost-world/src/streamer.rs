//! Radius streaming of chunks around a moving position.
//!
//! Missing chunks are handed to a pool of worker threads and generated
//! through [`ChunkManager::ensure_chunk`], so a chunk requested both by a
//! worker and by the caller is still generated exactly once. Completed
//! coordinates come back over a bounded channel for the host to drain once per
//! frame; completions that do not fit are dropped, since the chunk itself is
//! already in the manager.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use dashmap::DashMap;
use tracing::{debug, info};
use voxpost_config::Config;
use voxpost_voxel::ChunkCoord;

use crate::entry::ChunkEntry;
use crate::error::WorldError;
use crate::manager::ChunkManager;

/// Largest accepted streaming radius, in chunks.
pub const MAX_STREAM_RADIUS: u32 = 16;

/// Keeps every chunk within a Chebyshev radius of the player generated.
pub struct ChunkStreamer {
    manager: Arc<ChunkManager>,
    radius: u32,
    /// `None` once shutdown has begun.
    task_sender: Option<Sender<ChunkCoord>>,
    completed: Receiver<ChunkCoord>,
    completion_capacity: usize,
    /// Coordinates queued or being generated by a worker.
    pending: Arc<DashMap<ChunkCoord, ()>>,
    in_flight: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
    center: Option<ChunkCoord>,
}

impl ChunkStreamer {
    /// Starts `worker_threads` generation workers (`0` picks a count from the
    /// number of CPUs).
    ///
    /// The completion channel holds two full working sets; see
    /// [`ChunkStreamer::completion_capacity`].
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidStreamRadius`] when `radius` exceeds
    /// [`MAX_STREAM_RADIUS`], or [`WorldError::WorkerSpawn`] if a worker thread
    /// cannot be started.
    pub fn new(
        manager: Arc<ChunkManager>,
        radius: u32,
        worker_threads: usize,
    ) -> Result<Self, WorldError> {
        if radius > MAX_STREAM_RADIUS {
            return Err(WorldError::InvalidStreamRadius {
                radius,
                max: MAX_STREAM_RADIUS,
            });
        }
        let thread_count = if worker_threads == 0 {
            (num_cpus::get().max(2) - 2).max(1)
        } else {
            worker_threads
        };

        let (task_sender, task_receiver) = unbounded::<ChunkCoord>();
        let side = 2 * radius as usize + 1;
        let completion_capacity = 2 * side * side;
        let (done_sender, completed) = bounded::<ChunkCoord>(completion_capacity);
        let pending = Arc::new(DashMap::new());
        let in_flight = Arc::new(AtomicU64::new(0));
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut workers = Vec::with_capacity(thread_count);
        for _ in 0..thread_count {
            let receiver = task_receiver.clone();
            let sender = done_sender.clone();
            let manager = Arc::clone(&manager);
            let pending: Arc<DashMap<ChunkCoord, ()>> = Arc::clone(&pending);
            let in_flight = Arc::clone(&in_flight);
            let shutdown = Arc::clone(&shutdown);

            let handle = std::thread::Builder::new()
                .name("chunk-gen-worker".into())
                .spawn(move || {
                    while let Ok(coord) = receiver.recv() {
                        if !shutdown.load(Ordering::Relaxed) {
                            manager.ensure_chunk(coord);
                            // Full means the host stopped draining.
                            let _ = sender.try_send(coord);
                        }
                        pending.remove(&coord);
                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })?;
            workers.push(handle);
        }
        debug!(workers = thread_count, radius, "chunk streamer started");

        Ok(Self {
            manager,
            radius,
            task_sender: Some(task_sender),
            completed,
            completion_capacity,
            pending,
            in_flight,
            shutdown,
            workers,
            center: None,
        })
    }

    /// Streamer with radius and worker count from `config.streaming`.
    ///
    /// # Errors
    ///
    /// See [`ChunkStreamer::new`].
    pub fn from_config(manager: Arc<ChunkManager>, config: &Config) -> Result<Self, WorldError> {
        Self::new(
            manager,
            config.streaming.radius,
            config.streaming.worker_threads as usize,
        )
    }

    /// The shared manager.
    pub fn manager(&self) -> &Arc<ChunkManager> {
        &self.manager
    }

    /// Streaming radius in chunks.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Chunk containing the last position passed to an update.
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// Coordinates wanted around `center`, nearest first.
    pub fn wanted(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        center.square_around(self.radius)
    }

    fn recenter(&mut self, x: f64, z: f64) -> ChunkCoord {
        let center = self.manager.layout().chunk_of_position(x, z);
        if self.center != Some(center) {
            info!(
                cx = center.x,
                cz = center.z,
                radius = self.radius,
                loaded = self.manager.loaded_count(),
                "streaming center changed"
            );
            self.center = Some(center);
        }
        center
    }

    /// Queues every missing chunk around world position `(x, z)` for
    /// background generation and evicts stale chunks if a cap is configured.
    ///
    /// Cheap once the working set is stable. Returns how many chunks were
    /// newly queued.
    pub fn update(&mut self, x: f64, z: f64) -> usize {
        let center = self.recenter(x, z);
        let Some(sender) = &self.task_sender else {
            return 0;
        };
        let mut submitted = 0;
        for coord in self.wanted(center) {
            if self.manager.is_loaded(coord) || self.pending.insert(coord, ()).is_some() {
                continue;
            }
            self.in_flight.fetch_add(1, Ordering::Relaxed);
            if sender.send(coord).is_err() {
                self.pending.remove(&coord);
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                continue;
            }
            submitted += 1;
        }
        if submitted > 0 {
            debug!(submitted, cx = center.x, cz = center.z, "queued chunks");
        }
        self.manager.evict_outside(center, self.radius);
        submitted
    }

    /// Like [`ChunkStreamer::update`], but returns only once every chunk in
    /// the radius is generated, helping with generation on the calling thread.
    pub fn update_blocking(&mut self, x: f64, z: f64) -> Vec<Arc<ChunkEntry>> {
        self.update(x, z);
        let center = self.recenter(x, z);
        self.wanted(center)
            .into_iter()
            .map(|coord| self.manager.ensure_chunk(coord))
            .collect()
    }

    /// Coordinates finished by workers since the last drain, at most
    /// [`ChunkStreamer::completion_capacity`] of them.
    pub fn drain_completed(&self) -> Vec<ChunkCoord> {
        self.completed.try_iter().collect()
    }

    /// How many undrained completions are kept before further ones are dropped.
    pub fn completion_capacity(&self) -> usize {
        self.completion_capacity
    }

    /// Chunks queued or generating on workers.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Whether a worker still owes `coord`.
    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.pending.contains_key(&coord)
    }
}

impl Drop for ChunkStreamer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Closing the channel ends each worker's receive loop.
        self.task_sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use voxpost_terrain::{BiomePreset, TerrainParams};

    use super::*;
    use crate::settings::WorldSettings;

    fn shared_manager(max_loaded_chunks: usize) -> Arc<ChunkManager> {
        let mut settings = WorldSettings::new(TerrainParams::for_preset(BiomePreset::Greenery, 7));
        settings.chunk_size = 16;
        settings.headroom = 4;
        settings.max_loaded_chunks = max_loaded_chunks;
        Arc::new(ChunkManager::new(settings).expect("valid settings"))
    }

    fn wait_idle(streamer: &ChunkStreamer) {
        let deadline = Instant::now() + Duration::from_secs(30);
        while streamer.in_flight_count() > 0 {
            assert!(Instant::now() < deadline, "workers never drained the queue");
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn test_radius_limit() {
        let result = ChunkStreamer::new(shared_manager(0), MAX_STREAM_RADIUS + 1, 1);
        assert!(matches!(
            result,
            Err(WorldError::InvalidStreamRadius { radius, max }) if radius == MAX_STREAM_RADIUS + 1 && max == MAX_STREAM_RADIUS
        ));
    }

    #[test]
    fn test_wanted_is_nearest_first() {
        let streamer = ChunkStreamer::new(shared_manager(0), 2, 1).expect("streamer");
        let center = ChunkCoord::new(3, -1);
        let wanted = streamer.wanted(center);
        assert_eq!(wanted.len(), 25);
        assert_eq!(wanted[0], center);
        let distances: Vec<u32> = wanted.iter().map(|c| c.chebyshev_distance(center)).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]), "{distances:?}");
    }

    #[test]
    fn test_update_blocking_loads_square() {
        let manager = shared_manager(0);
        let mut streamer = ChunkStreamer::new(Arc::clone(&manager), 1, 2).expect("streamer");
        let entries = streamer.update_blocking(0.0, 0.0);
        assert_eq!(entries.len(), 9);
        for dx in -1..=1 {
            for dz in -1..=1 {
                assert!(manager.is_loaded(ChunkCoord::new(dx, dz)), "({dx}, {dz}) missing");
            }
        }
        wait_idle(&streamer);
        assert_eq!(manager.loaded_count(), 9);
    }

    #[test]
    fn test_background_update_completes() {
        let manager = shared_manager(0);
        let mut streamer = ChunkStreamer::new(Arc::clone(&manager), 1, 3).expect("streamer");
        // World x = 20 lies in chunk 1 for 16-wide chunks.
        let queued = streamer.update(20.0, -3.0);
        assert_eq!(queued, 9);
        assert_eq!(streamer.center(), Some(ChunkCoord::new(1, 0)));
        wait_idle(&streamer);

        let mut done = streamer.drain_completed();
        done.sort();
        let mut expected = ChunkCoord::new(1, 0).square_around(1);
        expected.sort();
        assert_eq!(done, expected);
        assert!(done.iter().all(|&c| !streamer.is_pending(c)));
    }

    #[test]
    fn test_undrained_completions_are_capped() {
        let manager = shared_manager(0);
        let mut streamer = ChunkStreamer::new(Arc::clone(&manager), 0, 1).expect("streamer");
        assert_eq!(streamer.completion_capacity(), 2);
        // Five distinct chunks along x, never drained in between.
        for i in 0..5 {
            assert_eq!(streamer.update(f64::from(i * 16), 0.0), 1);
        }
        wait_idle(&streamer);
        assert_eq!(manager.loaded_count(), 5, "dropped completions must not drop chunks");
        assert_eq!(streamer.drain_completed().len(), 2);

        // Draining frees room again.
        assert_eq!(streamer.update(96.0, 0.0), 1);
        wait_idle(&streamer);
        assert_eq!(streamer.drain_completed(), vec![ChunkCoord::new(6, 0)]);
    }

    #[test]
    fn test_stable_working_set_is_noop() {
        let manager = shared_manager(0);
        let mut streamer = ChunkStreamer::new(Arc::clone(&manager), 1, 1).expect("streamer");
        streamer.update_blocking(0.0, 0.0);
        wait_idle(&streamer);
        assert_eq!(streamer.update(1.0, 1.0), 0);
        assert_eq!(streamer.update(-7.5, 7.5), 0);
    }

    #[test]
    fn test_moving_evicts_when_capped() {
        let manager = shared_manager(9);
        let mut streamer = ChunkStreamer::new(Arc::clone(&manager), 1, 1).expect("streamer");
        streamer.update_blocking(0.0, 0.0);
        wait_idle(&streamer);
        // Five chunks east: a disjoint 3x3 block.
        streamer.update_blocking(80.0, 0.0);
        wait_idle(&streamer);
        streamer.update(80.0, 0.0);
        assert_eq!(manager.loaded_count(), 9);
        for coord in ChunkCoord::new(5, 0).square_around(1) {
            assert!(manager.is_loaded(coord));
        }
        assert!(!manager.is_loaded(ChunkCoord::new(0, 0)));
    }

    #[test]
    fn test_drop_joins_workers() {
        let manager = shared_manager(0);
        {
            let mut streamer = ChunkStreamer::new(Arc::clone(&manager), 2, 2).expect("streamer");
            streamer.update(0.0, 0.0);
        }
        // Only the streamer's clones were released.
        assert_eq!(Arc::strong_count(&manager), 1);
    }
}
