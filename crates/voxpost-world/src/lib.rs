//! Chunk ownership and streaming: on-demand generation, the removed-cells
//! overlay with boundary-aware rebuilds, world queries and a worker-pool
//! streamer.

mod entry;
mod error;
mod manager;
mod settings;
mod stats;
mod streamer;
mod sync;

pub use entry::ChunkEntry;
pub use error::WorldError;
pub use manager::ChunkManager;
pub use settings::WorldSettings;
pub use stats::WorldStats;
pub use streamer::{ChunkStreamer, MAX_STREAM_RADIUS};
