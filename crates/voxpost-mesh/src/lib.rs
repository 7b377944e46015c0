//! Chunk meshing for instanced rendering: visibility culling, per-kind
//! instance batches, column overlays and edit invalidation.

pub mod face_direction;
pub mod instances;
pub mod invalidation;
pub mod neighborhood;
pub mod overlays;
pub mod visibility;

pub use face_direction::FaceDirection;
pub use instances::{BatchKind, InstanceBatch, build_chunk_instances, foliage_instances};
pub use invalidation::MeshInvalidator;
pub use neighborhood::{FnNeighborhood, Isolated, Neighborhood, effective_kind};
pub use overlays::{snow_cap_overlay, visible_surface, water_fill_overlay};
pub use visibility::{exposes, is_cell_visible};
