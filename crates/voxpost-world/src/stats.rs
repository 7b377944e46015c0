//! World-wide counters for logging and the worldgen report.

use std::fmt;

/// Snapshot of a world's memory-relevant counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunks with finished generation.
    pub loaded_chunks: usize,
    /// Cells in the removed-cells overlay.
    pub removed_cells: usize,
    /// Collidable foliage cells (trunks and cacti).
    pub foliage_collision_cells: usize,
    /// Instances across every loaded chunk's batches.
    pub total_instances: usize,
}

impl fmt::Display for WorldStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} chunks, {} instances, {} removed cells, {} foliage colliders",
            self.loaded_chunks, self.total_instances, self.removed_cells, self.foliage_collision_cells
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_every_counter() {
        let stats = WorldStats {
            loaded_chunks: 9,
            removed_cells: 2,
            foliage_collision_cells: 14,
            total_instances: 30_000,
        };
        assert_eq!(
            stats.to_string(),
            "9 chunks, 30000 instances, 2 removed cells, 14 foliage colliders"
        );
    }
}
