//! World-wide record of terrain cells a player has dug out.
//!
//! A cell present here is Air regardless of what generation produced for it.
//! Keys are the integer cell position itself, hashed directly.

use glam::IVec3;
use rustc_hash::FxHashSet;

/// Sparse set of removed terrain cells in world coordinates.
#[derive(Clone, Debug, Default)]
pub struct RemovedCells {
    cells: FxHashSet<IVec3>,
}

impl RemovedCells {
    /// Creates an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a cell removed. Returns `true` if it was not already removed.
    pub fn insert(&mut self, cell: IVec3) -> bool {
        self.cells.insert(cell)
    }

    /// Clears the removed mark. Returns `true` if the cell was removed.
    pub fn remove(&mut self, cell: IVec3) -> bool {
        self.cells.remove(&cell)
    }

    /// Whether the exact cell has been removed.
    #[inline]
    pub fn contains(&self, cell: IVec3) -> bool {
        self.cells.contains(&cell)
    }

    /// Number of removed cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if nothing has been removed.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over removed cells in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.cells.iter().copied()
    }
}

impl FromIterator<IVec3> for RemovedCells {
    fn from_iter<I: IntoIterator<Item = IVec3>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Extend<IVec3> for RemovedCells {
    fn extend<I: IntoIterator<Item = IVec3>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}
