//! Deterministic foliage: trees on grass and snow, cacti on sand.
//!
//! Placement is derived, never stored. Each chunk draws from its own
//! [`chunk_rng`] in a fixed column order, so a chunk regenerated after an
//! edit or an eviction yields the same structures.

use glam::IVec3;
use rand::Rng;
use voxpost_voxel::{ChunkVoxels, VoxelKind};

use crate::seed::chunk_rng;

/// Columns this close to the chunk edge never host foliage, which keeps every
/// canopy inside its own chunk.
const EDGE_MARGIN: usize = 2;
/// Minimum Chebyshev distance between two structure bases in one chunk.
const MIN_SPACING: i32 = 3;

/// Foliage archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FoliageKind {
    /// Broad-canopy tree on grass.
    Tree,
    /// Narrow conifer on snow.
    SnowTree,
    /// Desert cactus.
    Cactus,
}

impl FoliageKind {
    /// Archetype growing on a surface material, with its per-column chance.
    fn for_surface(top: VoxelKind) -> Option<(Self, f64)> {
        match top {
            VoxelKind::Grass => Some((Self::Tree, 0.012)),
            VoxelKind::Snow => Some((Self::SnowTree, 0.006)),
            VoxelKind::Sand => Some((Self::Cactus, 0.004)),
            _ => None,
        }
    }

    /// Kind of the collidable body cells.
    pub fn body_kind(self) -> VoxelKind {
        match self {
            Self::Tree | Self::SnowTree => VoxelKind::Wood,
            Self::Cactus => VoxelKind::Cactus,
        }
    }

    /// Cells above the base the structure may occupy at most.
    fn max_extent(self) -> i32 {
        match self {
            Self::Tree => 7,
            Self::SnowTree => 6,
            Self::Cactus => 4,
        }
    }
}

/// One placed tree or cactus, in world cell coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoliageStructure {
    /// Archetype.
    pub kind: FoliageKind,
    /// Lowest body cell, directly above the surface.
    pub base: IVec3,
    /// Collidable cells (trunk or cactus body).
    pub body: Vec<IVec3>,
    /// Rendered but non-collidable leaf cells.
    pub canopy: Vec<IVec3>,
}

/// All foliage placed in one chunk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkFoliage {
    structures: Vec<FoliageStructure>,
}

impl ChunkFoliage {
    /// Placed structures in placement order.
    pub fn structures(&self) -> &[FoliageStructure] {
        &self.structures
    }

    /// Number of placed structures.
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    /// Whether nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Every collidable cell.
    pub fn collidable_cells(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.structures.iter().flat_map(|s| s.body.iter().copied())
    }

    /// Every rendered cell with its kind.
    pub fn cells(&self) -> impl Iterator<Item = (VoxelKind, IVec3)> + '_ {
        self.structures.iter().flat_map(|s| {
            let body = s.kind.body_kind();
            s.body
                .iter()
                .map(move |&p| (body, p))
                .chain(s.canopy.iter().map(|&p| (VoxelKind::Leaves, p)))
        })
    }
}

/// Places foliage on a generated chunk.
///
/// A column qualifies when its surface lies above `sea_level`, its top cell
/// is a foliage-bearing material, it is at least [`EDGE_MARGIN`] cells from
/// the chunk edge and [`MIN_SPACING`] from earlier bases, and the structure
/// fits in open air below the chunk ceiling.
pub fn place_foliage(world_seed: u32, sea_level: i32, chunk: &ChunkVoxels) -> ChunkFoliage {
    let layout = *chunk.layout();
    let coord = chunk.coord();
    let mut rng = chunk_rng(world_seed, coord);
    let mut structures: Vec<FoliageStructure> = Vec::new();

    if layout.size_x() <= 2 * EDGE_MARGIN || layout.size_z() <= 2 * EDGE_MARGIN {
        return ChunkFoliage { structures };
    }

    for lz in EDGE_MARGIN..layout.size_z() - EDGE_MARGIN {
        for lx in EDGE_MARGIN..layout.size_x() - EDGE_MARGIN {
            let roll: f64 = rng.random();
            let surface = chunk.height(lx, lz);
            if surface <= sea_level {
                continue;
            }
            let top = chunk.get(lx, surface as usize, lz);
            let Some((kind, density)) = FoliageKind::for_surface(top) else {
                continue;
            };
            if roll >= density {
                continue;
            }
            if surface + kind.max_extent() >= layout.size_y() as i32 {
                continue;
            }
            let base = layout.local_to_world(coord, lx, surface as usize + 1, lz);
            let crowded = structures.iter().any(|s| {
                (s.base.x - base.x).abs().max((s.base.z - base.z).abs()) < MIN_SPACING
            });
            if crowded {
                continue;
            }

            let body_len = match kind {
                FoliageKind::Tree | FoliageKind::SnowTree => rng.random_range(3..=5),
                FoliageKind::Cactus => rng.random_range(2..=4),
            };
            let body: Vec<IVec3> = (0..body_len).map(|dy| base + IVec3::Y * dy).collect();
            let free = |p: IVec3| {
                let (lx, ly, lz) = local_of(chunk, p);
                chunk.get_checked(lx, ly, lz).is_some_and(|k| k.is_air())
            };
            if !body.iter().all(|&p| free(p)) {
                continue;
            }

            let top_body = base + IVec3::Y * (body_len - 1);
            let canopy: Vec<IVec3> = canopy_offsets(kind)
                .into_iter()
                .map(|o| top_body + o)
                .filter(|&p| free(p))
                .collect();

            structures.push(FoliageStructure {
                kind,
                base,
                body,
                canopy,
            });
        }
    }

    tracing::trace!(
        cx = coord.x,
        cz = coord.z,
        count = structures.len(),
        "placed foliage"
    );
    ChunkFoliage { structures }
}

fn local_of(chunk: &ChunkVoxels, p: IVec3) -> (i32, i32, i32) {
    let (ox, oz) = chunk.layout().chunk_origin(chunk.coord());
    (p.x - ox, p.y, p.z - oz)
}

/// Leaf offsets relative to the topmost body cell.
fn canopy_offsets(kind: FoliageKind) -> Vec<IVec3> {
    let mut out = Vec::new();
    match kind {
        FoliageKind::Tree => {
            for dy in -1..=0 {
                for dz in -2..=2_i32 {
                    for dx in -2..=2_i32 {
                        let corner = dx.abs() == 2 && dz.abs() == 2;
                        if !corner && (dx, dz) != (0, 0) {
                            out.push(IVec3::new(dx, dy, dz));
                        }
                    }
                }
            }
            for dz in -1..=1 {
                for dx in -1..=1 {
                    out.push(IVec3::new(dx, 1, dz));
                }
            }
            out.push(IVec3::new(0, 2, 0));
        }
        FoliageKind::SnowTree => {
            for dy in -1..=0 {
                for dz in -1..=1 {
                    for dx in -1..=1 {
                        if (dx, dz) != (0, 0) {
                            out.push(IVec3::new(dx, dy, dz));
                        }
                    }
                }
            }
            out.push(IVec3::new(0, 1, 0));
        }
        FoliageKind::Cactus => {}
    }
    out
}
