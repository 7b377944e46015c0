//! Closed set of block kinds stored one byte per voxel cell.
//!
//! The numeric discriminants are persisted indirectly (edits reference cell
//! positions whose material is re-derived), so existing values must never be
//! renumbered. New kinds are appended.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single voxel's block kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum VoxelKind {
    /// Empty space.
    #[default]
    Air = 0,
    /// Greenery surface.
    Grass = 1,
    /// Sub-surface soil.
    Dirt = 2,
    /// Deep rock, bedrock floor and rocky mountain surface.
    Stone = 3,
    /// Desert surface and sub-surface.
    Sand = 4,
    /// Sea-level fill and flooded caves.
    Water = 5,
    /// Snow biome surface.
    Snow = 6,
    /// Tree trunk.
    Wood = 7,
    /// Tree canopy.
    Leaves = 8,
    /// Desert cactus body.
    Cactus = 9,
}

/// Returned when a byte does not name any [`VoxelKind`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown voxel kind: {0}")]
pub struct UnknownVoxelKind(pub u8);

impl VoxelKind {
    /// Every kind, in discriminant order.
    pub const ALL: [VoxelKind; 10] = [
        Self::Air,
        Self::Grass,
        Self::Dirt,
        Self::Stone,
        Self::Sand,
        Self::Water,
        Self::Snow,
        Self::Wood,
        Self::Leaves,
        Self::Cactus,
    ];

    /// Returns `true` for empty space.
    #[inline]
    pub fn is_air(self) -> bool {
        self == Self::Air
    }

    /// Returns `true` for water.
    #[inline]
    pub fn is_water(self) -> bool {
        self == Self::Water
    }

    /// Whether the kind fills its cell for terrain collision and face culling.
    /// Air and water do not.
    #[inline]
    pub fn is_solid(self) -> bool {
        !matches!(self, Self::Air | Self::Water)
    }

    /// Compact byte representation.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Material identifier handed to the rendering collaborator.
    ///
    /// Total over the enumeration: adding a kind without a material is a
    /// compile error.
    pub fn material_name(self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::Grass => "grass",
            Self::Dirt => "dirt",
            Self::Stone => "stone",
            Self::Sand => "sand",
            Self::Water => "water",
            Self::Snow => "snow",
            Self::Wood => "wood",
            Self::Leaves => "leaves",
            Self::Cactus => "cactus",
        }
    }
}

impl TryFrom<u8> for VoxelKind {
    type Error = UnknownVoxelKind;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(UnknownVoxelKind(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_is_zero() {
        assert_eq!(VoxelKind::Air.as_u8(), 0);
        assert_eq!(VoxelKind::default(), VoxelKind::Air);
    }

    #[test]
    fn test_discriminants_are_stable() {
        let expected: [(VoxelKind, u8); 7] = [
            (VoxelKind::Air, 0),
            (VoxelKind::Grass, 1),
            (VoxelKind::Dirt, 2),
            (VoxelKind::Stone, 3),
            (VoxelKind::Sand, 4),
            (VoxelKind::Water, 5),
            (VoxelKind::Snow, 6),
        ];
        for (kind, byte) in expected {
            assert_eq!(kind.as_u8(), byte, "{kind:?} changed discriminant");
        }
    }

    #[test]
    fn test_try_from_matches_all_table() {
        for kind in VoxelKind::ALL {
            assert_eq!(VoxelKind::try_from(kind.as_u8()), Ok(kind));
        }
        assert_eq!(VoxelKind::try_from(200), Err(UnknownVoxelKind(200)));
    }

    #[test]
    fn test_air_and_water_are_not_solid() {
        assert!(!VoxelKind::Air.is_solid());
        assert!(!VoxelKind::Water.is_solid());
        assert!(VoxelKind::Stone.is_solid());
        assert!(VoxelKind::Leaves.is_solid());
    }

    #[test]
    fn test_material_names_are_unique() {
        let mut names: Vec<_> = VoxelKind::ALL.iter().map(|k| k.material_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), VoxelKind::ALL.len());
    }
}
