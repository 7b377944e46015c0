//! Biome classification from climate samples.

use serde::{Deserialize, Serialize};
use voxpost_voxel::VoxelKind;

use crate::column::Climate;
use crate::params::{BiomePreset, TerrainParams};

/// Surface classification of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    /// Grass over dirt.
    Greenery,
    /// Sand all the way down to stone.
    Desert,
    /// Bare rock.
    Mountain,
    /// Snow over dirt.
    Snow,
}

impl Biome {
    /// Material of the topmost cell.
    pub fn top_material(self) -> VoxelKind {
        match self {
            Self::Greenery => VoxelKind::Grass,
            Self::Desert => VoxelKind::Sand,
            Self::Mountain => VoxelKind::Stone,
            Self::Snow => VoxelKind::Snow,
        }
    }

    /// Material for depths 1..=3 below the surface.
    pub fn subsurface_material(self) -> VoxelKind {
        match self {
            Self::Desert => VoxelKind::Sand,
            _ => VoxelKind::Dirt,
        }
    }

    /// Classifies a column.
    ///
    /// A preset override wins unconditionally; the mountains preset still
    /// separates snow from rock by height above sea level.
    pub fn classify(climate: &Climate, height: i32, params: &TerrainParams) -> Self {
        match params.biome_override {
            Some(BiomePreset::Desert) => Self::Desert,
            Some(BiomePreset::Greenery) => Self::Greenery,
            Some(BiomePreset::Mountains) => {
                if height > params.sea_level + 10 {
                    Self::Snow
                } else {
                    Self::Mountain
                }
            }
            None => {
                let mountainous = climate.mountain > 0.25;
                if climate.temperature > 0.65
                    && climate.humidity < 0.35
                    && climate.continentalness > 0.45
                {
                    Self::Desert
                } else if mountainous && climate.temperature < 0.45 {
                    Self::Snow
                } else if mountainous {
                    Self::Mountain
                } else {
                    Self::Greenery
                }
            }
        }
    }
}
