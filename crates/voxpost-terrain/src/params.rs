//! Terrain generator configuration and world presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::fbm::FractalParams;

/// World preset. When set as [`TerrainParams::biome_override`] it also pins
/// biome classification regardless of sampled climate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiomePreset {
    /// Rolling grassland with lakes.
    Greenery,
    /// Flat sand dunes.
    Desert,
    /// Ridged peaks, rock and snow.
    Mountains,
}

impl BiomePreset {
    /// Lowercase preset name as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Greenery => "greenery",
            Self::Desert => "desert",
            Self::Mountains => "mountains",
        }
    }
}

impl fmt::Display for BiomePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BiomePreset {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greenery" => Ok(Self::Greenery),
            "desert" => Ok(Self::Desert),
            "mountains" | "mountain" => Ok(Self::Mountains),
            _ => Err(TerrainError::UnknownPreset(s.to_string())),
        }
    }
}

/// World-space scale of each noise field. A sample point is the world
/// coordinate divided by the scale, so larger values mean broader features.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseScales {
    /// Ocean/land macro shape.
    pub continentalness: f64,
    /// Flatness vs. steepness modulation.
    pub erosion: f64,
    /// Ridged mountain peaks.
    pub peaks: f64,
    /// Climate: temperature.
    pub temperature: f64,
    /// Climate: humidity.
    pub humidity: f64,
    /// Coarse 3D cave field.
    pub cave: f64,
    /// Fine 3D cave detail field.
    pub cave_detail: f64,
    /// Base terrain scale; the relief layer is derived from it.
    pub terrain: f64,
}

impl Default for NoiseScales {
    fn default() -> Self {
        Self {
            continentalness: 512.0,
            erosion: 320.0,
            peaks: 160.0,
            temperature: 700.0,
            humidity: 600.0,
            cave: 28.0,
            cave_detail: 11.0,
            terrain: 64.0,
        }
    }
}

impl NoiseScales {
    fn named(&self) -> [(&'static str, f64); 8] {
        [
            ("continentalness", self.continentalness),
            ("erosion", self.erosion),
            ("peaks", self.peaks),
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("cave", self.cave),
            ("cave_detail", self.cave_detail),
            ("terrain", self.terrain),
        ]
    }

    /// Scale of the small non-ridged relief layer.
    pub fn relief(&self) -> f64 {
        (self.terrain * 0.35).max(8.0)
    }
}

/// Full generator configuration. Immutable for the generator's lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainParams {
    /// Root seed; every noise field derives its own seed from it.
    pub seed: u32,
    /// Per-field world-space scales.
    pub scales: NoiseScales,
    /// fBm octave count.
    pub octaves: u32,
    /// fBm amplitude falloff per octave.
    pub persistence: f64,
    /// fBm frequency growth per octave.
    pub lacunarity: f64,
    /// Whether the peaks field uses ridged fBm.
    pub ridged: bool,
    /// Maximum column height in cells.
    pub height_scale: i32,
    /// Highest Y filled with water above low ground.
    pub sea_level: i32,
    /// Fraction of the cave field's range carved out; higher means more caves.
    pub cave_threshold: f64,
    /// Reshape elevation through a smoothstep/smootherstep curve.
    pub use_erosion_curve: bool,
    /// Hard-pins biome classification when set.
    pub biome_override: Option<BiomePreset>,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 1337,
            scales: NoiseScales::default(),
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            ridged: true,
            height_scale: 32,
            sea_level: 8,
            cave_threshold: 0.3,
            use_erosion_curve: true,
            biome_override: None,
        }
    }
}

impl TerrainParams {
    /// Parameters for a named world preset with the given seed.
    pub fn for_preset(preset: BiomePreset, seed: u32) -> Self {
        let base = Self {
            seed,
            biome_override: Some(preset),
            ..Self::default()
        };
        match preset {
            BiomePreset::Greenery => Self {
                scales: NoiseScales {
                    peaks: 140.0,
                    terrain: 60.0,
                    ..NoiseScales::default()
                },
                ridged: false,
                height_scale: 18,
                sea_level: 5,
                cave_threshold: 0.25,
                ..base
            },
            BiomePreset::Desert => Self {
                scales: NoiseScales {
                    continentalness: 600.0,
                    terrain: 80.0,
                    ..NoiseScales::default()
                },
                ridged: false,
                height_scale: 14,
                sea_level: 3,
                cave_threshold: 0.2,
                ..base
            },
            BiomePreset::Mountains => Self {
                scales: NoiseScales {
                    peaks: 110.0,
                    terrain: 48.0,
                    ..NoiseScales::default()
                },
                octaves: 5,
                ridged: true,
                height_scale: 48,
                sea_level: 8,
                cave_threshold: 0.3,
                ..base
            },
        }
    }

    /// Parameters for a preset given by name.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::UnknownPreset`] for unrecognised names.
    pub fn from_preset_name(name: &str, seed: u32) -> Result<Self, TerrainError> {
        Ok(Self::for_preset(name.parse()?, seed))
    }

    /// Whether the mountains weighting and curve apply.
    pub fn is_mountains(&self) -> bool {
        self.biome_override == Some(BiomePreset::Mountains)
    }

    /// Octave settings shared by every 2D field.
    pub fn fractal(&self) -> FractalParams {
        FractalParams {
            octaves: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
            ridged: false,
        }
    }

    /// Checks every value that would otherwise surface as corrupt terrain.
    ///
    /// # Errors
    ///
    /// Returns the first [`TerrainError`] found.
    pub fn validate(&self) -> Result<(), TerrainError> {
        for (field, value) in self.scales.named() {
            if !(value.is_finite() && value > 0.0) {
                return Err(TerrainError::NonPositiveScale { field, value });
            }
        }
        if !(1..=16).contains(&self.octaves) {
            return Err(TerrainError::InvalidOctaves(self.octaves));
        }
        if !(self.persistence.is_finite() && self.persistence > 0.0 && self.persistence <= 2.0) {
            return Err(TerrainError::InvalidFractal {
                field: "persistence",
                value: self.persistence,
            });
        }
        if !(self.lacunarity.is_finite() && self.lacunarity >= 1.0 && self.lacunarity <= 8.0) {
            return Err(TerrainError::InvalidFractal {
                field: "lacunarity",
                value: self.lacunarity,
            });
        }
        if !(1..=1024).contains(&self.height_scale) {
            return Err(TerrainError::InvalidHeightScale(self.height_scale));
        }
        if !(0..=self.height_scale).contains(&self.sea_level) {
            return Err(TerrainError::SeaLevelOutOfRange {
                sea_level: self.sea_level,
                height_scale: self.height_scale,
            });
        }
        if !(0.0..=1.0).contains(&self.cave_threshold) {
            return Err(TerrainError::InvalidCaveThreshold(self.cave_threshold));
        }
        Ok(())
    }
}
