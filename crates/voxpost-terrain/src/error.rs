//! Terrain configuration errors.

/// Errors raised while validating [`crate::TerrainParams`] or resolving a preset.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TerrainError {
    /// A noise scale is zero, negative, or not finite.
    #[error("noise scale `{field}` must be positive and finite, got {value}")]
    NonPositiveScale {
        /// Which scale was rejected.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// fBm octave count outside `1..=16`.
    #[error("octave count must be in 1..=16, got {0}")]
    InvalidOctaves(u32),

    /// Persistence or lacunarity outside its usable range.
    #[error("fractal parameter `{field}` out of range: {value}")]
    InvalidFractal {
        /// Which parameter was rejected.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Height scale must be positive.
    #[error("height scale must be in 1..=1024, got {0}")]
    InvalidHeightScale(i32),

    /// Sea level must lie within the terrain's vertical range.
    #[error("sea level {sea_level} outside 0..={height_scale}")]
    SeaLevelOutOfRange {
        /// Configured sea level.
        sea_level: i32,
        /// Configured height scale.
        height_scale: i32,
    },

    /// Cave threshold must be a fraction.
    #[error("cave threshold must be in [0, 1], got {0}")]
    InvalidCaveThreshold(f64),

    /// Preset name not recognised.
    #[error("unknown world preset: {0:?} (expected greenery, desert or mountains)")]
    UnknownPreset(String),
}
