//! The shared pure column sampler.
//!
//! Both the single-column queries and bulk chunk generation go through
//! [`TerrainFields::sample_column`], so they agree bit-for-bit on height and
//! biome for the same inputs.

use crate::biome::Biome;
use crate::fbm::fbm_2d;
use crate::noise_field::{Perlin2D, Perlin3D};
use crate::params::TerrainParams;

const CONTINENTALNESS_SALT: u32 = 0x9E37_79B9;
const EROSION_SALT: u32 = 0x85EB_CA6B;
const PEAKS_SALT: u32 = 0xC2B2_AE35;
const TEMPERATURE_SALT: u32 = 0x27D4_EB2F;
const HUMIDITY_SALT: u32 = 0x1656_67B1;
const CAVE_SALT: u32 = 0xD3A2_646C;
const CAVE_DETAIL_SALT: u32 = 0xFD70_46C5;

/// Elevation blend weights `(base, mountain, relief)`.
const MOUNTAINS_WEIGHTS: (f64, f64, f64) = (0.4, 0.9, 0.5);
const DEFAULT_WEIGHTS: (f64, f64, f64) = (0.5, 0.6, 0.6);

fn field_seed(root: u32, offset: u32, salt: u32) -> u32 {
    root.wrapping_add(offset) ^ salt
}

#[inline]
fn to_unit(n: f64) -> f64 {
    ((n + 1.0) * 0.5).clamp(0.0, 1.0)
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn smootherstep(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Climate and shape samples for one column, each normalised to `[0, 1]`
/// except `mountain`, which lies in `[0, 0.5]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Climate {
    /// Ocean/land macro shape.
    pub continentalness: f64,
    /// Flatness modulation.
    pub erosion: f64,
    /// Ridged peaks.
    pub peaks: f64,
    /// Temperature (biome only).
    pub temperature: f64,
    /// Humidity (biome only).
    pub humidity: f64,
    /// `max(0, peaks − 0.5) · (1 − erosion)`.
    pub mountain: f64,
    /// Small-scale relief.
    pub relief: f64,
}

/// Result of sampling one world column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSample {
    /// Surface height in `0..=height_scale`.
    pub height: i32,
    /// Biome classification.
    pub biome: Biome,
    /// The samples height and biome were derived from.
    pub climate: Climate,
}

/// The seven noise fields a generator samples, each with its own derived seed.
#[derive(Clone)]
pub struct TerrainFields {
    continentalness: Perlin2D,
    erosion: Perlin2D,
    peaks: Perlin2D,
    temperature: Perlin2D,
    humidity: Perlin2D,
    cave: Perlin3D,
    cave_detail: Perlin3D,
}

impl TerrainFields {
    /// Builds every field from the root seed.
    pub fn new(seed: u32) -> Self {
        Self {
            continentalness: Perlin2D::new(field_seed(seed, 0, CONTINENTALNESS_SALT)),
            erosion: Perlin2D::new(field_seed(seed, 101, EROSION_SALT)),
            peaks: Perlin2D::new(field_seed(seed, 202, PEAKS_SALT)),
            temperature: Perlin2D::new(field_seed(seed, 303, TEMPERATURE_SALT)),
            humidity: Perlin2D::new(field_seed(seed, 404, HUMIDITY_SALT)),
            cave: Perlin3D::new(field_seed(seed, 505, CAVE_SALT)),
            cave_detail: Perlin3D::new(field_seed(seed, 606, CAVE_DETAIL_SALT)),
        }
    }

    /// Samples climate, height and biome for world column `(x, z)`.
    pub fn sample_column(&self, params: &TerrainParams, x: i32, z: i32) -> ColumnSample {
        let (wx, wz) = (f64::from(x), f64::from(z));
        let scales = &params.scales;
        let fractal = params.fractal();
        let sample = |field: &Perlin2D, scale: f64, ridged: bool| {
            to_unit(fbm_2d(
                field,
                wx / scale,
                wz / scale,
                &fractal.with_ridged(ridged),
            ))
        };

        let continentalness = sample(&self.continentalness, scales.continentalness, false);
        let erosion = sample(&self.erosion, scales.erosion, false);
        let peaks = sample(&self.peaks, scales.peaks, params.ridged);
        let temperature = sample(&self.temperature, scales.temperature, false);
        let humidity = sample(&self.humidity, scales.humidity, false);
        let relief = sample(&self.peaks, scales.relief(), false);

        let mountain = (peaks - 0.5).max(0.0) * (1.0 - erosion);

        let mountains = params.is_mountains();
        let (base_w, mountain_w, relief_w) = if mountains {
            MOUNTAINS_WEIGHTS
        } else {
            DEFAULT_WEIGHTS
        };
        let mut elevation =
            continentalness * base_w + mountain * mountain_w + (relief - 0.5) * relief_w;

        if !elevation.is_finite() {
            tracing::warn!(x, z, "non-finite elevation, clamping to sea floor");
            elevation = 0.0;
        }
        elevation = elevation.clamp(0.0, 1.0);
        if params.use_erosion_curve {
            elevation = if mountains {
                smootherstep(elevation)
            } else {
                smoothstep(elevation)
            };
        }

        let height = ((elevation.clamp(0.0, 1.0) * f64::from(params.height_scale)).floor() as i32)
            .clamp(0, params.height_scale);

        let climate = Climate {
            continentalness,
            erosion,
            peaks,
            temperature,
            humidity,
            mountain,
            relief,
        };
        ColumnSample {
            height,
            biome: Biome::classify(&climate, height, params),
            climate,
        }
    }

    /// Layered cave value `|c1·0.8 + c2·0.2|` at a world cell.
    pub fn cave_value(&self, params: &TerrainParams, x: i32, y: i32, z: i32) -> f64 {
        let (wx, wy, wz) = (f64::from(x), f64::from(y), f64::from(z));
        let coarse = params.scales.cave;
        let fine = params.scales.cave_detail;
        let c1 = self.cave.sample(wx / coarse, wy / coarse, wz / coarse);
        let c2 = self.cave_detail.sample(wx / fine, wy / fine, wz / fine);
        (c1 * 0.8 + c2 * 0.2).abs()
    }
}
