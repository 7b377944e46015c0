//! Seeded classic Perlin noise in two and three dimensions.
//!
//! Each field owns a 512-entry permutation table built by a seeded
//! Fisher–Yates shuffle of `0..=255`, duplicated for wraparound. Fields are
//! immutable after construction; the same seed always yields the same field.

use noise::NoiseFn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn permutation_table(seed: u32) -> [u8; 512] {
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));
    let mut base: [u8; 256] = std::array::from_fn(|i| i as u8);
    for i in (1..base.len()).rev() {
        let j = rng.random_range(0..=i);
        base.swap(i, j);
    }
    std::array::from_fn(|i| base[i & 255])
}

/// Quintic fade curve `6t⁵ - 15t⁴ + 10t³`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Splits a coordinate into its wrapped lattice cell and fractional offset.
#[inline]
fn lattice(v: f64) -> (usize, f64) {
    let floor = libm::floor(v);
    ((floor as i64 & 255) as usize, v - floor)
}

/// Axis-aligned 2D gradients: +x, -x, +y, -y.
#[inline]
fn grad2(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x,
        1 => -x,
        2 => y,
        _ => -y,
    }
}

/// The 12 edge-midpoint gradients of a cube.
#[inline]
fn grad3(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    match hash % 12 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x + z,
        5 => -x + z,
        6 => x - z,
        7 => -x - z,
        8 => y + z,
        9 => -y + z,
        10 => y - z,
        _ => -y - z,
    }
}

/// Deterministic 2D gradient noise with output in `[-1, 1]`.
#[derive(Clone)]
pub struct Perlin2D {
    perm: [u8; 512],
}

impl Perlin2D {
    /// Builds the field for `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            perm: permutation_table(seed),
        }
    }

    /// Samples the field at `(x, y)`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let (xi, xf) = lattice(x);
        let (yi, yf) = lattice(y);
        let u = fade(xf);
        let v = fade(yf);

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let b = p[xi + 1] as usize + yi;

        let n = lerp(
            v,
            lerp(u, grad2(p[a], xf, yf), grad2(p[b], xf - 1.0, yf)),
            lerp(
                u,
                grad2(p[a + 1], xf, yf - 1.0),
                grad2(p[b + 1], xf - 1.0, yf - 1.0),
            ),
        );
        n.clamp(-1.0, 1.0)
    }
}

impl NoiseFn<f64, 2> for Perlin2D {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0], point[1])
    }
}

/// Deterministic 3D gradient noise with output in `[-1, 1]`.
#[derive(Clone)]
pub struct Perlin3D {
    perm: [u8; 512],
}

impl Perlin3D {
    /// Builds the field for `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            perm: permutation_table(seed),
        }
    }

    /// Samples the field at `(x, y, z)`.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let (xi, xf) = lattice(x);
        let (yi, yf) = lattice(y);
        let (zi, zf) = lattice(z);
        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        let near = lerp(
            v,
            lerp(u, grad3(p[aa], xf, yf, zf), grad3(p[ba], xf - 1.0, yf, zf)),
            lerp(
                u,
                grad3(p[ab], xf, yf - 1.0, zf),
                grad3(p[bb], xf - 1.0, yf - 1.0, zf),
            ),
        );
        let far = lerp(
            v,
            lerp(
                u,
                grad3(p[aa + 1], xf, yf, zf - 1.0),
                grad3(p[ba + 1], xf - 1.0, yf, zf - 1.0),
            ),
            lerp(
                u,
                grad3(p[ab + 1], xf, yf - 1.0, zf - 1.0),
                grad3(p[bb + 1], xf - 1.0, yf - 1.0, zf - 1.0),
            ),
        );
        lerp(w, near, far).clamp(-1.0, 1.0)
    }
}

impl NoiseFn<f64, 3> for Perlin3D {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.sample(point[0], point[1], point[2])
    }
}
