//! Fractal Brownian motion over any 2D noise field.
//!
//! Sums octaves of a base field at increasing frequency and decreasing
//! amplitude, then divides by the total amplitude so the result stays in
//! roughly `[-1, 1]` regardless of octave count.

use noise::NoiseFn;

/// Octave configuration for [`fbm_2d`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractalParams {
    /// Number of octaves to sum.
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves (typically < 1).
    pub persistence: f64,
    /// Frequency multiplier between successive octaves (typically > 1).
    pub lacunarity: f64,
    /// Transform each octave `n → 2·(1 − |n|) − 1` for sharp ridges.
    pub ridged: bool,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            ridged: false,
        }
    }
}

impl FractalParams {
    /// Same octave settings with ridging switched on or off.
    pub fn with_ridged(self, ridged: bool) -> Self {
        Self { ridged, ..self }
    }

    /// Sum of all octave amplitudes (geometric series).
    pub fn max_amplitude(&self) -> f64 {
        let mut sum = 0.0;
        let mut amp = 1.0;
        for _ in 0..self.octaves {
            sum += amp;
            amp *= self.persistence;
        }
        sum
    }
}

/// Samples normalised fBm of `noise` at `(x, y)`.
///
/// Returns a value clamped to `[-1, 1]`; zero octaves yield `0.0`.
pub fn fbm_2d(noise: &impl NoiseFn<f64, 2>, x: f64, y: f64, params: &FractalParams) -> f64 {
    let mut total = 0.0;
    let mut frequency = 1.0;
    let mut amplitude = 1.0;

    for _ in 0..params.octaves {
        let mut n = noise.get([x * frequency, y * frequency]);
        if params.ridged {
            n = 2.0 * (1.0 - n.abs()) - 1.0;
        }
        total += n * amplitude;

        frequency *= params.lacunarity;
        amplitude *= params.persistence;
    }

    let max_amplitude = params.max_amplitude();
    if max_amplitude <= 0.0 {
        return 0.0;
    }
    (total / max_amplitude).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_field::Perlin2D;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_single_octave_equals_base_field() {
        let field = Perlin2D::new(11);
        let params = FractalParams {
            octaves: 1,
            ..Default::default()
        };
        let n = fbm_2d(&field, 3.3, -1.7, &params);
        assert!((n - field.sample(3.3, -1.7)).abs() < EPSILON);
    }

    #[test]
    fn test_output_normalised_for_many_octaves() {
        let field = Perlin2D::new(1337);
        for octaves in 1..=8 {
            for ridged in [false, true] {
                let params = FractalParams {
                    octaves,
                    ridged,
                    ..Default::default()
                };
                for i in 0..300 {
                    let t = i as f64 * 0.613;
                    let n = fbm_2d(&field, t, t * -0.41, &params);
                    assert!(
                        n.is_finite() && (-1.0..=1.0).contains(&n),
                        "octaves={octaves} ridged={ridged} gave {n}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_ridged_transform_at_lattice_points() {
        // Base noise is 0 at integer lattice points, so the ridge transform
        // maps every octave to 2·(1 − 0) − 1 = 1.
        let field = Perlin2D::new(4);
        let params = FractalParams {
            octaves: 3,
            ridged: true,
            ..Default::default()
        };
        let n = fbm_2d(&field, 2.0, 5.0, &params);
        assert!((n - 1.0).abs() < EPSILON, "expected ridge peak, got {n}");
    }

    #[test]
    fn test_zero_octaves_yield_zero() {
        let field = Perlin2D::new(4);
        let params = FractalParams {
            octaves: 0,
            ..Default::default()
        };
        assert_eq!(fbm_2d(&field, 0.5, 0.5, &params), 0.0);
    }

    #[test]
    fn test_max_amplitude_calculation() {
        let params = FractalParams {
            octaves: 4,
            persistence: 0.5,
            ..Default::default()
        };
        assert!((params.max_amplitude() - 1.875).abs() < EPSILON);
    }
}
