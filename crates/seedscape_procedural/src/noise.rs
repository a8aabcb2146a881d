//! # Value Noise, fBm and Domain Warp
//!
//! Smooth continuous noise built on the hashed lattice from [`crate::random`].
//!
//! ## Pipeline
//!
//! 1. [`value_noise_2d`]: one octave. The four lattice corners around a point
//!    come from [`rand_2d`] and are blended with quintic weights.
//! 2. [`domain_warp`]: two auxiliary value-noise fields displace the sample
//!    point. This breaks up axis-aligned lattice artifacts.
//! 3. [`fbm_2d`]: sums octaves at rising frequency and falling amplitude,
//!    normalized by the total amplitude.
//!
//! ## Why quintic weights?
//!
//! `6t^5 - 15t^4 + 10t^3` has zero first and second derivatives at both ends
//! of a cell, so no creases show along lattice lines. Cubic smoothstep only
//! zeroes the first derivative.
//!
//! ## Determinism Guarantee
//!
//! The arithmetic below is evaluated in a fixed order with no fused
//! multiply-add. Changing the order of operations changes low bits of the
//! output and can flip tiles that sit on a classification threshold.

use serde::{Deserialize, Serialize};

use crate::error::{ProceduralError, ProceduralResult};
use crate::random::rand_2d;

/// Quintic fade curve `t^3 (t (6t - 15) + 10)`.
#[inline]
#[must_use]
pub fn quintic(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Single-octave value noise in `[0, 1]`.
///
/// `(x, y)` is multiplied by `scale` before lattice lookup, so `scale` is the
/// lattice frequency in cells per unit. Lattice indices saturate at the
/// ends of the `i64` range and their neighbours wrap, so any finite input
/// yields a value.
///
/// # Example
///
/// ```
/// use seedscape_procedural::noise::value_noise_2d;
///
/// let v = value_noise_2d("adventure", 10.5, -3.25, 0.1);
/// assert!((0.0..=1.0).contains(&v));
/// ```
#[must_use]
pub fn value_noise_2d(seed: &str, x: f64, y: f64, scale: f64) -> f64 {
    let sx = x * scale;
    let sy = y * scale;
    let cell_x = sx.floor();
    let cell_y = sy.floor();
    let wx = quintic(sx - cell_x);
    let wy = quintic(sy - cell_y);

    let ix = cell_x as i64;
    let iy = cell_y as i64;
    let (ix1, iy1) = (ix.wrapping_add(1), iy.wrapping_add(1));
    let v00 = rand_2d(seed, ix, iy);
    let v10 = rand_2d(seed, ix1, iy);
    let v01 = rand_2d(seed, ix, iy1);
    let v11 = rand_2d(seed, ix1, iy1);

    let bottom = v00 + (v10 - v00) * wx;
    let top = v01 + (v11 - v01) * wx;
    bottom + (top - bottom) * wy
}

/// Parameters of a fractal (fBm) noise field with a domain-warp pre-pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FbmParams {
    /// Number of noise layers.
    pub octaves: u32,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Amplitude multiplier per octave.
    pub gain: f64,
    /// Base frequency of the first octave.
    pub scale: f64,
    /// Maximum displacement of the warp pass, in input units.
    pub warp_amp: f64,
    /// Frequency of the warp fields.
    pub warp_scale: f64,
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            octaves: 5,
            lacunarity: 2.0,
            gain: 0.5,
            scale: 0.02,
            warp_amp: 6.0,
            warp_scale: 0.01,
        }
    }
}

impl FbmParams {
    /// Returns a copy with a different octave count.
    #[inline]
    #[must_use]
    pub const fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves;
        self
    }

    /// Returns a copy with a different base frequency.
    #[inline]
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Returns a copy with different warp magnitude and frequency.
    #[inline]
    #[must_use]
    pub const fn with_warp(mut self, warp_amp: f64, warp_scale: f64) -> Self {
        self.warp_amp = warp_amp;
        self.warp_scale = warp_scale;
        self
    }

    /// Checks that the parameters describe a usable field.
    ///
    /// The samplers never call this; it guards values read from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProceduralError::InvalidParams`] naming the first bad field.
    pub fn validate(&self) -> ProceduralResult<()> {
        if self.octaves == 0 {
            return Err(invalid("octaves", "must be at least 1"));
        }
        for (field, value) in [
            ("lacunarity", self.lacunarity),
            ("gain", self.gain),
            ("scale", self.scale),
            ("warp_scale", self.warp_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, format!("must be finite and positive, got {value}")));
            }
        }
        if !self.warp_amp.is_finite() || self.warp_amp < 0.0 {
            return Err(invalid(
                "warp_amp",
                format!("must be finite and non-negative, got {}", self.warp_amp),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ProceduralError {
    ProceduralError::InvalidParams {
        field,
        reason: reason.into(),
    }
}

/// Displaces `(x, y)` by two auxiliary value-noise fields.
///
/// The fields are keyed `"{seed}wx"` and `"{seed}wy"`, sampled at
/// `warp_scale`, remapped from `[0, 1]` to `[-1, 1]` and scaled by `warp_amp`.
#[must_use]
pub fn domain_warp(seed: &str, x: f64, y: f64, params: &FbmParams) -> (f64, f64) {
    let wx = value_noise_2d(&format!("{seed}wx"), x, y, params.warp_scale) * 2.0 - 1.0;
    let wy = value_noise_2d(&format!("{seed}wy"), x, y, params.warp_scale) * 2.0 - 1.0;
    (x + wx * params.warp_amp, y + wy * params.warp_amp)
}

/// Domain-warped fractal noise, normalized to the `[0, 1]` range of its layers.
///
/// # Example
///
/// ```
/// use seedscape_procedural::noise::{fbm_2d, FbmParams};
///
/// let params = FbmParams::default().with_octaves(3);
/// let a = fbm_2d("adventure:h", 4.0, 2.0, &params);
/// let b = fbm_2d("adventure:h", 4.0, 2.0, &params);
/// assert_eq!(a, b);
/// ```
#[must_use]
pub fn fbm_2d(seed: &str, x: f64, y: f64, params: &FbmParams) -> f64 {
    let (x, y) = domain_warp(seed, x, y, params);
    octave_sum(seed, x, y, params)
}

/// Octave accumulation without the warp pass.
fn octave_sum(seed: &str, x: f64, y: f64, params: &FbmParams) -> f64 {
    let mut amplitude = 1.0;
    let mut frequency = params.scale;
    let mut total = 0.0;
    let mut norm = 0.0;

    for _ in 0..params.octaves {
        total += value_noise_2d(seed, x, y, frequency) * amplitude;
        norm += amplitude;
        amplitude *= params.gain;
        frequency *= params.lacunarity;
    }

    total / norm
}

/// A named fBm field: seed context plus parameters.
///
/// The context string is built once, so repeated sampling does not
/// re-format the seed.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseField {
    seed: String,
    params: FbmParams,
}

impl NoiseField {
    /// Creates a field from its full context key (e.g. `"adventure:h"`).
    #[must_use]
    pub fn new(seed: impl Into<String>, params: FbmParams) -> Self {
        Self {
            seed: seed.into(),
            params,
        }
    }

    /// The context key of this field.
    #[inline]
    #[must_use]
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// The parameters of this field.
    #[inline]
    #[must_use]
    pub const fn params(&self) -> &FbmParams {
        &self.params
    }

    /// Samples the field at a real point.
    #[inline]
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        fbm_2d(&self.seed, x, y, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quintic_endpoints() {
        assert_eq!(quintic(0.0), 0.0);
        assert_eq!(quintic(1.0), 1.0);
        assert!((quintic(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_value_noise_golden() {
        assert_eq!(
            value_noise_2d("adventure", 10.5, -3.25, 0.1),
            0.088_248_067_395_082_37
        );
    }

    #[test]
    fn test_value_noise_at_lattice_point_is_corner_value() {
        assert_eq!(
            value_noise_2d("adventure", 0.0, 0.0, 1.0),
            rand_2d("adventure", 0, 0)
        );
        assert_eq!(
            value_noise_2d("adventure", 3.0, -7.0, 1.0),
            rand_2d("adventure", 3, -7)
        );
    }

    #[test]
    fn test_value_noise_range() {
        for i in 0..5000 {
            let x = (i as f64 * 0.37) - 900.0;
            let y = (i as f64 * 0.53) - 1300.0;
            let v = value_noise_2d("range", x, y, 0.05);
            assert!((0.0..=1.0).contains(&v), "Value {v} out of range at ({x}, {y})");
        }
    }

    #[test]
    fn test_value_noise_continuity() {
        let delta = 1e-4;
        let v1 = value_noise_2d("cont", 12.5, 8.25, 0.1);
        let v2 = value_noise_2d("cont", 12.5 + delta, 8.25, 0.1);
        assert!((v1 - v2).abs() < 1e-3, "Noise should be continuous");
    }

    #[test]
    fn test_value_noise_continuous_across_cell_boundary() {
        let left = value_noise_2d("edge", 10.0 - 1e-9, 4.3, 1.0);
        let right = value_noise_2d("edge", 10.0, 4.3, 1.0);
        assert!((left - right).abs() < 1e-6, "Seam at lattice line: {left} vs {right}");
    }

    #[test]
    fn test_fbm_golden() {
        let height = FbmParams::default().with_scale(0.015).with_warp(10.0, 0.008);
        assert_eq!(fbm_2d("adventure:h", 0.0, 0.0, &height), 0.241_892_053_672_859_9);

        let moisture = FbmParams::default().with_octaves(4).with_scale(0.03);
        assert_eq!(
            fbm_2d("adventure:m", 1000.0, -1000.0, &moisture),
            0.489_058_744_366_879_74
        );
    }

    #[test]
    fn test_fbm_octave_counts_golden() {
        let expected = [
            (1, 0.690_712_864_307_051_7),
            (2, 0.694_431_499_411_917),
            (3, 0.704_764_679_352_784_4),
            (10, 0.697_000_037_623_003_2),
        ];
        for (octaves, value) in expected {
            let params = FbmParams::default().with_octaves(octaves);
            assert_eq!(fbm_2d("k", 12.3, -4.5, &params), value, "octaves = {octaves}");
        }
    }

    #[test]
    fn test_zero_warp_is_plain_octave_sum() {
        let params = FbmParams::default().with_warp(0.0, 0.01);
        assert_eq!(
            fbm_2d("w", 5.5, 6.5, &params),
            octave_sum("w", 5.5, 6.5, &params)
        );
    }

    #[test]
    fn test_warp_displacement_bounded() {
        let params = FbmParams::default();
        for i in 0..200 {
            let x = i as f64 * 3.1;
            let y = i as f64 * -2.7;
            let (wx, wy) = domain_warp("warp", x, y, &params);
            assert!((wx - x).abs() <= params.warp_amp);
            assert!((wy - y).abs() <= params.warp_amp);
        }
    }

    #[test]
    fn test_noise_field_matches_free_function() {
        let params = FbmParams::default();
        let field = NoiseField::new("adventure:h", params);
        assert_eq!(field.sample(3.0, 4.0), fbm_2d("adventure:h", 3.0, 4.0, &params));
        assert_eq!(field.seed(), "adventure:h");
    }

    #[test]
    fn test_validate_rejects_bad_params() {
        assert!(FbmParams::default().validate().is_ok());
        assert!(matches!(
            FbmParams::default().with_octaves(0).validate(),
            Err(ProceduralError::InvalidParams { field: "octaves", .. })
        ));
        assert!(matches!(
            FbmParams::default().with_scale(f64::NAN).validate(),
            Err(ProceduralError::InvalidParams { field: "scale", .. })
        ));
        assert!(matches!(
            FbmParams::default().with_warp(-1.0, 0.01).validate(),
            Err(ProceduralError::InvalidParams { field: "warp_amp", .. })
        ));
    }

    #[test]
    fn test_huge_finite_coordinates() {
        let params = FbmParams::default();
        for (x, y) in [(1e19, 0.0), (-1e19, 3.5), (1e300, -1e300), (f64::MAX, f64::MIN)] {
            let v = value_noise_2d("adventure", x, y, 1.0);
            assert!((0.0..=1.0).contains(&v), "value noise {v} at ({x}, {y})");
            let f = fbm_2d("adventure", x, y, &params);
            assert!((-1e-12..=1.0 + 1e-12).contains(&f), "fbm {f} at ({x}, {y})");
        }
    }

    #[test]
    fn test_params_from_toml() {
        let params: FbmParams = toml::from_str("octaves = 3\nscale = 0.1").unwrap();
        assert_eq!(params, FbmParams::default().with_octaves(3).with_scale(0.1));
        assert!(toml::from_str::<FbmParams>("octave = 3").is_err());
    }
}
