//! Non-linear point variations for the fractal flame generator.
//!
//! Each variation warps a point that has already been through the
//! selected affine transform; a [`VariationVector`] blends the registered
//! variations with per-variation weights. Zero weights are skipped when
//! blending, which is semantically the same as a zero contribution.

use serde::{Deserialize, Serialize};

/// Guard against division by zero at the origin in the radial variations.
const EPS: f64 = 1e-10;

/// Number of registered variations; every [`VariationVector`] carries
/// exactly one coefficient per variation, in registry order.
pub const VARIATION_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variation {
    Linear,
    Sinusoidal,
    Spherical,
    Swirl,
    Horseshoe,
}

/// Registry order matches the coefficient order of [`VariationVector`].
pub const REGISTRY: [Variation; VARIATION_COUNT] = [
    Variation::Linear,
    Variation::Sinusoidal,
    Variation::Spherical,
    Variation::Swirl,
    Variation::Horseshoe,
];

impl Variation {
    pub fn apply(self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Variation::Linear => (x, y),
            Variation::Sinusoidal => (x.sin(), y.sin()),
            Variation::Spherical => {
                let r = (x * x + y * y).sqrt().max(EPS);
                (x / r, y / r)
            }
            Variation::Swirl => {
                let r2 = x * x + y * y;
                (
                    x * r2.sin() - y * r2.cos(),
                    x * r2.cos() + y * r2.sin(),
                )
            }
            Variation::Horseshoe => {
                let r = (x * x + y * y).sqrt().max(EPS);
                ((x - y) * (x + y) / r, 2.0 * x * y)
            }
        }
    }
}

/// Weighted blend over the variation registry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariationVector {
    weights: [f64; VARIATION_COUNT],
}

impl VariationVector {
    /// Build from a coefficient slice; the length must match the registry.
    pub fn new(weights: &[f64]) -> Result<Self, String> {
        if weights.len() != VARIATION_COUNT {
            return Err(format!(
                "variation vector has {} coefficients, expected {}",
                weights.len(),
                VARIATION_COUNT
            ));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err("variation coefficients must be finite".into());
        }
        let mut fixed = [0.0; VARIATION_COUNT];
        fixed.copy_from_slice(weights);
        Ok(Self { weights: fixed })
    }

    /// The identity blend: linear with weight 1.
    pub fn linear() -> Self {
        let mut weights = [0.0; VARIATION_COUNT];
        weights[0] = 1.0;
        Self { weights }
    }

    pub fn weights(&self) -> &[f64; VARIATION_COUNT] {
        &self.weights
    }

    /// Sum the weighted variations of `(x, y)`.
    pub fn blend(&self, x: f64, y: f64) -> (f64, f64) {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        for (variation, &weight) in REGISTRY.iter().zip(self.weights.iter()) {
            if weight != 0.0 {
                let (vx, vy) = variation.apply(x, y);
                sum_x += vx * weight;
                sum_y += vy * weight;
            }
        }
        (sum_x, sum_y)
    }
}
