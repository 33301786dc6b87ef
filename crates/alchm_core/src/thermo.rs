//! Thermodynamic metrics derived from the ESMS and elemental accumulators.
//!
//! Every division has a numeric fallback: denominators are floored at 1.0,
//! Kalchm degenerates to exactly 1.0 and Monica to 1.0 when their formulas
//! are undefined. No function here returns NaN or infinity.

use serde::{Deserialize, Serialize};

use crate::element::ElementalVector;
use crate::energy::EnergyVector;

/// Neutral value used when Kalchm or Monica is undefined.
pub const NEUTRAL_CONSTANT: f64 = 1.0;

/// Minimum value of every denominator.
const MIN_DENOMINATOR: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermodynamicMetrics {
    pub heat: f64,
    pub entropy: f64,
    pub reactivity: f64,
    pub gregs_energy: f64,
    pub kalchm: f64,
    pub monica: f64,
}

impl ThermodynamicMetrics {
    /// Metrics reported by the static fallback alignment.
    pub const fn neutral() -> Self {
        Self {
            heat: 0.5,
            entropy: 0.5,
            reactivity: 0.5,
            gregs_energy: 0.25,
            kalchm: NEUTRAL_CONSTANT,
            monica: NEUTRAL_CONSTANT,
        }
    }

    pub fn is_finite(&self) -> bool {
        [
            self.heat,
            self.entropy,
            self.reactivity,
            self.gregs_energy,
            self.kalchm,
            self.monica,
        ]
        .iter()
        .all(|x| x.is_finite())
    }
}

fn guarded(denominator: f64) -> f64 {
    if denominator.is_finite() {
        denominator.max(MIN_DENOMINATOR)
    } else {
        MIN_DENOMINATOR
    }
}

fn finite_or(x: f64, fallback: f64) -> f64 {
    if x.is_finite() { x } else { fallback }
}

/// `x^x` with `0^0 = 1`; negative inputs are treated as zero.
fn self_power(x: f64) -> f64 {
    if x <= 0.0 || !x.is_finite() { 1.0 } else { x.powf(x) }
}

/// Kalchm: `(S^S * E^E) / (M^M * Sub^Sub)`.
///
/// Falls back to exactly 1.0 when the denominator is zero or the result is
/// not a finite positive number.
pub fn kalchm(energy: &EnergyVector) -> f64 {
    let numerator = self_power(energy.spirit) * self_power(energy.essence);
    let denominator = self_power(energy.matter) * self_power(energy.substance);
    if denominator == 0.0 || !denominator.is_finite() {
        return NEUTRAL_CONSTANT;
    }
    let k = numerator / denominator;
    if k.is_finite() && k > 0.0 { k } else { NEUTRAL_CONSTANT }
}

/// Monica: `-gregs / (reactivity * ln kalchm)`, 1.0 when undefined.
pub fn monica(gregs_energy: f64, reactivity: f64, kalchm: f64) -> f64 {
    if kalchm.is_nan() || kalchm <= 0.0 {
        return NEUTRAL_CONSTANT;
    }
    let ln_k = kalchm.ln();
    if ln_k == 0.0 || !ln_k.is_finite() {
        return NEUTRAL_CONSTANT;
    }
    finite_or(-gregs_energy / (reactivity * ln_k), NEUTRAL_CONSTANT)
}

/// Derive all six metrics from the unnormalized accumulators.
pub fn derive_metrics(energy: &EnergyVector, elements: &ElementalVector) -> ThermodynamicMetrics {
    let (s, e, m, sub) = (energy.spirit, energy.essence, energy.matter, energy.substance);
    let (f, w, a, ea) = (elements.fire, elements.water, elements.air, elements.earth);

    let heat = (s * s + f * f) / guarded((sub + e + m + w + a + ea).powi(2));
    let entropy = (s * s + sub * sub + f * f + a * a) / guarded((e + m + ea + w).powi(2));
    let reactivity =
        (s * s + sub * sub + e * e + f * f + a * a + w * w) / guarded((m + ea).powi(2));

    let heat = finite_or(heat, 0.0);
    let entropy = finite_or(entropy, 0.0);
    let reactivity = finite_or(reactivity, 0.0);
    let gregs_energy = finite_or(heat - entropy * reactivity, 0.0);

    let k = kalchm(energy);
    ThermodynamicMetrics {
        heat,
        entropy,
        reactivity,
        gregs_energy,
        kalchm: k,
        monica: monica(gregs_energy, reactivity, k),
    }
}

/// Geometric mean `(prod x_i)^(1/n)`, computed in log space.
///
/// Non-positive or non-finite inputs are skipped; an empty input yields 1.0.
pub fn geometric_mean(values: &[f64]) -> f64 {
    let (sum_ln, n) = values
        .iter()
        .filter(|v| v.is_finite() && **v > 0.0)
        .fold((0.0, 0usize), |(acc, n), v| (acc + v.ln(), n + 1));
    if n == 0 {
        return NEUTRAL_CONSTANT;
    }
    finite_or((sum_ln / n as f64).exp(), NEUTRAL_CONSTANT)
}
