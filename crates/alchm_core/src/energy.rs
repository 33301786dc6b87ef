//! ESMS energy vector: Spirit, Essence, Matter, Substance.

use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

/// Latent energy magnitudes. Intermediate quantities only; no
/// normalization invariant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyVector {
    #[serde(rename = "Spirit", alias = "spirit", default)]
    pub spirit: f64,
    #[serde(rename = "Essence", alias = "essence", default)]
    pub essence: f64,
    #[serde(rename = "Matter", alias = "matter", default)]
    pub matter: f64,
    #[serde(rename = "Substance", alias = "substance", default)]
    pub substance: f64,
}

impl EnergyVector {
    pub const fn new(spirit: f64, essence: f64, matter: f64, substance: f64) -> Self {
        Self {
            spirit,
            essence,
            matter,
            substance,
        }
    }

    pub fn sum(&self) -> f64 {
        self.spirit + self.essence + self.matter + self.substance
    }

    /// Unit-sum copy in `[spirit, essence, matter, substance]` order; equal
    /// quarters when there is no usable magnitude.
    pub fn shares(&self) -> [f64; 4] {
        let clean = |x: f64| if x.is_finite() && x > 0.0 { x } else { 0.0 };
        let v = [
            clean(self.spirit),
            clean(self.essence),
            clean(self.matter),
            clean(self.substance),
        ];
        let total: f64 = v.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return [0.25; 4];
        }
        v.map(|x| x / total)
    }
}

impl Add for EnergyVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.spirit + rhs.spirit,
            self.essence + rhs.essence,
            self.matter + rhs.matter,
            self.substance + rhs.substance,
        )
    }
}

impl AddAssign for EnergyVector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for EnergyVector {
    type Output = Self;

    fn mul(self, k: f64) -> Self {
        Self::new(self.spirit * k, self.essence * k, self.matter * k, self.substance * k)
    }
}
