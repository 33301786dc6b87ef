//! The four classical elements and the elemental vector.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Tolerance for the "sums to one" invariant of exposed vectors.
pub const NORMALIZATION_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
}

pub const ALL_ELEMENTS: [Element; 4] = [Element::Fire, Element::Water, Element::Earth, Element::Air];

impl Element {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Water => "Water",
            Self::Earth => "Earth",
            Self::Air => "Air",
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Element {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ALL_ELEMENTS
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownElement(s.to_string()))
    }
}

/// Non-negative magnitudes for Fire, Water, Earth and Air.
///
/// Accumulators inside the transform are unnormalized; anything handed to
/// a consumer goes through [`ElementalVector::normalized`] first.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementalVector {
    #[serde(rename = "Fire", alias = "fire", default)]
    pub fire: f64,
    #[serde(rename = "Water", alias = "water", default)]
    pub water: f64,
    #[serde(rename = "Earth", alias = "earth", default)]
    pub earth: f64,
    #[serde(rename = "Air", alias = "air", default)]
    pub air: f64,
}

impl ElementalVector {
    pub const fn new(fire: f64, water: f64, earth: f64, air: f64) -> Self {
        Self {
            fire,
            water,
            earth,
            air,
        }
    }

    /// Equal quarters, the neutral balance.
    pub const fn balanced() -> Self {
        Self::new(0.25, 0.25, 0.25, 0.25)
    }

    pub fn get(&self, element: Element) -> f64 {
        match element {
            Element::Fire => self.fire,
            Element::Water => self.water,
            Element::Earth => self.earth,
            Element::Air => self.air,
        }
    }

    pub fn add(&mut self, element: Element, amount: f64) {
        match element {
            Element::Fire => self.fire += amount,
            Element::Water => self.water += amount,
            Element::Earth => self.earth += amount,
            Element::Air => self.air += amount,
        }
    }

    pub fn sum(&self) -> f64 {
        self.fire + self.water + self.earth + self.air
    }

    pub fn is_finite(&self) -> bool {
        self.fire.is_finite() && self.water.is_finite() && self.earth.is_finite() && self.air.is_finite()
    }

    /// Scale to unit sum. Negative or non-finite components count as zero;
    /// a zero total yields equal quarters.
    pub fn normalized(&self) -> Self {
        let clean = |x: f64| if x.is_finite() && x > 0.0 { x } else { 0.0 };
        let v = Self::new(clean(self.fire), clean(self.water), clean(self.earth), clean(self.air));
        let total = v.sum();
        if total <= 0.0 || !total.is_finite() {
            return Self::balanced();
        }
        Self::new(v.fire / total, v.water / total, v.earth / total, v.air / total)
    }

    /// Whether the vector satisfies the exposed-vector invariant.
    pub fn is_normalized(&self) -> bool {
        self.fire >= 0.0
            && self.water >= 0.0
            && self.earth >= 0.0
            && self.air >= 0.0
            && (self.sum() - 1.0).abs() <= NORMALIZATION_EPSILON
    }

    /// Element with the largest share; ties resolve in Fire, Water, Earth, Air order.
    pub fn dominant(&self) -> Element {
        let mut best = Element::Fire;
        for el in ALL_ELEMENTS {
            if self.get(el) > self.get(best) {
                best = el;
            }
        }
        best
    }

    /// Compatibility in [0, 1]: one minus half the L1 distance between the
    /// two normalized vectors (the L1 distance of two distributions is at most 2).
    pub fn similarity(&self, other: &Self) -> f64 {
        let a = self.normalized();
        let b = other.normalized();
        let distance = ALL_ELEMENTS
            .iter()
            .map(|&el| (a.get(el) - b.get(el)).abs())
            .sum::<f64>();
        (1.0 - distance / 2.0).clamp(0.0, 1.0)
    }
}
