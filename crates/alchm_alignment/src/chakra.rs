//! Seven-bucket energy distribution.

use alchm_core::{ElementalVector, EnergyVector};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Chakra {
    Root,
    Sacral,
    SolarPlexus,
    Heart,
    Throat,
    ThirdEye,
    Crown,
}

pub const ALL_CHAKRAS: [Chakra; 7] = [
    Chakra::Root,
    Chakra::Sacral,
    Chakra::SolarPlexus,
    Chakra::Heart,
    Chakra::Throat,
    Chakra::ThirdEye,
    Chakra::Crown,
];

impl Chakra {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Sacral => "sacral",
            Self::SolarPlexus => "solar plexus",
            Self::Heart => "heart",
            Self::Throat => "throat",
            Self::ThirdEye => "third eye",
            Self::Crown => "crown",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Linear weights per chakra over
/// `[fire, water, earth, air, spirit, essence, matter, substance]`.
pub const CHAKRA_WEIGHTS: [[f64; 8]; 7] = [
    [0.0, 0.0, 0.6, 0.0, 0.0, 0.0, 0.4, 0.0],
    [0.0, 0.6, 0.0, 0.0, 0.0, 0.4, 0.0, 0.0],
    [0.6, 0.0, 0.0, 0.0, 0.2, 0.0, 0.0, 0.2],
    [0.0, 0.3, 0.0, 0.3, 0.0, 0.2, 0.0, 0.2],
    [0.0, 0.0, 0.0, 0.6, 0.0, 0.0, 0.0, 0.4],
    [0.0, 0.3, 0.0, 0.3, 0.4, 0.0, 0.0, 0.0],
    [0.2, 0.0, 0.0, 0.2, 0.6, 0.0, 0.0, 0.0],
];

/// Normalized weight per chakra, indexed by [`Chakra::index`].
///
/// Serializes as a map keyed by chakra name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChakraDistribution {
    values: [f64; 7],
}

impl ChakraDistribution {
    /// Equal sevenths.
    pub fn uniform() -> Self {
        Self {
            values: [1.0 / 7.0; 7],
        }
    }

    pub fn get(&self, chakra: Chakra) -> f64 {
        self.values[chakra.index()]
    }

    pub fn values(&self) -> &[f64; 7] {
        &self.values
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Chakra with the largest share; earlier chakras win ties.
    pub fn dominant(&self) -> Chakra {
        let mut best = Chakra::Root;
        for c in ALL_CHAKRAS {
            if self.get(c) > self.get(best) {
                best = c;
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (Chakra, f64)> + '_ {
        ALL_CHAKRAS.iter().map(|&c| (c, self.get(c)))
    }
}

impl Serialize for ChakraDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ALL_CHAKRAS.len()))?;
        for (chakra, value) in self.iter() {
            map.serialize_entry(chakra.name(), &value)?;
        }
        map.end()
    }
}

/// Project the normalized balance and the energy shares onto the seven
/// buckets and normalize the result.
pub fn calculate_chakra_distribution(
    weights: &[[f64; 8]; 7],
    balance: &ElementalVector,
    energy: &EnergyVector,
) -> ChakraDistribution {
    let b = balance.normalized();
    let e = energy.shares();
    let inputs = [b.fire, b.water, b.earth, b.air, e[0], e[1], e[2], e[3]];

    let mut values = [0.0; 7];
    for (value, row) in values.iter_mut().zip(weights) {
        let v: f64 = row.iter().zip(&inputs).map(|(w, x)| w * x).sum();
        *value = if v.is_finite() { v.max(0.0) } else { 0.0 };
    }

    let total: f64 = values.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return ChakraDistribution::uniform();
    }
    for v in &mut values {
        *v /= total;
    }
    ChakraDistribution { values }
}
