//! The alchemical transform: positions → (energy, elements, thermodynamics).
//!
//! Pure and total. Bodies missing from the map are skipped; there is no
//! error path.

use serde::Serialize;

use crate::element::ElementalVector;
use crate::energy::EnergyVector;
use crate::position::PositionMap;
use crate::tables::TransformTables;
use crate::thermo::{ThermodynamicMetrics, derive_metrics, kalchm};

/// Result of one transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    pub energy: EnergyVector,
    /// Normalized elemental vector (sums to 1).
    pub elements: ElementalVector,
    /// Unit-increment counts per element, before normalization.
    pub raw_elements: ElementalVector,
    pub thermodynamics: ThermodynamicMetrics,
}

/// Table-driven transform from body positions to derived metrics.
#[derive(Debug, Clone, Default)]
pub struct AlchemicalTransform {
    tables: TransformTables,
}

impl AlchemicalTransform {
    pub fn new(tables: TransformTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &TransformTables {
        &self.tables
    }

    /// ESMS accumulation: each present body adds its weight row scaled by
    /// the dignity multiplier of its current sign.
    pub fn energy_of(&self, positions: &PositionMap) -> EnergyVector {
        positions
            .iter()
            .fold(EnergyVector::default(), |acc, (&body, pos)| {
                let multiplier = self.tables.dignity.multiplier(body, pos.sign());
                acc + self.tables.esms_for(body) * multiplier
            })
    }

    /// Unnormalized element counts: +1 per body to its sign's element.
    pub fn raw_elements_of(&self, positions: &PositionMap) -> ElementalVector {
        let mut acc = ElementalVector::default();
        for pos in positions.values() {
            acc.add(pos.sign().element(), 1.0);
        }
        acc
    }

    pub fn transform(&self, positions: &PositionMap) -> TransformOutput {
        let energy = self.energy_of(positions);
        let raw_elements = self.raw_elements_of(positions);
        let thermodynamics = derive_metrics(&energy, &raw_elements);
        TransformOutput {
            energy,
            elements: raw_elements.normalized(),
            raw_elements,
            thermodynamics,
        }
    }

    /// Kalchm of a stored energy vector (e.g. an ingredient's own ESMS values).
    pub fn kalchm_for(&self, energy: &EnergyVector) -> f64 {
        kalchm(energy)
    }
}
