//! Static lookup tables consumed by the transform.
//!
//! Tables are plain data handed to [`crate::AlchemicalTransform`] at
//! construction, so alternative tables can be tested in isolation.

use crate::body::Body;
use crate::energy::EnergyVector;
use crate::zodiac::ZodiacSign;

/// Dignity multiplier step per dignity point.
pub const DIGNITY_STEP: f64 = 0.2;

/// Lower bound of the dignity multiplier.
pub const DIGNITY_FLOOR: f64 = 0.1;

/// Per-body ESMS contribution, indexed by [`Body::index`].
pub const STANDARD_ESMS: [EnergyVector; 10] = [
    EnergyVector::new(1.0, 0.0, 0.0, 0.0), // Sun
    EnergyVector::new(0.0, 1.0, 1.0, 0.0), // Moon
    EnergyVector::new(1.0, 0.0, 0.0, 1.0), // Mercury
    EnergyVector::new(0.0, 1.0, 1.0, 0.0), // Venus
    EnergyVector::new(0.0, 1.0, 1.0, 0.0), // Mars
    EnergyVector::new(1.0, 1.0, 0.0, 0.0), // Jupiter
    EnergyVector::new(1.0, 0.0, 1.0, 0.0), // Saturn
    EnergyVector::new(0.0, 1.0, 1.0, 0.0), // Uranus
    EnergyVector::new(0.0, 1.0, 0.0, 1.0), // Neptune
    EnergyVector::new(0.0, 1.0, 1.0, 0.0), // Pluto
];

/// Per-body, per-sign integer dignity scores.
///
/// Domicile +1, exaltation +2, detriment -1, fall -2; a sign holding two
/// dignities for the same body carries their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DignityTable {
    rows: [[i8; 12]; 10],
}

impl DignityTable {
    pub const fn new(rows: [[i8; 12]; 10]) -> Self {
        Self { rows }
    }

    /// Table with every score zero (multiplier 1.0 everywhere).
    pub const fn neutral() -> Self {
        Self { rows: [[0; 12]; 10] }
    }

    pub const fn score(&self, body: Body, sign: ZodiacSign) -> i8 {
        self.rows[body.index()][sign.index() as usize]
    }

    /// `max(0.1, 1 + dignity * 0.2)`.
    pub fn multiplier(&self, body: Body, sign: ZodiacSign) -> f64 {
        dignity_multiplier(self.score(body, sign))
    }
}

pub fn dignity_multiplier(dignity: i8) -> f64 {
    (1.0 + dignity as f64 * DIGNITY_STEP).max(DIGNITY_FLOOR)
}

#[rustfmt::skip]
pub const STANDARD_DIGNITIES: DignityTable = DignityTable::new([
    //Ari Tau Gem Can Leo Vir Lib Sco Sag Cap Aqu Pis
    [ 2,  0,  0,  0,  1,  0, -2,  0,  0,  0, -1,  0], // Sun
    [ 0,  2,  0,  1,  0,  0,  0, -2,  0, -1,  0,  0], // Moon
    [ 0,  0,  1,  0,  0,  3,  0,  0, -1,  0,  0, -3], // Mercury
    [-1,  1,  0,  0,  0, -2,  1, -1,  0,  0,  0,  2], // Venus
    [ 1, -1,  0, -2,  0,  0, -1,  1,  0,  2,  0,  0], // Mars
    [ 0,  0, -1,  2,  0, -1,  0,  0,  1, -2,  0,  1], // Jupiter
    [-2,  0,  0, -1, -1,  0,  2,  0,  0,  1,  1,  0], // Saturn
    [ 0, -2,  0,  0, -1,  0,  0,  2,  0,  0,  1,  0], // Uranus
    [ 0,  0,  0,  2,  0, -1,  0,  0,  0, -2,  0,  1], // Neptune
    [ 0, -1,  0,  0,  2,  0,  0,  1,  0,  0, -2,  0], // Pluto
]);

/// Tables the transform is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformTables {
    pub esms: [EnergyVector; 10],
    pub dignity: DignityTable,
}

impl TransformTables {
    pub fn esms_for(&self, body: Body) -> EnergyVector {
        self.esms[body.index()]
    }
}

impl Default for TransformTables {
    fn default() -> Self {
        Self {
            esms: STANDARD_ESMS,
            dignity: STANDARD_DIGNITIES,
        }
    }
}
