//! The alignment snapshot and its fingerprint.

use std::fmt::{Display, Formatter};

use alchm_core::{
    Body, ElementalVector, EnergyVector, LunarPhase, ThermodynamicMetrics, ZodiacSign,
};
use alchm_time::{CalendarParts, Timestamp};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::aspects::Aspect;
use crate::chakra::{ChakraDistribution, calculate_chakra_distribution};
use crate::dominant::DominantBody;
use crate::symbolic::{SymbolicAssociations, calculate_symbolic_associations};
use crate::tables::{AlignmentTables, FALLBACK_SIGN};

/// Hex characters kept from the SHA-256 digest.
const FINGERPRINT_LEN: usize = 16;

/// Weight of each of the two fallback dominant bodies.
pub const FALLBACK_BODY_WEIGHT: f64 = 0.5;

/// Source name recorded on the fallback alignment.
pub const FALLBACK_SOURCE: &str = "fallback";

/// Short digest of sign, lunar phase and elemental balance.
///
/// Identical inputs always give the same fingerprint; the balance is
/// rounded to six decimals first so float noise below that does not
/// change it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlignmentFingerprint(String);

impl AlignmentFingerprint {
    pub fn compute(sign: ZodiacSign, phase: LunarPhase, balance: &ElementalVector) -> Self {
        let canonical = format!(
            "{}|{}|{:.6}|{:.6}|{:.6}|{:.6}",
            sign.name(),
            phase.name(),
            balance.fire,
            balance.water,
            balance.earth,
            balance.air
        );
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let mut hex = format!("{:x}", hasher.finalize());
        hex.truncate(FINGERPRINT_LEN);
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AlignmentFingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of the current alignment. Shared as `Arc<Alignment>` and never
/// mutated; a recompute produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alignment {
    pub timestamp: Timestamp,
    pub zodiac_sign: ZodiacSign,
    pub dominant_bodies: Vec<DominantBody>,
    pub lunar_phase: LunarPhase,
    pub lunar_illumination: f64,
    pub elemental_balance: ElementalVector,
    pub aspects: Vec<Aspect>,
    pub symbolic: SymbolicAssociations,
    pub chakras: ChakraDistribution,
    pub energy: EnergyVector,
    pub thermodynamics: ThermodynamicMetrics,
    /// Name of the position source that supplied the positions.
    pub position_source: String,
    pub is_fallback: bool,
    pub fingerprint: AlignmentFingerprint,
}

impl Alignment {
    /// Static alignment used when computation fails: Aries, Sun and Moon at
    /// equal weight, full moon, equal elemental quarters.
    pub fn fallback(at: Timestamp, tables: &AlignmentTables) -> Self {
        let parts = CalendarParts::from_timestamp(at);
        let dominant_bodies = vec![
            DominantBody::new(Body::Sun, FALLBACK_BODY_WEIGHT),
            DominantBody::new(Body::Moon, FALLBACK_BODY_WEIGHT),
        ];
        let elemental_balance = ElementalVector::balanced();
        let energy = EnergyVector::default();
        let symbolic = calculate_symbolic_associations(
            tables,
            parts.month0,
            parts.day,
            FALLBACK_SIGN,
            &dominant_bodies,
        );
        let chakras =
            calculate_chakra_distribution(&tables.chakra_weights, &elemental_balance, &energy);
        Self {
            timestamp: at,
            zodiac_sign: FALLBACK_SIGN,
            dominant_bodies,
            lunar_phase: LunarPhase::FullMoon,
            lunar_illumination: 1.0,
            fingerprint: AlignmentFingerprint::compute(
                FALLBACK_SIGN,
                LunarPhase::FullMoon,
                &elemental_balance,
            ),
            elemental_balance,
            aspects: Vec::new(),
            symbolic,
            chakras,
            energy,
            thermodynamics: ThermodynamicMetrics::neutral(),
            position_source: FALLBACK_SOURCE.to_string(),
            is_fallback: true,
        }
    }

    /// Bodies named in the dominant list, duplicates removed, first
    /// occurrence order.
    pub fn dominant_body_set(&self) -> Vec<Body> {
        let mut out: Vec<Body> = Vec::with_capacity(self.dominant_bodies.len());
        for d in &self.dominant_bodies {
            if !out.contains(&d.body) {
                out.push(d.body);
            }
        }
        out
    }

    pub fn has_dominant(&self, body: Body) -> bool {
        self.dominant_bodies.iter().any(|d| d.body == body)
    }

    /// Seconds between the snapshot and `now`.
    pub fn age_secs(&self, now: Timestamp) -> i64 {
        (now - self.timestamp).num_seconds()
    }
}
