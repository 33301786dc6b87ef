//! Major aspects between body pairs.

use alchm_core::{Body, PositionMap};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

pub const ALL_ASPECT_KINDS: [AspectKind; 5] = [
    AspectKind::Conjunction,
    AspectKind::Sextile,
    AspectKind::Square,
    AspectKind::Trine,
    AspectKind::Opposition,
];

impl AspectKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "conjunction",
            Self::Sextile => "sextile",
            Self::Square => "square",
            Self::Trine => "trine",
            Self::Opposition => "opposition",
        }
    }

    /// Exact separation in degrees.
    pub const fn angle(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Sextile => 60.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Opposition => 180.0,
        }
    }

    /// Allowed deviation from the exact angle, degrees.
    pub const fn orb(self) -> f64 {
        match self {
            Self::Conjunction | Self::Trine | Self::Opposition => 8.0,
            Self::Sextile => 6.0,
            Self::Square => 7.0,
        }
    }

    /// Kind whose orb covers `separation` (0..=180).
    pub fn matching(separation: f64) -> Option<Self> {
        ALL_ASPECT_KINDS
            .into_iter()
            .find(|k| (separation - k.angle()).abs() <= k.orb())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aspect {
    pub first: Body,
    pub second: Body,
    pub kind: AspectKind,
    /// Shortest arc between the bodies, 0..=180.
    pub separation: f64,
    /// `|separation - kind.angle()|`.
    pub deviation: f64,
}

/// Shortest angular distance between two longitudes, in `[0, 180]`.
pub fn separation(a_deg: f64, b_deg: f64) -> f64 {
    let d = (a_deg - b_deg).rem_euclid(360.0);
    if d > 180.0 { 360.0 - d } else { d }
}

/// Every pair in map order whose separation falls inside an orb.
pub fn calculate_aspects(positions: &PositionMap) -> Vec<Aspect> {
    let entries: Vec<(Body, f64)> = positions
        .iter()
        .map(|(b, p)| (*b, p.longitude()))
        .collect();

    let mut out = Vec::new();
    for (i, &(first, lon_a)) in entries.iter().enumerate() {
        for &(second, lon_b) in &entries[i + 1..] {
            let sep = separation(lon_a, lon_b);
            if let Some(kind) = AspectKind::matching(sep) {
                out.push(Aspect {
                    first,
                    second,
                    kind,
                    separation: sep,
                    deviation: (sep - kind.angle()).abs(),
                });
            }
        }
    }
    out
}
