//! Body positions as reported by a position source.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::error::CoreError;
use crate::zodiac::{ZodiacSign, sign_from_longitude};

/// Position of one body: sign, whole degree, arc-minute and motion flag.
///
/// Immutable once built; the constructor enforces `degree < 30` and
/// `minute < 60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    sign: ZodiacSign,
    degree: u8,
    minute: u8,
    retrograde: bool,
}

/// Wire shape accepted by [`Position`]'s deserializer.
#[derive(Deserialize)]
struct RawPosition {
    sign: String,
    #[serde(default)]
    degree: u8,
    #[serde(default)]
    minute: u8,
    #[serde(default, alias = "isRetrograde")]
    retrograde: bool,
}

impl TryFrom<RawPosition> for Position {
    type Error = CoreError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        let sign = raw.sign.parse()?;
        Self::new(sign, raw.degree, raw.minute, raw.retrograde)
    }
}

impl Position {
    pub fn new(sign: ZodiacSign, degree: u8, minute: u8, retrograde: bool) -> Result<Self, CoreError> {
        if degree >= 30 {
            return Err(CoreError::InvalidPosition("degree must be in 0..30"));
        }
        if minute >= 60 {
            return Err(CoreError::InvalidPosition("minute must be in 0..60"));
        }
        Ok(Self {
            sign,
            degree,
            minute,
            retrograde,
        })
    }

    /// Build from an ecliptic longitude in degrees (any range; wrapped to [0, 360)).
    pub fn from_longitude(lon_deg: f64, retrograde: bool) -> Self {
        let split = sign_from_longitude(lon_deg);
        Self {
            sign: split.sign,
            degree: split.degree,
            minute: split.minute,
            retrograde,
        }
    }

    pub fn sign(&self) -> ZodiacSign {
        self.sign
    }

    pub fn degree(&self) -> u8 {
        self.degree
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn is_retrograde(&self) -> bool {
        self.retrograde
    }

    /// Ecliptic longitude in degrees [0, 360).
    pub fn longitude(&self) -> f64 {
        self.sign.index() as f64 * 30.0 + self.degree as f64 + self.minute as f64 / 60.0
    }
}

/// Positions keyed by body; ordered so iteration is deterministic.
pub type PositionMap = BTreeMap<Body, Position>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert!(Position::new(ZodiacSign::Leo, 30, 0, false).is_err());
        assert!(Position::new(ZodiacSign::Leo, 29, 60, false).is_err());
        assert!(Position::new(ZodiacSign::Leo, 29, 59, true).is_ok());
    }

    #[test]
    fn longitude_round_trip() {
        let p = Position::new(ZodiacSign::Cancer, 22, 38, false).unwrap();
        assert!((p.longitude() - (90.0 + 22.0 + 38.0 / 60.0)).abs() < 1e-12);
        let q = Position::from_longitude(p.longitude() + 1e-9, false);
        assert_eq!(q, p);
    }

    #[test]
    fn deserializes_and_validates() {
        let p: Position =
            serde_json::from_str(r#"{"sign":"Aries","degree":8,"minute":30,"isRetrograde":true}"#)
                .unwrap();
        assert_eq!(p.sign(), ZodiacSign::Aries);
        assert!(p.is_retrograde());

        let bad = serde_json::from_str::<Position>(r#"{"sign":"aries","degree":31}"#);
        assert!(bad.is_err());
        let unknown = serde_json::from_str::<Position>(r#"{"sign":"arachne"}"#);
        assert!(unknown.is_err());
    }

    #[test]
    fn map_iterates_in_body_order() {
        let mut map = PositionMap::new();
        map.insert(Body::Pluto, Position::from_longitude(10.0, false));
        map.insert(Body::Sun, Position::from_longitude(20.0, false));
        let order: Vec<Body> = map.keys().copied().collect();
        assert_eq!(order, vec![Body::Sun, Body::Pluto]);
    }
}
