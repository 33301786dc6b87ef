//! Last-resort fixed position table.

use alchm_core::{Body, Position, PositionMap, ZodiacSign};
use alchm_time::Timestamp;

use crate::error::SourceError;
use crate::source::{GeoLocation, PositionSource};

/// One row of the static table: (body, sign, degree, minute, retrograde).
type StaticRow = (Body, ZodiacSign, u8, u8, bool);

/// Sky of 2025-03-28, ten bodies.
pub const STATIC_POSITIONS: [StaticRow; 10] = [
    (Body::Sun, ZodiacSign::Aries, 8, 30, false),
    (Body::Moon, ZodiacSign::Aries, 1, 34, false),
    (Body::Mercury, ZodiacSign::Aries, 0, 51, true),
    (Body::Venus, ZodiacSign::Pisces, 29, 5, true),
    (Body::Mars, ZodiacSign::Cancer, 22, 38, false),
    (Body::Jupiter, ZodiacSign::Gemini, 15, 31, false),
    (Body::Saturn, ZodiacSign::Pisces, 24, 7, false),
    (Body::Uranus, ZodiacSign::Taurus, 24, 37, false),
    (Body::Neptune, ZodiacSign::Pisces, 29, 56, false),
    (Body::Pluto, ZodiacSign::Aquarius, 3, 30, false),
];

/// Source that always answers with [`STATIC_POSITIONS`], whatever the instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPositionSource;

impl StaticPositionSource {
    pub const NAME: &'static str = "static-table";

    /// The table as a position map. Rows are validated in tests; an invalid
    /// row would simply be skipped.
    pub fn table() -> PositionMap {
        STATIC_POSITIONS
            .iter()
            .filter_map(|&(body, sign, degree, minute, retro)| {
                Position::new(sign, degree, minute, retro)
                    .ok()
                    .map(|p| (body, p))
            })
            .collect()
    }
}

impl PositionSource for StaticPositionSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn positions(
        &self,
        _at: Timestamp,
        _location: Option<&GeoLocation>,
    ) -> Result<PositionMap, SourceError> {
        Ok(Self::table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alchm_core::ALL_BODIES;

    #[test]
    fn table_has_all_ten_bodies() {
        let table = StaticPositionSource::table();
        assert_eq!(table.len(), 10);
        for body in ALL_BODIES {
            assert!(table.contains_key(&body), "missing {body}");
        }
    }

    #[test]
    fn retrograde_flags() {
        let table = StaticPositionSource::table();
        assert!(table[&Body::Mercury].is_retrograde());
        assert!(table[&Body::Venus].is_retrograde());
        assert!(!table[&Body::Sun].is_retrograde());
    }
}
