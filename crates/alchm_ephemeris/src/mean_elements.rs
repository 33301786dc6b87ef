//! Low-fidelity analytic positions from J2000 mean orbital elements.
//!
//! Orbits are treated as circular and coplanar with the ecliptic:
//! heliocentric position is `a·(cos L, sin L)` with `L = L0 + n·d`, and the
//! geocentric longitude is the direction from Earth to the body. Good to a
//! few degrees for the outer planets and roughly a sign for the inner ones;
//! this source only exists so the chain has something better than a fixed
//! table when the primary source is down.
//!
//! Retrograde motion is detected by comparing the longitude one day later.

use alchm_core::{Body, Position, PositionMap};
use alchm_time::{Timestamp, days_since_j2000};

use crate::error::SourceError;
use crate::source::{GeoLocation, PositionSource};

/// Days per Julian century.
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Mean elements at J2000: semi-major axis (AU), mean longitude (deg),
/// mean-longitude rate (deg per Julian century).
#[derive(Debug, Clone, Copy)]
struct MeanElements {
    a_au: f64,
    l0_deg: f64,
    rate_deg_per_century: f64,
}

impl MeanElements {
    const fn new(a_au: f64, l0_deg: f64, rate_deg_per_century: f64) -> Self {
        Self {
            a_au,
            l0_deg,
            rate_deg_per_century,
        }
    }

    fn mean_longitude_rad(&self, days: f64) -> f64 {
        (self.l0_deg + self.rate_deg_per_century * days / DAYS_PER_CENTURY).to_radians()
    }

    fn heliocentric_xy(&self, days: f64) -> (f64, f64) {
        let l = self.mean_longitude_rad(days);
        (self.a_au * l.cos(), self.a_au * l.sin())
    }
}

const EARTH: MeanElements = MeanElements::new(1.000_002_61, 100.464_571_66, 35_999.372_449_81);

const PLANETS: [(Body, MeanElements); 8] = [
    (Body::Mercury, MeanElements::new(0.387_099_27, 252.250_323_50, 149_472.674_111_75)),
    (Body::Venus, MeanElements::new(0.723_335_66, 181.979_099_50, 58_517.815_387_29)),
    (Body::Mars, MeanElements::new(1.523_710_34, -4.553_432_05, 19_140.302_684_99)),
    (Body::Jupiter, MeanElements::new(5.202_887_00, 34.396_440_51, 3_034.746_127_75)),
    (Body::Saturn, MeanElements::new(9.536_675_94, 49.954_244_23, 1_222.493_622_01)),
    (Body::Uranus, MeanElements::new(19.189_164_64, 313.238_104_51, 428.482_027_85)),
    (Body::Neptune, MeanElements::new(30.069_922_76, -55.120_029_69, 218.459_453_25)),
    (Body::Pluto, MeanElements::new(39.482_116_75, 238.929_038_33, 145.207_805_15)),
];

/// Moon mean longitude at J2000 (deg) and daily rate (deg/day).
const MOON_L0_DEG: f64 = 218.316_5;
const MOON_RATE_DEG_PER_DAY: f64 = 13.176_396_48;

fn normalize_360(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Geocentric ecliptic longitude (deg) of `body` at `days` past J2000.
pub fn mean_geocentric_longitude(body: Body, days: f64) -> f64 {
    let (xe, ye) = EARTH.heliocentric_xy(days);
    match body {
        Body::Sun => normalize_360((-ye).atan2(-xe).to_degrees()),
        Body::Moon => normalize_360(MOON_L0_DEG + MOON_RATE_DEG_PER_DAY * days),
        _ => {
            let elements = PLANETS
                .iter()
                .find(|(b, _)| *b == body)
                .map(|(_, el)| *el)
                .unwrap_or(EARTH);
            let (x, y) = elements.heliocentric_xy(days);
            normalize_360((y - ye).atan2(x - xe).to_degrees())
        }
    }
}

/// Signed daily motion in degrees, wrapped to (-180, 180].
fn daily_motion(body: Body, days: f64) -> f64 {
    let delta = mean_geocentric_longitude(body, days + 1.0) - mean_geocentric_longitude(body, days);
    let wrapped = (delta + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MeanElementsSource;

impl MeanElementsSource {
    pub const NAME: &'static str = "mean-elements";

    pub fn compute(at: Timestamp) -> PositionMap {
        let days = days_since_j2000(at);
        alchm_core::ALL_BODIES
            .iter()
            .map(|&body| {
                let lon = mean_geocentric_longitude(body, days);
                let retrograde = match body {
                    Body::Sun | Body::Moon => false,
                    _ => daily_motion(body, days) < 0.0,
                };
                (body, Position::from_longitude(lon, retrograde))
            })
            .collect()
    }
}

impl PositionSource for MeanElementsSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn positions(
        &self,
        at: Timestamp,
        _location: Option<&GeoLocation>,
    ) -> Result<PositionMap, SourceError> {
        let days = days_since_j2000(at);
        if !days.is_finite() {
            return Err(SourceError::Unavailable("epoch not representable".into()));
        }
        Ok(Self::compute(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alchm_core::ZodiacSign;
    use chrono::{TimeZone, Utc};

    #[test]
    fn sun_near_equinox_is_pisces_or_aries() {
        let t = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let lon = mean_geocentric_longitude(Body::Sun, days_since_j2000(t));
        // Mean sun ignores the equation of center (~2 deg).
        let off = (lon + 180.0).rem_euclid(360.0) - 180.0;
        assert!(off.abs() < 3.0, "sun lon {lon}");
    }

    #[test]
    fn sun_in_leo_early_august() {
        let t = Utc.with_ymd_and_hms(2024, 8, 5, 0, 0, 0).unwrap();
        let map = MeanElementsSource::compute(t);
        assert_eq!(map[&Body::Sun].sign(), ZodiacSign::Leo);
    }

    #[test]
    fn answers_for_every_body() {
        let t = Utc.with_ymd_and_hms(2025, 3, 28, 12, 0, 0).unwrap();
        let map = MeanElementsSource.positions(t, None).unwrap();
        assert_eq!(map.len(), 10);
        assert!(!map[&Body::Sun].is_retrograde());
        assert!(!map[&Body::Moon].is_retrograde());
    }

    #[test]
    fn outer_planet_retrogrades_at_opposition() {
        // At opposition (Sun and planet 180 deg apart) a superior planet moves backward.
        let mut found = false;
        for day in 0..800 {
            let d = day as f64;
            let sun = mean_geocentric_longitude(Body::Sun, d);
            let jup = mean_geocentric_longitude(Body::Jupiter, d);
            let sep = ((jup - sun).rem_euclid(360.0) - 180.0).abs();
            if sep < 1.0 {
                assert!(daily_motion(Body::Jupiter, d) < 0.0);
                found = true;
            }
        }
        assert!(found, "no opposition found in search window");
    }
}
