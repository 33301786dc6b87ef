//! The position-source seam.

use alchm_core::PositionMap;
use alchm_time::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Observer location on Earth's surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Geodetic latitude in degrees, north positive.
    pub latitude_deg: f64,
    /// Geodetic longitude in degrees, east positive.
    pub longitude_deg: f64,
}

impl GeoLocation {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }
}

/// Supplies body positions for an instant. May fail; the chain falls
/// through to the next source.
pub trait PositionSource: Send + Sync {
    /// Short identifier used in logs and fetch outcomes.
    fn name(&self) -> &str;

    fn positions(
        &self,
        at: Timestamp,
        location: Option<&GeoLocation>,
    ) -> Result<PositionMap, SourceError>;
}

/// Adapter turning a closure into a [`PositionSource`].
///
/// Lets the surrounding application plug in network clients without this
/// crate depending on them.
pub struct FnSource<F> {
    name: String,
    f: F,
}

impl<F> FnSource<F>
where
    F: Fn(Timestamp, Option<&GeoLocation>) -> Result<PositionMap, SourceError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> PositionSource for FnSource<F>
where
    F: Fn(Timestamp, Option<&GeoLocation>) -> Result<PositionMap, SourceError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn positions(
        &self,
        at: Timestamp,
        location: Option<&GeoLocation>,
    ) -> Result<PositionMap, SourceError> {
        (self.f)(at, location)
    }
}

impl<F> std::fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSource").field("name", &self.name).finish()
    }
}
