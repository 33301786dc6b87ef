//! Positions read from a JSON snapshot file.
//!
//! Expected shape: an object keyed by body name, each value a position
//! record, e.g. `{"Sun": {"sign": "aries", "degree": 8, "minute": 30,
//! "retrograde": false}}`. Unknown body names are skipped. The file is
//! re-read on every call so an external process can keep it current.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use alchm_core::{Body, Position, PositionMap};
use alchm_time::Timestamp;
use tracing::debug;

use crate::error::SourceError;
use crate::source::{GeoLocation, PositionSource};

#[derive(Debug, Clone)]
pub struct SnapshotFileSource {
    path: PathBuf,
}

impl SnapshotFileSource {
    pub const NAME: &'static str = "snapshot-file";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Decode snapshot JSON text into a position map.
pub fn parse_snapshot(content: &str) -> Result<PositionMap, SourceError> {
    let raw: BTreeMap<String, Position> = serde_json::from_str(content)?;
    let mut positions = PositionMap::new();
    for (name, position) in raw {
        match name.parse::<Body>() {
            Ok(body) => {
                positions.insert(body, position);
            }
            Err(_) => debug!(body = %name, "skipping unknown body in snapshot"),
        }
    }
    if positions.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(positions)
}

impl PositionSource for SnapshotFileSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn positions(
        &self,
        _at: Timestamp,
        _location: Option<&GeoLocation>,
    ) -> Result<PositionMap, SourceError> {
        let content = std::fs::read_to_string(&self.path)?;
        parse_snapshot(&content)
    }
}
