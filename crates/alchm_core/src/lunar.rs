//! The eight named lunar phases.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LunarPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

pub const ALL_LUNAR_PHASES: [LunarPhase; 8] = [
    LunarPhase::NewMoon,
    LunarPhase::WaxingCrescent,
    LunarPhase::FirstQuarter,
    LunarPhase::WaxingGibbous,
    LunarPhase::FullMoon,
    LunarPhase::WaningGibbous,
    LunarPhase::LastQuarter,
    LunarPhase::WaningCrescent,
];

impl LunarPhase {
    pub const fn name(self) -> &'static str {
        match self {
            Self::NewMoon => "new moon",
            Self::WaxingCrescent => "waxing crescent",
            Self::FirstQuarter => "first quarter",
            Self::WaxingGibbous => "waxing gibbous",
            Self::FullMoon => "full moon",
            Self::WaningGibbous => "waning gibbous",
            Self::LastQuarter => "last quarter",
            Self::WaningCrescent => "waning crescent",
        }
    }

    /// Phases whose name contains "waxing".
    pub const fn is_waxing(self) -> bool {
        matches!(self, Self::WaxingCrescent | Self::WaxingGibbous)
    }

    /// Phases whose name contains "waning".
    pub const fn is_waning(self) -> bool {
        matches!(self, Self::WaningGibbous | Self::WaningCrescent)
    }
}

impl Display for LunarPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LunarPhase {
    type Err = CoreError;

    /// Accepts "full moon", "Full Moon", "full_moon", "full-moon" and the
    /// short forms "new"/"full"; "third quarter" is an alias of last quarter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c.to_ascii_lowercase() })
            .collect();
        match key.as_str() {
            "new" => return Ok(Self::NewMoon),
            "full" => return Ok(Self::FullMoon),
            "third quarter" => return Ok(Self::LastQuarter),
            _ => {}
        }
        ALL_LUNAR_PHASES
            .iter()
            .copied()
            .find(|p| p.name() == key)
            .ok_or_else(|| CoreError::UnknownLunarPhase(s.to_string()))
    }
}
