//! Recipe and ingredient records as consumed by the scorer.
//!
//! Every affinity field is optional. Names are matched case-insensitively;
//! names that do not parse are ignored for matching but still count as
//! declared.

use alchm_core::{Body, ElementalVector, EnergyVector, LunarPhase, ZodiacSign};
use alchm_time::Season;
use serde::{Deserialize, Serialize};

/// Sentinel meaning "in season all year".
pub const ALL_SEASONS_SENTINEL: &str = "all";

/// `"seasonality"` may be a single name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seasonality {
    One(String),
    Many(Vec<String>),
}

impl Seasonality {
    pub fn names(&self) -> &[String] {
        match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }

    pub fn is_all_year(&self) -> bool {
        self.names()
            .iter()
            .any(|n| n.trim().eq_ignore_ascii_case(ALL_SEASONS_SENTINEL))
    }

    pub fn includes(&self, season: Season) -> bool {
        self.names()
            .iter()
            .filter_map(|n| n.trim().parse::<Season>().ok())
            .any(|s| s == season)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringItem {
    pub id: String,
    pub name: String,
    pub elemental_properties: Option<ElementalVector>,
    pub zodiac_affinities: Option<Vec<String>>,
    pub lunar_phase_affinities: Option<Vec<String>>,
    pub favorable_planets: Option<Vec<String>>,
    pub unfavorable_planets: Option<Vec<String>>,
    pub seasonality: Option<Seasonality>,
    /// Stored ESMS values, used for ingredient-set Kalchm.
    pub energy: Option<EnergyVector>,
}

impl ScoringItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_elements(mut self, elements: ElementalVector) -> Self {
        self.elemental_properties = Some(elements);
        self
    }

    pub fn with_zodiac(mut self, signs: &[&str]) -> Self {
        self.zodiac_affinities = Some(to_owned(signs));
        self
    }

    pub fn with_lunar_phases(mut self, phases: &[&str]) -> Self {
        self.lunar_phase_affinities = Some(to_owned(phases));
        self
    }

    pub fn with_planets(mut self, favorable: &[&str], unfavorable: &[&str]) -> Self {
        self.favorable_planets = Some(to_owned(favorable));
        self.unfavorable_planets = Some(to_owned(unfavorable));
        self
    }

    pub fn with_seasonality(mut self, seasonality: Seasonality) -> Self {
        self.seasonality = Some(seasonality);
        self
    }

    pub fn with_energy(mut self, energy: EnergyVector) -> Self {
        self.energy = Some(energy);
        self
    }

    /// Declared signs that parse.
    pub fn zodiac_signs(&self) -> Vec<ZodiacSign> {
        parse_all(self.zodiac_affinities.as_deref())
    }

    pub fn lunar_phases(&self) -> Vec<LunarPhase> {
        parse_all(self.lunar_phase_affinities.as_deref())
    }

    pub fn favorable_bodies(&self) -> Vec<Body> {
        parse_all(self.favorable_planets.as_deref())
    }

    pub fn unfavorable_bodies(&self) -> Vec<Body> {
        parse_all(self.unfavorable_planets.as_deref())
    }
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

fn parse_all<T: std::str::FromStr>(names: Option<&[String]>) -> Vec<T> {
    names
        .unwrap_or_default()
        .iter()
        .filter_map(|n| n.trim().parse().ok())
        .collect()
}
