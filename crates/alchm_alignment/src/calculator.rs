//! Alignment calculator with a single TTL-guarded slot.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use alchm_core::{
    AlchemicalTransform, ElementalVector, EnergyVector, LunarPhase, PositionMap, ZodiacSign,
};
use alchm_ephemeris::{GeoLocation, PositionChain};
use alchm_time::{CalendarParts, Clock, Timestamp};
use chrono::Duration;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::alignment::{Alignment, AlignmentFingerprint};
use crate::aspects::{Aspect, calculate_aspects};
use crate::chakra::{ChakraDistribution, calculate_chakra_distribution};
use crate::dominant::{DominantBody, calculate_dominant_bodies, calculate_elemental_balance};
use crate::error::AlignmentError;
use crate::lunar::{
    DEFAULT_SYNODIC_PERIOD_DAYS, LunarModel, illumination_from_fraction, phase_from_fraction,
};
use crate::symbolic::{SymbolicAssociations, calculate_symbolic_associations};
use crate::tables::{AlignmentTables, FALLBACK_SIGN};

pub const DEFAULT_ALIGNMENT_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorConfig {
    /// How long a computed alignment is served from the slot.
    pub ttl: Duration,
    pub lunar_epoch: Timestamp,
    pub synodic_period_days: f64,
    /// Observer location passed to position sources.
    pub location: Option<GeoLocation>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(DEFAULT_ALIGNMENT_TTL_SECS),
            lunar_epoch: LunarModel::default().epoch(),
            synodic_period_days: DEFAULT_SYNODIC_PERIOD_DAYS,
            location: None,
        }
    }
}

impl CalculatorConfig {
    pub fn validate(&self) -> Result<(), AlignmentError> {
        if self.ttl <= Duration::zero() {
            return Err(AlignmentError::InvalidConfig(
                "ttl must be greater than zero".into(),
            ));
        }
        if !self.synodic_period_days.is_finite() || self.synodic_period_days <= 0.0 {
            return Err(AlignmentError::InvalidConfig(
                "synodic_period_days must be positive".into(),
            ));
        }
        if let Some(loc) = &self.location {
            if !(-90.0..=90.0).contains(&loc.latitude_deg)
                || !(-180.0..=180.0).contains(&loc.longitude_deg)
            {
                return Err(AlignmentError::InvalidConfig(
                    "location out of range".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CalculatorStats {
    /// Full recomputes, fallbacks included.
    pub computations: u64,
    /// Calls answered from the slot.
    pub slot_hits: u64,
    /// Recomputes that degraded to the fallback alignment.
    pub fallbacks: u64,
    /// Background ticks skipped because a refresh was in flight.
    pub skipped_refreshes: u64,
}

/// Releases the in-flight flag when dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Computes the current alignment and keeps the latest one in a TTL slot.
///
/// `AlignmentCalculator` is `Send + Sync`; share it as
/// `Arc<AlignmentCalculator>`.
pub struct AlignmentCalculator {
    config: CalculatorConfig,
    clock: Arc<dyn Clock>,
    chain: Arc<PositionChain>,
    transform: AlchemicalTransform,
    tables: AlignmentTables,
    lunar: LunarModel,
    slot: RwLock<Option<Arc<Alignment>>>,
    refresh_in_flight: AtomicBool,
    computations: AtomicU64,
    slot_hits: AtomicU64,
    fallbacks: AtomicU64,
    skipped_refreshes: AtomicU64,
}

impl std::fmt::Debug for AlignmentCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignmentCalculator")
            .field("config", &self.config)
            .field("chain", &self.chain)
            .field("stats", &self.stats())
            .finish()
    }
}

impl AlignmentCalculator {
    pub fn new(
        config: CalculatorConfig,
        clock: Arc<dyn Clock>,
        chain: Arc<PositionChain>,
    ) -> Result<Self, AlignmentError> {
        config.validate()?;
        let lunar = LunarModel::new(config.lunar_epoch, config.synodic_period_days)?;
        Ok(Self {
            config,
            clock,
            chain,
            transform: AlchemicalTransform::default(),
            tables: AlignmentTables::default(),
            lunar,
            slot: RwLock::new(None),
            refresh_in_flight: AtomicBool::new(false),
            computations: AtomicU64::new(0),
            slot_hits: AtomicU64::new(0),
            fallbacks: AtomicU64::new(0),
            skipped_refreshes: AtomicU64::new(0),
        })
    }

    /// Replace the lookup tables. Clears the slot.
    pub fn with_tables(mut self, tables: AlignmentTables) -> Self {
        self.tables = tables;
        *self.slot.get_mut() = None;
        self
    }

    /// Replace the transform. Clears the slot.
    pub fn with_transform(mut self, transform: AlchemicalTransform) -> Self {
        self.transform = transform;
        *self.slot.get_mut() = None;
        self
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn chain(&self) -> &PositionChain {
        &self.chain
    }

    pub fn transform(&self) -> &AlchemicalTransform {
        &self.transform
    }

    pub fn tables(&self) -> &AlignmentTables {
        &self.tables
    }

    pub fn lunar_model(&self) -> &LunarModel {
        &self.lunar
    }

    /// Current alignment, from the slot while it is younger than the TTL.
    ///
    /// Never fails; internal errors produce the fallback alignment.
    pub fn current_alignment(&self, force_refresh: bool) -> Arc<Alignment> {
        let now = self.clock.now();
        if !force_refresh {
            if let Some(cached) = self.fresh_cached(now) {
                self.slot_hits.fetch_add(1, Ordering::Relaxed);
                debug!(fingerprint = %cached.fingerprint, "alignment slot hit");
                return cached;
            }
        }
        let computed = Arc::new(self.compute_at(now));
        info!(
            sign = computed.zodiac_sign.name(),
            phase = computed.lunar_phase.name(),
            source = %computed.position_source,
            fingerprint = %computed.fingerprint,
            forced = force_refresh,
            "alignment recomputed"
        );
        self.store(computed)
    }

    /// Slot content regardless of age.
    pub fn cached(&self) -> Option<Arc<Alignment>> {
        self.slot.read().clone()
    }

    /// Empty the slot; the next call recomputes.
    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }

    /// Recompute unless another background refresh is already running.
    /// Returns `None` when skipped.
    pub fn try_background_refresh(&self) -> Option<Arc<Alignment>> {
        if self
            .refresh_in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            self.skipped_refreshes.fetch_add(1, Ordering::Relaxed);
            debug!("background refresh already in flight, skipping tick");
            return None;
        }
        let _guard = InFlight(&self.refresh_in_flight);
        Some(self.current_alignment(true))
    }

    pub fn stats(&self) -> CalculatorStats {
        CalculatorStats {
            computations: self.computations.load(Ordering::Relaxed),
            slot_hits: self.slot_hits.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            skipped_refreshes: self.skipped_refreshes.load(Ordering::Relaxed),
        }
    }

    /// Compute an alignment for `at` without touching the slot.
    pub fn compute_at(&self, at: Timestamp) -> Alignment {
        self.computations.fetch_add(1, Ordering::Relaxed);
        match self.try_compute(at) {
            Ok(alignment) => alignment,
            Err(error) => {
                self.fallbacks.fetch_add(1, Ordering::Relaxed);
                warn!(%error, "alignment computation failed, using fallback alignment");
                Alignment::fallback(at, &self.tables)
            }
        }
    }

    /// Sign for a calendar day. Unmatched input logs a warning and yields
    /// Aries.
    pub fn calculate_zodiac_sign(&self, month0: u32, day: u32) -> ZodiacSign {
        self.tables.zodiac_sign(month0, day).unwrap_or_else(|error| {
            warn!(%error, "zodiac table miss, using fallback sign");
            FALLBACK_SIGN
        })
    }

    pub fn calculate_lunar_phase(&self, at: Timestamp) -> LunarPhase {
        self.lunar.phase(at)
    }

    pub fn lunar_illumination(&self, at: Timestamp) -> f64 {
        self.lunar.illumination(at)
    }

    pub fn calculate_dominant_bodies(
        &self,
        weekday: u32,
        hour: u32,
        phase: LunarPhase,
    ) -> Vec<DominantBody> {
        calculate_dominant_bodies(&self.tables, weekday, hour, phase)
    }

    pub fn calculate_elemental_balance(
        &self,
        sign: ZodiacSign,
        dominant: &[DominantBody],
        phase: LunarPhase,
    ) -> ElementalVector {
        calculate_elemental_balance(sign, dominant, phase)
    }

    pub fn calculate_symbolic_associations(
        &self,
        month0: u32,
        day: u32,
        sign: ZodiacSign,
        dominant: &[DominantBody],
    ) -> SymbolicAssociations {
        calculate_symbolic_associations(&self.tables, month0, day, sign, dominant)
    }

    pub fn calculate_chakra_distribution(
        &self,
        balance: &ElementalVector,
        energy: &EnergyVector,
    ) -> ChakraDistribution {
        calculate_chakra_distribution(&self.tables.chakra_weights, balance, energy)
    }

    pub fn calculate_aspects(&self, positions: &PositionMap) -> Vec<Aspect> {
        calculate_aspects(positions)
    }

    fn fresh_cached(&self, now: Timestamp) -> Option<Arc<Alignment>> {
        let slot = self.slot.read();
        let cached = slot.as_ref()?;
        if now - cached.timestamp < self.config.ttl {
            Some(Arc::clone(cached))
        } else {
            debug!(age_secs = cached.age_secs(now), "alignment slot expired");
            None
        }
    }

    /// Put `computed` in the slot unless the slot already holds something
    /// newer. Returns whatever the slot holds afterwards.
    fn store(&self, computed: Arc<Alignment>) -> Arc<Alignment> {
        let mut slot = self.slot.write();
        match slot.as_ref() {
            Some(existing) if existing.timestamp > computed.timestamp => Arc::clone(existing),
            _ => {
                *slot = Some(Arc::clone(&computed));
                computed
            }
        }
    }

    fn try_compute(&self, at: Timestamp) -> Result<Alignment, AlignmentError> {
        let parts = CalendarParts::from_timestamp(at);
        let zodiac_sign = self.tables.zodiac_sign(parts.month0, parts.day)?;

        let fraction = self.lunar.phase_fraction(at);
        let lunar_phase = phase_from_fraction(fraction);
        let lunar_illumination = illumination_from_fraction(fraction);

        let dominant_bodies =
            calculate_dominant_bodies(&self.tables, parts.weekday, parts.hour, lunar_phase);
        let elemental_balance =
            calculate_elemental_balance(zodiac_sign, &dominant_bodies, lunar_phase);
        if !elemental_balance.is_normalized() {
            return Err(AlignmentError::Degenerate("elemental balance"));
        }

        let fetched = self.chain.fetch(at, self.config.location.as_ref());
        let output = self.transform.transform(&fetched.positions);
        if !output.thermodynamics.is_finite() {
            return Err(AlignmentError::Degenerate("thermodynamic metrics"));
        }

        let chakras = calculate_chakra_distribution(
            &self.tables.chakra_weights,
            &elemental_balance,
            &output.energy,
        );
        if !chakras.sum().is_finite() {
            return Err(AlignmentError::Degenerate("chakra distribution"));
        }

        let symbolic = calculate_symbolic_associations(
            &self.tables,
            parts.month0,
            parts.day,
            zodiac_sign,
            &dominant_bodies,
        );

        Ok(Alignment {
            timestamp: at,
            fingerprint: AlignmentFingerprint::compute(zodiac_sign, lunar_phase, &elemental_balance),
            zodiac_sign,
            dominant_bodies,
            lunar_phase,
            lunar_illumination,
            elemental_balance,
            aspects: calculate_aspects(&fetched.positions),
            symbolic,
            chakras,
            energy: output.energy,
            thermodynamics: output.thermodynamics,
            position_source: fetched.source,
            is_fallback: false,
        })
    }
}
