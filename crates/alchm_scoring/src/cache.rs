//! Score cache keyed by item id and alignment fingerprint.
//!
//! An entry is a hit while `now - computed_at < ttl`. Expired entries are
//! dropped when looked up. The map is bounded: inserting past capacity
//! evicts the oldest insertion.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use alchm_alignment::AlignmentFingerprint;
use alchm_time::Timestamp;
use chrono::Duration;
use parking_lot::Mutex;
use serde::Serialize;

use crate::score::ScoreBreakdown;

pub const DEFAULT_SCORE_TTL_SECS: i64 = 1800;
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub item_id: String,
    pub fingerprint: AlignmentFingerprint,
}

impl CacheKey {
    pub fn new(item_id: impl Into<String>, fingerprint: AlignmentFingerprint) -> Self {
        Self {
            item_id: item_id.into(),
            fingerprint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCacheEntry {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub computed_at: Timestamp,
    pub fingerprint: AlignmentFingerprint,
}

/// Read-only counters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, 0 before any lookup.
    pub hit_rate: f64,
}

#[derive(Debug, Default)]
struct Inner {
    /// Value carries its insertion sequence so stale queue slots can be told
    /// apart from live ones.
    map: HashMap<CacheKey, (u64, ScoreCacheEntry)>,
    order: VecDeque<(u64, CacheKey)>,
    next_seq: u64,
}

impl Inner {
    fn remove_oldest(&mut self) -> bool {
        while let Some((seq, key)) = self.order.pop_front() {
            if self.map.get(&key).is_some_and(|(s, _)| *s == seq) {
                self.map.remove(&key);
                return true;
            }
        }
        false
    }

    /// Drop queue slots whose entry was removed or replaced.
    fn compact(&mut self) {
        let map = &self.map;
        self.order
            .retain(|(seq, key)| map.get(key).is_some_and(|(s, _)| s == seq));
    }
}

#[derive(Debug)]
pub struct ScoreCache {
    ttl: Duration,
    capacity: usize,
    inner: Mutex<Inner>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for ScoreCache {
    fn default() -> Self {
        Self::new(
            Duration::seconds(DEFAULT_SCORE_TTL_SECS),
            DEFAULT_CACHE_CAPACITY,
        )
    }
}

impl ScoreCache {
    /// A capacity of zero is treated as one.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            inner: Mutex::new(Inner::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &CacheKey, now: Timestamp) -> Option<ScoreCacheEntry> {
        let mut inner = self.inner.lock();
        let fresh = match inner.map.get(key) {
            Some((_, entry)) if now - entry.computed_at < self.ttl => Some(entry.clone()),
            Some(_) => {
                inner.map.remove(key);
                tracing::debug!(item = %key.item_id, "score cache entry expired");
                None
            }
            None => None,
        };
        drop(inner);

        match fresh {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn set(&self, key: CacheKey, score: f64, breakdown: ScoreBreakdown, now: Timestamp) {
        let entry = ScoreCacheEntry {
            score,
            breakdown,
            computed_at: now,
            fingerprint: key.fingerprint.clone(),
        };
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.order.push_back((seq, key.clone()));
        inner.map.insert(key, (seq, entry));

        while inner.map.len() > self.capacity {
            if !inner.remove_oldest() {
                break;
            }
        }
        if inner.order.len() > self.capacity.saturating_mul(2) {
            inner.compact();
        }
    }

    pub fn invalidate_all(&self) {
        let mut inner = self.inner.lock();
        inner.map.clear();
        inner.order.clear();
    }

    /// Drop entries computed against any other fingerprint. Returns how many
    /// were removed.
    pub fn retain_fingerprint(&self, current: &AlignmentFingerprint) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.map.len();
        inner.map.retain(|key, _| &key.fingerprint == current);
        let removed = before - inner.map.len();
        if removed > 0 {
            inner.compact();
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        CacheStats {
            size: self.len(),
            hits,
            misses,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }
}
