//! In-memory exchange-rate snapshots keyed by base currency

use crate::core::currency::CurrencyCode;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use tracing::debug;

/// How long a snapshot is served before it is refetched.
pub const DEFAULT_TTL: TimeDelta = TimeDelta::minutes(10);

/// Rates quoted against a single base currency.
pub type RateTable = HashMap<CurrencyCode, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    pub base: CurrencyCode,
    pub rates: RateTable,
    pub fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn rate(&self, to: &CurrencyCode) -> Option<f64> {
        self.rates.get(to).copied()
    }
}

/// Rate snapshots keyed by base currency.
///
/// Entries are never removed; a snapshot older than the TTL is only reported
/// as stale and replaced on the next successful fetch.
#[derive(Debug, Default)]
pub struct RateCache {
    snapshots: HashMap<CurrencyCode, RateSnapshot>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, base: &CurrencyCode) -> Option<&RateSnapshot> {
        let snapshot = self.snapshots.get(base);
        if snapshot.is_some() {
            debug!(%base, "Cache HIT");
        } else {
            debug!(%base, "Cache MISS");
        }
        snapshot
    }

    pub fn put(&mut self, base: CurrencyCode, rates: RateTable, now: DateTime<Utc>) {
        // fetched_at never moves backwards for a base
        let fetched_at = match self.snapshots.get(&base) {
            Some(previous) if previous.fetched_at > now => previous.fetched_at,
            _ => now,
        };
        debug!(%base, rates = rates.len(), "Cache PUT");
        self.snapshots.insert(
            base.clone(),
            RateSnapshot {
                base,
                rates,
                fetched_at,
            },
        );
    }

    pub fn is_stale(&self, base: &CurrencyCode, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        match self.snapshots.get(base) {
            Some(snapshot) => now.signed_duration_since(snapshot.fetched_at) > ttl,
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
