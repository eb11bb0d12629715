//! Resolves exchange rates, going to the network only when the cache cannot answer.

use crate::core::cache::{DEFAULT_TTL, RateCache, RateSnapshot, RateTable};
use crate::core::currency::CurrencyCode;
use crate::core::error::ConvertError;
use crate::core::rates::RateSource;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

pub struct RateProvider {
    source: Arc<dyn RateSource>,
    cache: Mutex<RateCache>,
    // One gate per base currency so concurrent misses share a single fetch
    gates: Mutex<HashMap<CurrencyCode, Arc<Mutex<()>>>>,
    ttl: TimeDelta,
}

impl RateProvider {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self::with_ttl(source, DEFAULT_TTL)
    }

    pub fn with_ttl(source: Arc<dyn RateSource>, ttl: TimeDelta) -> Self {
        Self {
            source,
            cache: Mutex::new(RateCache::new()),
            gates: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Returns how many units of `to` one unit of `from` buys.
    ///
    /// Fetches the full rate table for `from` when there is no fresh snapshot
    /// and stores it stamped with `now`. A failed fetch leaves the cache as it
    /// was.
    #[instrument(name = "GetRate", skip(self, now), fields(from = %from, to = %to))]
    pub async fn get_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        now: DateTime<Utc>,
    ) -> Result<f64, ConvertError> {
        if let Some(result) = self.fresh_rate(from, to, now).await {
            return result;
        }

        let gate = self.gate(from).await;
        let result = {
            let _guard = gate.lock().await;
            self.fetch_rate(from, to, now).await
        };
        self.release_gate(from, gate).await;
        result
    }

    /// A copy of the cached snapshot for `base`, stale or not.
    pub async fn snapshot(&self, base: &CurrencyCode) -> Option<RateSnapshot> {
        self.cache.lock().await.get(base).cloned()
    }

    async fn fresh_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        now: DateTime<Utc>,
    ) -> Option<Result<f64, ConvertError>> {
        let cache = self.cache.lock().await;
        if cache.is_stale(from, now, self.ttl) {
            return None;
        }
        cache.get(from).map(|snapshot| lookup(&snapshot.rates, to))
    }

    async fn fetch_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        now: DateTime<Utc>,
    ) -> Result<f64, ConvertError> {
        // Another caller may have refreshed the snapshot while we waited
        if let Some(result) = self.fresh_rate(from, to, now).await {
            return result;
        }

        debug!("Fetching rates for base {}", from);
        let rates = self.source.fetch_rates(from).await?;
        let result = lookup(&rates, to);
        self.cache.lock().await.put(from.clone(), rates, now);
        result
    }

    async fn gate(&self, base: &CurrencyCode) -> Arc<Mutex<()>> {
        let mut gates = self.gates.lock().await;
        Arc::clone(gates.entry(base.clone()).or_default())
    }

    /// Drops the gate for `base` once no other caller holds or waits on it.
    async fn release_gate(&self, base: &CurrencyCode, gate: Arc<Mutex<()>>) {
        let mut gates = self.gates.lock().await;
        // One reference in the map and ours
        if Arc::strong_count(&gate) == 2 {
            gates.remove(base);
        }
    }
}

fn lookup(rates: &RateTable, to: &CurrencyCode) -> Result<f64, ConvertError> {
    match rates.get(to) {
        Some(rate) if rate.is_finite() && *rate > 0.0 => Ok(*rate),
        _ => Err(ConvertError::RateUnavailable(to.clone())),
    }
}
