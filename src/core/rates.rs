//! Exchange rate lookup abstractions

use crate::core::cache::RateTable;
use crate::core::currency::CurrencyCode;
use crate::core::error::FetchError;
use async_trait::async_trait;

/// A remote source of exchange rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches every rate quoted against `base` in one call.
    async fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateTable, FetchError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Serves a canned response and counts how often it was asked.
    pub(crate) struct MockRateSource {
        response: Mutex<Result<RateTable, FetchError>>,
        delay: Option<Duration>,
        pub(crate) calls: AtomicUsize,
    }

    impl MockRateSource {
        pub(crate) fn with_rates(pairs: &[(&str, f64)]) -> Self {
            Self {
                response: Mutex::new(Ok(table(pairs))),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing(error: FetchError) -> Self {
            Self {
                response: Mutex::new(Err(error)),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub(crate) fn respond_with(&self, response: Result<RateTable, FetchError>) {
            *self.response.lock().unwrap() = response;
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateSource for MockRateSource {
        async fn fetch_rates(&self, _base: &CurrencyCode) -> Result<RateTable, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response.lock().unwrap().clone()
        }
    }

    pub(crate) fn table(pairs: &[(&str, f64)]) -> RateTable {
        pairs
            .iter()
            .map(|(code, rate)| (CurrencyCode::parse(code).unwrap(), *rate))
            .collect()
    }
}
