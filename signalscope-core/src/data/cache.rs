//! In-memory fetch cache.
//!
//! Entries are keyed by the exact request `(ticker, start, end, interval)`.
//! There is no range merging and no persistence: a request for a sub-range of
//! a cached window is a miss. The cache lives as long as the provider that
//! owns it.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Identity of one fetch request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval: String,
}

impl SeriesKey {
    /// Daily-bar key; tickers are matched case-insensitively.
    pub fn daily(ticker: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: ticker.to_ascii_uppercase(),
            start,
            end,
            interval: "1d".into(),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedEntry {
    bars: Arc<[PriceBar]>,
    origin: DataSource,
}

#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: Mutex<HashMap<SeriesKey, CachedEntry>>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SeriesKey, CachedEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &SeriesKey) -> Option<Arc<[PriceBar]>> {
        self.lock().get(key).map(|entry| Arc::clone(&entry.bars))
    }

    /// Provider that originally produced a cached entry.
    pub fn origin(&self, key: &SeriesKey) -> Option<DataSource> {
        self.lock().get(key).map(|entry| entry.origin)
    }

    pub fn insert(&self, key: SeriesKey, bars: Vec<PriceBar>, origin: DataSource) {
        self.lock().insert(
            key,
            CachedEntry {
                bars: bars.into(),
                origin,
            },
        );
    }

    pub fn contains(&self, key: &SeriesKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// Wraps a provider with a [`SeriesCache`].
///
/// Hits return [`DataSource::Cache`]; misses delegate and store the result.
/// Failed fetches are never cached.
pub struct CachedProvider<P> {
    inner: P,
    cache: Arc<SeriesCache>,
}

impl<P: DataProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self::with_cache(inner, Arc::new(SeriesCache::new()))
    }

    /// Share a cache between several wrapped providers.
    pub fn with_cache(inner: P, cache: Arc<SeriesCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: DataProvider> DataProvider for CachedProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let key = SeriesKey::daily(symbol, start, end);
        if let Some(bars) = self.cache.get(&key) {
            debug!(symbol, %start, %end, bars = bars.len(), "cache hit");
            return Ok(FetchResult {
                symbol: symbol.to_string(),
                bars: bars.to_vec(),
                source: DataSource::Cache,
            });
        }

        let result = self.inner.fetch(symbol, start, end)?;
        self.cache.insert(key, result.bars.clone(), result.source);
        Ok(result)
    }

    fn is_available(&self) -> bool {
        self.inner.is_available()
    }
}
