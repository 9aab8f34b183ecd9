//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over price sources (Yahoo Finance, the
//! synthetic generator, the in-memory cache wrapper) so the analysis never
//! knows where its bars came from and tests can run without a network.

use crate::domain::{PriceBar, PriceSeries, SeriesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Structured error types for data operations.
///
/// Fetch failures are surfaced to the caller as-is; the analysis core is
/// never invoked on a failed fetch.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no bars for '{symbol}' between {start} and {end}")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("HTTP {status} for {symbol}")]
    Http { status: u16, symbol: String },

    #[error("provider returned an unusable series: {0}")]
    InvalidSeries(#[from] SeriesError),
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
    pub source: DataSource,
}

impl FetchResult {
    /// Validate the fetched bars into the analysis input.
    pub fn into_series(self) -> Result<PriceSeries, DataError> {
        Ok(PriceSeries::new(self.symbol, self.bars)?)
    }
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Synthetic,
    Cache,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataSource::YahooFinance => "yahoo_finance",
            DataSource::Synthetic => "synthetic",
            DataSource::Cache => "cache",
        };
        f.write_str(s)
    }
}

/// Trait for price data providers.
///
/// Implementations handle the specifics of one source. Caching sits above
/// this trait as a wrapper; providers don't know about it.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over an inclusive date range.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool;
}

pub(crate) fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), DataError> {
    if start > end {
        return Err(DataError::InvalidRange { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        }
    }

    #[test]
    fn into_series_validates() {
        let ok = FetchResult {
            symbol: "AAPL".into(),
            bars: vec![bar(1, 10.0), bar(4, 11.0)],
            source: DataSource::Synthetic,
        };
        assert_eq!(ok.into_series().unwrap().len(), 2);

        let bad = FetchResult {
            symbol: "AAPL".into(),
            bars: vec![bar(4, 10.0), bar(1, 11.0)],
            source: DataSource::Synthetic,
        };
        let err = bad.into_series().unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidSeries(SeriesError::OutOfOrder { index: 1, .. })
        ));
    }

    #[test]
    fn empty_fetch_is_invalid_series() {
        let empty = FetchResult {
            symbol: "AAPL".into(),
            bars: Vec::new(),
            source: DataSource::YahooFinance,
        };
        assert!(matches!(
            empty.into_series(),
            Err(DataError::InvalidSeries(SeriesError::Empty { .. }))
        ));
    }

    #[test]
    fn range_check() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(check_range(a, b).is_ok());
        assert!(check_range(a, a).is_ok());
        assert!(matches!(check_range(b, a), Err(DataError::InvalidRange { .. })));
    }

    #[test]
    fn source_display() {
        assert_eq!(DataSource::YahooFinance.to_string(), "yahoo_finance");
        assert_eq!(DataSource::Cache.to_string(), "cache");
    }
}
