//! PriceSeries — the validated, date-ordered input to one analysis run.

use super::bar::PriceBar;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Reasons a set of bars cannot form a `PriceSeries`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("price series for '{symbol}' is empty")]
    Empty { symbol: String },

    #[error("bar {index} ({date}) is not after the previous bar ({previous})")]
    OutOfOrder {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("bar {index} ({date}) has a non-positive or non-finite price")]
    InvalidPrice { index: usize, date: NaiveDate },
}

/// An ordered sequence of daily bars for one ticker.
///
/// Invariants, enforced by [`PriceSeries::new`]:
/// - at least one bar
/// - dates strictly ascending (so no duplicates)
/// - every OHLC value finite and positive
///
/// The series is never mutated after construction. Indicators are separate
/// aligned series keyed by the same index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(SeriesError::Empty { symbol });
        }

        for (i, bar) in bars.iter().enumerate() {
            if !bar.has_valid_prices() {
                return Err(SeriesError::InvalidPrice {
                    index: i,
                    date: bar.date,
                });
            }
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(SeriesError::OutOfOrder {
                    index: i,
                    date: bar.date,
                    previous: bars[i - 1].date,
                });
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent bar.
    pub fn latest(&self) -> &PriceBar {
        // Non-empty by construction.
        &self.bars[self.bars.len() - 1]
    }

    pub fn first(&self) -> &PriceBar {
        &self.bars[0]
    }

    /// Close prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Index of the bar for `date`, if present.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.bars.binary_search_by_key(&date, |b| b.date).ok()
    }

    /// BLAKE3 content hash over symbol, dates, and OHLCV.
    ///
    /// Two series hash equal iff they would produce identical indicator output.
    pub fn dataset_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.symbol.as_bytes());
        for bar in &self.bars {
            hasher.update(bar.date.to_string().as_bytes());
            for price in [bar.open, bar.high, bar.low, bar.close] {
                hasher.update(&price.to_le_bytes());
            }
            hasher.update(&bar.volume.unwrap_or(0).to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: Some(1000),
        }
    }

    #[test]
    fn valid_series_constructs() {
        let series = PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(3, 11.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.closes(), vec![10.0, 11.0]);
        assert_eq!(series.latest().close, 11.0);
    }

    #[test]
    fn empty_series_rejected() {
        let err = PriceSeries::new("AAPL", vec![]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::Empty {
                symbol: "AAPL".into()
            }
        );
    }

    #[test]
    fn duplicate_date_rejected() {
        let err = PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(2, 11.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::OutOfOrder { index: 1, .. }));
    }

    #[test]
    fn descending_dates_rejected() {
        let err = PriceSeries::new("AAPL", vec![bar(3, 10.0), bar(2, 11.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::OutOfOrder { index: 1, .. }));
    }

    #[test]
    fn non_positive_close_rejected() {
        let err = PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(3, -1.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidPrice { index: 1, .. }));
    }

    #[test]
    fn index_of_finds_dates() {
        let series = PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(5, 11.0)]).unwrap();
        assert_eq!(
            series.index_of(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            Some(1)
        );
        assert_eq!(
            series.index_of(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            None
        );
    }

    #[test]
    fn dataset_hash_is_content_addressed() {
        let a = PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(3, 11.0)]).unwrap();
        let b = PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(3, 11.0)]).unwrap();
        let c = PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(3, 11.5)]).unwrap();
        assert_eq!(a.dataset_hash(), b.dataset_hash());
        assert_ne!(a.dataset_hash(), c.dataset_hash());
    }
}
