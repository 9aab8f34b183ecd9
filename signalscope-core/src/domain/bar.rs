//! PriceBar — one trading day of market data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLC(V) bar for a single ticker.
///
/// Bars are immutable once fetched. Validation (positive, finite prices) happens
/// when bars are assembled into a [`PriceSeries`](super::PriceSeries), not here,
/// so providers can hand over raw rows and get one structured error back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Some providers omit volume for indices; absence is not an error.
    #[serde(default)]
    pub volume: Option<u64>,
}

impl PriceBar {
    /// Returns true if every OHLC field is finite and strictly positive.
    pub fn has_valid_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }

    /// OHLC sanity check: high bounds open/close/low from above, low from below.
    ///
    /// Not enforced by `PriceSeries`; providers occasionally report adjusted
    /// closes outside the raw high/low range.
    pub fn is_consistent(&self) -> bool {
        self.has_valid_prices()
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}
