//! Indicator trait and the aligned indicator series containers.
//!
//! Indicators are pure functions: close prices in, numeric series out.
//! They work on raw `f64` slices with NaN marking warm-up positions, and their
//! output is wrapped in an [`IndicatorSeries`] where definedness is explicit
//! (`Option<f64>`). The classifier only ever sees the wrapped form, so the
//! "is the latest value usable" check lives in exactly one place.

use crate::engine::{IndicatorParams, ParamError};
use chrono::NaiveDate;
use std::sync::Arc;

/// Trait for indicators.
///
/// Indicators take a full close-price series and produce an output series of
/// the same length. The first `lookback()` values are `f64::NAN` (warm-up).
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading positions that are undefined on a clean input.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    ///
    /// Returns a `Vec<f64>` of the same length as `values`. Windows longer
    /// than the input yield an all-NaN output.
    fn compute(&self, values: &[f64]) -> Vec<f64>;
}

/// A named, date-aligned indicator output.
///
/// `values[i]` is `None` while the lookback window is still filling, or when
/// the indicator is degenerate at that position. A stored `Some(v)` is always
/// finite.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    name: String,
    dates: Arc<[NaiveDate]>,
    values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// Wrap a raw indicator output, mapping NaN and infinities to `None`.
    pub fn from_raw(name: impl Into<String>, dates: Arc<[NaiveDate]>, raw: Vec<f64>) -> Self {
        let name = name.into();
        assert_eq!(
            raw.len(),
            dates.len(),
            "indicator '{name}' produced {} values for {} dates",
            raw.len(),
            dates.len()
        );
        let values = raw
            .into_iter()
            .map(|v| if v.is_finite() { Some(v) } else { None })
            .collect();
        Self {
            name,
            dates,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Value at `index`; `None` if undefined or out of range.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn is_defined(&self, index: usize) -> bool {
        self.value_at(index).is_some()
    }

    /// Value at the most recent bar.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Value on `date`, if that date is in the series and the value is defined.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        let index = self.dates.binary_search(&date).ok()?;
        self.value_at(index)
    }

    pub fn first_defined_index(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// `(date, value)` pairs in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Every indicator series computed for one price series.
///
/// Series keep the order they were inserted in, which is the engine's declared
/// order. Lookups go through the parameterized names, so `sma_short()` finds
/// `sma_50` under the default parameters and `sma_20` if the caller asked for 20.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    symbol: String,
    dataset_hash: String,
    dates: Arc<[NaiveDate]>,
    params: IndicatorParams,
    series: Vec<IndicatorSeries>,
}

impl IndicatorSet {
    /// Empty set for `dates`. Rejects parameters the classifier cannot build
    /// rules from.
    pub fn new(
        symbol: impl Into<String>,
        dataset_hash: impl Into<String>,
        dates: Arc<[NaiveDate]>,
        params: IndicatorParams,
    ) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self {
            symbol: symbol.into(),
            dataset_hash: dataset_hash.into(),
            dates,
            params,
            series: Vec::new(),
        })
    }

    /// Wrap and insert a raw indicator output. A series with the same name
    /// replaces the earlier one in place.
    pub fn insert(&mut self, name: impl Into<String>, raw: Vec<f64>) {
        let series = IndicatorSeries::from_raw(name, Arc::clone(&self.dates), raw);
        match self.series.iter_mut().find(|s| s.name == series.name) {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
    }

    pub fn get(&self, name: &str) -> Option<&IndicatorSeries> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dataset_hash(&self) -> &str {
        &self.dataset_hash
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of bars every series is aligned to.
    pub fn bar_count(&self) -> usize {
        self.dates.len()
    }

    /// Index of the most recent bar, `None` for an empty set.
    pub fn latest_index(&self) -> Option<usize> {
        self.dates.len().checked_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorSeries> {
        self.series.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn sma_short(&self) -> Option<&IndicatorSeries> {
        self.get(&self.params.sma_short_name())
    }

    pub fn sma_long(&self) -> Option<&IndicatorSeries> {
        self.get(&self.params.sma_long_name())
    }

    pub fn ema_short(&self) -> Option<&IndicatorSeries> {
        self.get(&self.params.ema_short_name())
    }

    pub fn ema_long(&self) -> Option<&IndicatorSeries> {
        self.get(&self.params.ema_long_name())
    }

    pub fn rsi(&self) -> Option<&IndicatorSeries> {
        self.get(&self.params.rsi_name())
    }

    pub fn macd(&self) -> Option<&IndicatorSeries> {
        self.get(&self.params.macd_name())
    }

    pub fn macd_signal(&self) -> Option<&IndicatorSeries> {
        self.get(&self.params.macd_signal_name())
    }

    pub fn macd_histogram(&self) -> Option<&IndicatorSeries> {
        self.get(&self.params.macd_histogram_name())
    }

    pub fn bollinger_upper(&self) -> Option<&IndicatorSeries> {
        self.get(&self.params.bollinger_upper_name())
    }

    pub fn bollinger_middle(&self) -> Option<&IndicatorSeries> {
        self.get(&self.params.bollinger_middle_name())
    }

    pub fn bollinger_lower(&self) -> Option<&IndicatorSeries> {
        self.get(&self.params.bollinger_lower_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Arc<[NaiveDate]> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        (0..n)
            .map(|i| base + chrono::Duration::days(i as i64))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn series_maps_non_finite_to_none() {
        let s = IndicatorSeries::from_raw(
            "x",
            dates(4),
            vec![f64::NAN, 1.0, f64::INFINITY, 2.0],
        );
        assert_eq!(s.values(), &[None, Some(1.0), None, Some(2.0)]);
        assert_eq!(s.first_defined_index(), Some(1));
        assert_eq!(s.defined_count(), 2);
        assert_eq!(s.latest(), Some(2.0));
    }

    #[test]
    fn series_value_at_out_of_range_is_none() {
        let s = IndicatorSeries::from_raw("x", dates(2), vec![1.0, 2.0]);
        assert_eq!(s.value_at(1), Some(2.0));
        assert_eq!(s.value_at(2), None);
    }

    #[test]
    fn series_value_on_date() {
        let d = dates(3);
        let s = IndicatorSeries::from_raw("x", Arc::clone(&d), vec![f64::NAN, 5.0, 6.0]);
        assert_eq!(s.value_on(d[1]), Some(5.0));
        assert_eq!(s.value_on(d[0]), None);
        assert_eq!(
            s.value_on(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()),
            None
        );
    }

    #[test]
    #[should_panic(expected = "produced 1 values for 2 dates")]
    fn series_length_mismatch_panics() {
        IndicatorSeries::from_raw("x", dates(2), vec![1.0]);
    }

    #[test]
    fn set_insert_replaces_same_name() {
        let mut set = IndicatorSet::new("TEST", "hash", dates(2), IndicatorParams::default()).unwrap();
        set.insert("sma_2", vec![f64::NAN, 1.0]);
        set.insert("ema_2", vec![1.0, 1.0]);
        set.insert("sma_2", vec![f64::NAN, 3.0]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.names(), vec!["sma_2", "ema_2"]);
        assert_eq!(set.get("sma_2").unwrap().latest(), Some(3.0));
    }

    #[test]
    fn set_rejects_inverted_pair() {
        let params = IndicatorParams {
            sma_short: 200,
            sma_long: 50,
            ..Default::default()
        };
        let err = IndicatorSet::new("TEST", "hash", dates(1), params).unwrap_err();
        assert!(matches!(err, ParamError::PairOrder { short: 200, long: 50, .. }));
    }

    #[test]
    fn set_missing_name() {
        let set = IndicatorSet::new("TEST", "hash", dates(1), IndicatorParams::default()).unwrap();
        assert!(set.get("nonexistent").is_none());
        assert!(set.is_empty());
        assert_eq!(set.latest_index(), Some(0));
    }
}
