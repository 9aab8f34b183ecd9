//! Simple Moving Average (SMA).
//!
//! Arithmetic mean of the trailing `period` values.
//! Lookback: period - 1 (first valid value at index period-1).

use crate::components::indicator::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        rolling_mean(values, self.period)
    }
}

/// Fixed-window mean over a raw slice.
///
/// Each window is summed from scratch rather than rolled forward. A window
/// containing NaN yields NaN without poisoning later windows.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[(i + 1 - period)..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = window_mean(window);
    }

    result
}

/// Mean of a non-empty window, taken as offsets from its first element.
///
/// A window of identical values returns that value exactly.
pub(crate) fn window_mean(window: &[f64]) -> f64 {
    let anchor = window[0];
    let offset: f64 = window.iter().map(|v| v - anchor).sum();
    anchor + offset / window.len() as f64
}
