//! RSI threshold rule — oversold / overbought classification.

use super::{make_signal, Signal, SignalAction, SignalRule};
use crate::components::indicator::IndicatorSet;
use crate::engine::IndicatorParams;
use crate::indicators::RSI_SATURATED;
use std::collections::BTreeMap;

/// Classifies the RSI reading against fixed thresholds.
///
/// - RSI saturated at 100 (no losses in the window) → BUY
/// - RSI < oversold → BUY
/// - RSI > overbought → SELL
/// - otherwise → HOLD
///
/// The saturated case is checked first: a window with gains and zero losses
/// is read as maximal upward momentum rather than as overbought.
#[derive(Debug, Clone)]
pub struct RsiThreshold {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
    key: String,
    label: String,
}

impl RsiThreshold {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        assert!(oversold < overbought, "oversold must be < overbought");
        Self {
            period,
            oversold,
            overbought,
            key: format!("rsi_{period}"),
            label: format!("RSI {period}"),
        }
    }

    pub fn from_params(params: &IndicatorParams) -> Self {
        Self::new(params.rsi_window, params.rsi_oversold, params.rsi_overbought)
    }
}

impl SignalRule for RsiThreshold {
    fn name(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, indicators: &IndicatorSet, bar_index: usize) -> Option<Signal> {
        let rsi = indicators.get(&self.key)?.value_at(bar_index)?;
        let (lo, hi) = (self.oversold, self.overbought);

        let (action, rationale) = if rsi >= RSI_SATURATED {
            (
                SignalAction::Buy,
                format!(
                    "The RSI is 100: the last {} bars had gains and no losses, \
                     indicating maximal upward momentum. This is a BUY signal.",
                    self.period
                ),
            )
        } else if rsi < lo {
            (
                SignalAction::Buy,
                format!(
                    "The RSI ({rsi:.2}) is below {lo}, indicating the stock is OVERSOLD. \
                     This is a BUY signal."
                ),
            )
        } else if rsi > hi {
            (
                SignalAction::Sell,
                format!(
                    "The RSI ({rsi:.2}) is above {hi}, indicating the stock is OVERBOUGHT. \
                     This is a SELL signal."
                ),
            )
        } else {
            (
                SignalAction::Hold,
                format!(
                    "The RSI ({rsi:.2}) is between {lo} and {hi}, indicating neutral momentum. \
                     No strong buy or sell signal."
                ),
            )
        };

        let mut values = BTreeMap::new();
        values.insert(self.key.clone(), rsi);

        make_signal(self, indicators, bar_index, action, rationale, values)
    }
}
