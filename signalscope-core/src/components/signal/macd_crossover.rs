//! MACD vs signal line rule.
//!
//! BUY while MACD is above its signal line, SELL otherwise (a flat MACD
//! counts as downward/flat momentum).

use super::{make_signal, Signal, SignalAction, SignalRule};
use crate::components::indicator::IndicatorSet;
use crate::engine::IndicatorParams;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct MacdCrossover {
    macd_key: String,
    signal_key: String,
    label: String,
}

impl MacdCrossover {
    pub fn from_params(params: &IndicatorParams) -> Self {
        Self {
            macd_key: params.macd_name(),
            signal_key: params.macd_signal_name(),
            label: format!(
                "MACD {}/{}/{}",
                params.macd_short, params.macd_long, params.macd_signal
            ),
        }
    }

    fn pair_at(&self, indicators: &IndicatorSet, bar_index: usize) -> Option<(f64, f64)> {
        let macd = indicators.get(&self.macd_key)?.value_at(bar_index)?;
        let signal = indicators.get(&self.signal_key)?.value_at(bar_index)?;
        Some((macd, signal))
    }
}

impl SignalRule for MacdCrossover {
    fn name(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, indicators: &IndicatorSet, bar_index: usize) -> Option<Signal> {
        let (macd, signal) = self.pair_at(indicators, bar_index)?;
        let crossed = bar_index
            .checked_sub(1)
            .and_then(|prev| self.pair_at(indicators, prev))
            .map(|(prev_macd, prev_signal)| (prev_macd > prev_signal) != (macd > signal))
            .unwrap_or(false);

        let (action, mut rationale) = if macd > signal {
            (
                SignalAction::Buy,
                format!(
                    "The MACD ({macd:.4}) is above its signal line ({signal:.4}), \
                     indicating upward momentum. This is a BUY signal."
                ),
            )
        } else {
            (
                SignalAction::Sell,
                format!(
                    "The MACD ({macd:.4}) is at or below its signal line ({signal:.4}), \
                     indicating downward or flat momentum. This is a SELL signal."
                ),
            )
        };

        if crossed {
            rationale.push_str(" The lines crossed on this bar.");
        }

        let mut values = BTreeMap::new();
        values.insert(self.macd_key.clone(), macd);
        values.insert(self.signal_key.clone(), signal);

        make_signal(self, indicators, bar_index, action, rationale, values)
    }
}
