//! Moving average regime rule — short MA vs long MA.
//!
//! BUY while the short MA is above the long MA (golden-cross regime), SELL
//! while below (death-cross regime), HOLD when equal. When the relation
//! flipped on the evaluated bar the rationale names the cross event; the
//! action is the same either way.

use super::{make_signal, Signal, SignalAction, SignalRule};
use crate::components::indicator::IndicatorSet;
use crate::engine::IndicatorParams;
use std::collections::BTreeMap;

/// Moving average type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaType {
    Sma,
    Ema,
}

impl MaType {
    fn prefix(&self) -> &'static str {
        match self {
            MaType::Sma => "sma",
            MaType::Ema => "ema",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            MaType::Sma => "SMA",
            MaType::Ema => "EMA",
        }
    }
}

/// Short-vs-long moving average classifier.
///
/// # Indicator dependencies
/// - Short: `{ma_type}_{short_period}` (e.g., `sma_50`)
/// - Long: `{ma_type}_{long_period}` (e.g., `sma_200`)
#[derive(Debug, Clone)]
pub struct MaCrossover {
    pub short_period: usize,
    pub long_period: usize,
    pub ma_type: MaType,
    short_key: String,
    long_key: String,
    label: String,
}

impl MaCrossover {
    pub fn new(short_period: usize, long_period: usize, ma_type: MaType) -> Self {
        assert!(short_period >= 1, "short_period must be >= 1");
        assert!(
            long_period > short_period,
            "long_period must be > short_period"
        );

        let prefix = ma_type.prefix();
        Self {
            short_period,
            long_period,
            ma_type,
            short_key: format!("{prefix}_{short_period}"),
            long_key: format!("{prefix}_{long_period}"),
            label: format!("{} {short_period}/{long_period}", ma_type.label()),
        }
    }

    pub fn sma(params: &IndicatorParams) -> Self {
        Self::new(params.sma_short, params.sma_long, MaType::Sma)
    }

    pub fn ema(params: &IndicatorParams) -> Self {
        Self::new(params.ema_short, params.ema_long, MaType::Ema)
    }

    fn pair_at(&self, indicators: &IndicatorSet, bar_index: usize) -> Option<(f64, f64)> {
        let short = indicators.get(&self.short_key)?.value_at(bar_index)?;
        let long = indicators.get(&self.long_key)?.value_at(bar_index)?;
        Some((short, long))
    }
}

impl SignalRule for MaCrossover {
    fn name(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, indicators: &IndicatorSet, bar_index: usize) -> Option<Signal> {
        let (short, long) = self.pair_at(indicators, bar_index)?;
        let previous = bar_index
            .checked_sub(1)
            .and_then(|prev| self.pair_at(indicators, prev));

        let ma = self.ma_type.label();
        let (s, l) = (self.short_period, self.long_period);

        let (action, mut rationale) = if short > long {
            (
                SignalAction::Buy,
                format!(
                    "The short-term {ma} ({s}) is above the long-term {ma} ({l}), \
                     indicating an uptrend. This is a BUY signal."
                ),
            )
        } else if short < long {
            (
                SignalAction::Sell,
                format!(
                    "The short-term {ma} ({s}) is below the long-term {ma} ({l}), \
                     indicating a downtrend. This is a SELL signal."
                ),
            )
        } else {
            (
                SignalAction::Hold,
                format!(
                    "The short-term {ma} ({s}) equals the long-term {ma} ({l}). \
                     This is a HOLD signal."
                ),
            )
        };

        if let Some((prev_short, prev_long)) = previous {
            if short > long && prev_short <= prev_long {
                rationale.push_str(" Golden cross on this bar.");
            } else if short < long && prev_short >= prev_long {
                rationale.push_str(" Death cross on this bar.");
            }
        }

        let mut values = BTreeMap::new();
        values.insert(self.short_key.clone(), short);
        values.insert(self.long_key.clone(), long);

        make_signal(self, indicators, bar_index, action, rationale, values)
    }
}
