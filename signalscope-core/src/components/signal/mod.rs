//! Signal classification — reduces indicator readings to BUY / SELL / HOLD.
//!
//! Each rule looks at one indicator (or one pair of lines) at one bar and
//! nothing else. Rules never combine into a composite score: every verdict
//! stands alone. A rule whose inputs are undefined at the bar returns `None`
//! and the indicator is left out of the report rather than reported as HOLD.

pub mod ma_crossover;
pub mod macd_crossover;
pub mod rsi_threshold;

pub use ma_crossover::{MaCrossover, MaType};
pub use macd_crossover::MacdCrossover;
pub use rsi_threshold::RsiThreshold;

use crate::components::indicator::IndicatorSet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Discrete action derived from one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalAction::Buy => "BUY",
            SignalAction::Sell => "SELL",
            SignalAction::Hold => "HOLD",
        };
        f.write_str(s)
    }
}

/// One indicator's verdict at one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Display label of the indicator (e.g., "SMA 50/200").
    pub indicator: String,
    pub action: SignalAction,
    pub rationale: String,
    pub bar_index: usize,
    pub date: NaiveDate,
    /// The readings the rule compared, keyed by series name.
    pub values: BTreeMap<String, f64>,
}

/// A classification rule over precomputed indicator series.
///
/// # Architecture invariant
/// Rules read only the indicator set and the bar index. They must only use
/// values at `bar_index` or earlier.
pub trait SignalRule: Send + Sync {
    /// Display label, used as `Signal::indicator`.
    fn name(&self) -> &str;

    /// Classify the indicator at `bar_index`.
    ///
    /// Returns `None` when any compared value is undefined at that bar.
    fn evaluate(&self, indicators: &IndicatorSet, bar_index: usize) -> Option<Signal>;
}

/// Shared constructor so every rule fills `Signal` the same way.
pub(crate) fn make_signal(
    rule: &dyn SignalRule,
    indicators: &IndicatorSet,
    bar_index: usize,
    action: SignalAction,
    rationale: String,
    values: BTreeMap<String, f64>,
) -> Option<Signal> {
    let date = *indicators.dates().get(bar_index)?;
    Some(Signal {
        indicator: rule.name().to_string(),
        action,
        rationale,
        bar_index,
        date,
        values,
    })
}

/// Test fixture: an indicator set built from hand-written raw series.
#[cfg(test)]
pub(crate) fn fixture_set(
    params: crate::engine::IndicatorParams,
    series: &[(&str, Vec<f64>)],
) -> IndicatorSet {
    let n = series.first().map(|(_, v)| v.len()).unwrap_or(0);
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let dates: std::sync::Arc<[NaiveDate]> = (0..n)
        .map(|i| base + chrono::Duration::days(i as i64))
        .collect::<Vec<_>>()
        .into();
    let mut set = IndicatorSet::new("TEST", "hash", dates, params).unwrap();
    for (name, values) in series {
        set.insert(*name, values.clone());
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&SignalAction::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&SignalAction::Hold).unwrap(), "\"HOLD\"");
        let parsed: SignalAction = serde_json::from_str("\"SELL\"").unwrap();
        assert_eq!(parsed, SignalAction::Sell);
    }

    #[test]
    fn action_display() {
        assert_eq!(SignalAction::Buy.to_string(), "BUY");
        assert_eq!(SignalAction::Sell.to_string(), "SELL");
        assert_eq!(SignalAction::Hold.to_string(), "HOLD");
    }
}
