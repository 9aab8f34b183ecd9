//! Report assembly — the classifier pass over a computed indicator set.
//!
//! Rules run in a fixed declared order (SMA, EMA, RSI, MACD). An indicator
//! whose latest reading is undefined is omitted, so the report can be shorter
//! than the rule list. Bollinger Bands are not reduced to a signal; their
//! latest values appear in the snapshot only.

use crate::components::indicator::IndicatorSet;
use crate::components::signal::{
    MaCrossover, MacdCrossover, RsiThreshold, Signal, SignalAction, SignalRule,
};
use crate::domain::{PriceSeries, SeriesError};
use crate::engine::{compute_indicators, IndicatorParams, ParamError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that abort an analysis run before a report exists.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid parameters: {0}")]
    Params(#[from] ParamError),

    #[error("invalid price series: {0}")]
    Series(#[from] SeriesError),
}

/// Latest value of one computed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub name: String,
    pub value: Option<f64>,
}

/// The run's output: one signal per defined indicator, in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub bar_count: usize,
    pub dataset_hash: String,
    pub params: IndicatorParams,
    pub signals: Vec<Signal>,
    pub snapshot: Vec<SnapshotRow>,
}

impl RecommendationReport {
    /// Signal for an indicator label (e.g., "RSI 14"), if it was reported.
    pub fn signal(&self, indicator: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.indicator == indicator)
    }

    pub fn actions(&self) -> Vec<SignalAction> {
        self.signals.iter().map(|s| s.action).collect()
    }
}

/// Build the rule list for a parameter set, in report order.
pub fn rules_for(params: &IndicatorParams) -> Vec<Box<dyn SignalRule>> {
    vec![
        Box::new(MaCrossover::sma(params)),
        Box::new(MaCrossover::ema(params)),
        Box::new(RsiThreshold::from_params(params)),
        Box::new(MacdCrossover::from_params(params)),
    ]
}

/// Evaluate every rule at `bar_index`, dropping indicators that are undefined there.
pub fn classify_at(indicators: &IndicatorSet, bar_index: usize) -> Vec<Signal> {
    rules_for(indicators.params())
        .iter()
        .filter_map(|rule| {
            let signal = rule.evaluate(indicators, bar_index);
            if signal.is_none() {
                debug!(
                    indicator = rule.name(),
                    bar_index, "indicator undefined at bar, omitted"
                );
            }
            signal
        })
        .collect()
}

/// Classify the latest bar and assemble the report.
pub fn classify(indicators: &IndicatorSet) -> RecommendationReport {
    let (signals, as_of) = match indicators.latest_index() {
        Some(last) => (classify_at(indicators, last), indicators.dates()[last]),
        None => (Vec::new(), NaiveDate::default()),
    };

    let snapshot = indicators
        .iter()
        .map(|series| SnapshotRow {
            name: series.name().to_string(),
            value: series.latest(),
        })
        .collect();

    RecommendationReport {
        symbol: indicators.symbol().to_string(),
        as_of,
        bar_count: indicators.bar_count(),
        dataset_hash: indicators.dataset_hash().to_string(),
        params: indicators.params().clone(),
        signals,
        snapshot,
    }
}

/// One full run: compute every indicator, then classify the latest bar.
pub fn analyze(
    prices: &PriceSeries,
    params: &IndicatorParams,
) -> Result<RecommendationReport, AnalysisError> {
    let indicators = compute_indicators(prices, params)?;
    Ok(classify(&indicators))
}
