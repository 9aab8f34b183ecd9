//! Look-ahead contamination tests for every indicator series and signal rule.
//!
//! Invariant: no value at bar t may depend on price data from bar t+1 or later.
//!
//! Method: compute on a truncated series (bars 0..100) and the full series
//! (bars 0..200). Bars 0..100 must be bit-identical between both runs. Any
//! difference means future data is leaking into past values.

use chrono::NaiveDate;
use signalscope_core::components::indicator::Indicator;
use signalscope_core::data::SyntheticProvider;
use signalscope_core::indicators::{Bollinger, Ema, Macd, Rsi, Sma};
use signalscope_core::report::classify_at;
use signalscope_core::{compute_indicators, IndicatorParams, PriceSeries};

const TRUNCATED: usize = 100;

fn full_series() -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let bars = SyntheticProvider::new(11).generate("LOOK", start, end);
    PriceSeries::new("LOOK", bars[..200].to_vec()).unwrap()
}

fn truncate(series: &PriceSeries, len: usize) -> PriceSeries {
    PriceSeries::new(series.symbol(), series.bars()[..len].to_vec()).unwrap()
}

fn params() -> IndicatorParams {
    IndicatorParams {
        sma_short: 10,
        sma_long: 30,
        ema_short: 8,
        ema_long: 21,
        ..Default::default()
    }
}

fn assert_no_lookahead(indicator: &dyn Indicator, closes: &[f64]) {
    let full = indicator.compute(closes);
    let truncated = indicator.compute(&closes[..TRUNCATED]);

    assert_eq!(full.len(), closes.len(), "{}: full length", indicator.name());
    assert_eq!(truncated.len(), TRUNCATED, "{}: truncated length", indicator.name());

    for i in 0..TRUNCATED {
        let (t, f) = (truncated[i], full[i]);
        if t.is_nan() && f.is_nan() {
            continue;
        }
        assert_eq!(
            t.to_bits(),
            f.to_bits(),
            "{}: look-ahead at bar {i} (truncated={t}, full={f})",
            indicator.name()
        );
    }
}

#[test]
fn no_lookahead_sma() {
    let closes = full_series().closes();
    assert_no_lookahead(&Sma::new(20), &closes);
    assert_no_lookahead(&Sma::new(50), &closes);
}

#[test]
fn no_lookahead_ema() {
    let closes = full_series().closes();
    assert_no_lookahead(&Ema::new(12), &closes);
    assert_no_lookahead(&Ema::new(50), &closes);
}

#[test]
fn no_lookahead_rsi() {
    assert_no_lookahead(&Rsi::new(14), &full_series().closes());
}

#[test]
fn no_lookahead_macd_lines() {
    let closes = full_series().closes();
    assert_no_lookahead(&Macd::macd(12, 26, 9), &closes);
    assert_no_lookahead(&Macd::signal(12, 26, 9), &closes);
    assert_no_lookahead(&Macd::histogram(12, 26, 9), &closes);
}

#[test]
fn no_lookahead_bollinger() {
    let closes = full_series().closes();
    assert_no_lookahead(&Bollinger::upper(20, 2.0), &closes);
    assert_no_lookahead(&Bollinger::middle(20, 2.0), &closes);
    assert_no_lookahead(&Bollinger::lower(20, 2.0), &closes);
}

#[test]
fn no_lookahead_indicator_set() {
    let full = full_series();
    let full_set = compute_indicators(&full, &params()).unwrap();
    let truncated_set = compute_indicators(&truncate(&full, TRUNCATED), &params()).unwrap();

    for series in truncated_set.iter() {
        let other = full_set.get(series.name()).unwrap();
        assert_eq!(
            series.values(),
            &other.values()[..TRUNCATED],
            "{}: indicator set look-ahead",
            series.name()
        );
    }
}

#[test]
fn no_lookahead_signals() {
    let full = full_series();
    let full_set = compute_indicators(&full, &params()).unwrap();

    for len in [40, 75, TRUNCATED] {
        let truncated_set = compute_indicators(&truncate(&full, len), &params()).unwrap();
        let last = len - 1;
        assert_eq!(
            classify_at(&truncated_set, last),
            classify_at(&full_set, last),
            "signals at bar {last} changed when later bars were added"
        );
    }
}
