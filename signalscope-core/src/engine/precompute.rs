//! Indicator computation over one price series.
//!
//! Every indicator is a pure function of the close prices; nothing here
//! depends on the order in which series are computed. The output order of the
//! set is fixed: SMA pair, EMA pair, RSI, MACD lines, Bollinger bands.

use super::params::{IndicatorParams, ParamError};
use crate::components::indicator::{Indicator, IndicatorSet};
use crate::domain::PriceSeries;
use crate::indicators::{Bollinger, Ema, Macd, Rsi, Sma};
use std::sync::Arc;
use tracing::debug;

/// Compute every configured indicator series for `prices`.
///
/// Parameters are validated first; an invalid set computes nothing. A window
/// longer than the series is not an error: that series is simply undefined
/// everywhere and the other indicators are unaffected.
pub fn compute_indicators(
    prices: &PriceSeries,
    params: &IndicatorParams,
) -> Result<IndicatorSet, ParamError> {
    let dates: Arc<[chrono::NaiveDate]> = prices.dates().into();
    let mut set = IndicatorSet::new(
        prices.symbol(),
        prices.dataset_hash(),
        dates,
        params.clone(),
    )?;
    let closes = prices.closes();

    let single: Vec<Box<dyn Indicator>> = vec![
        Box::new(Sma::new(params.sma_short)),
        Box::new(Sma::new(params.sma_long)),
        Box::new(Ema::new(params.ema_short)),
        Box::new(Ema::new(params.ema_long)),
        Box::new(Rsi::new(params.rsi_window)),
    ];
    for indicator in &single {
        insert_computed(&mut set, indicator.as_ref(), &closes);
    }

    let macd = Macd::macd(params.macd_short, params.macd_long, params.macd_signal);
    let lines = macd.compute_all(&closes);
    set.insert(params.macd_name(), lines.macd);
    set.insert(params.macd_signal_name(), lines.signal);
    set.insert(params.macd_histogram_name(), lines.histogram);

    let bands: [Box<dyn Indicator>; 3] = [
        Box::new(Bollinger::upper(params.bb_window, params.bb_k)),
        Box::new(Bollinger::middle(params.bb_window, params.bb_k)),
        Box::new(Bollinger::lower(params.bb_window, params.bb_k)),
    ];
    for band in &bands {
        insert_computed(&mut set, band.as_ref(), &closes);
    }

    debug!(
        symbol = prices.symbol(),
        bars = prices.len(),
        series = set.len(),
        "computed indicators"
    );

    Ok(set)
}

fn insert_computed(set: &mut IndicatorSet, indicator: &dyn Indicator, closes: &[f64]) {
    if indicator.lookback() >= closes.len() {
        debug!(
            indicator = indicator.name(),
            lookback = indicator.lookback(),
            bars = closes.len(),
            "insufficient history, series undefined"
        );
    }
    let series = indicator.compute(closes);
    set.insert(indicator.name(), series);
}
