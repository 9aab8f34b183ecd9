//! Component traits — indicators and signal rules.
//!
//! Indicators turn close prices into aligned series; signal rules turn the
//! series at one bar into a BUY / SELL / HOLD verdict.

pub mod indicator;
pub mod signal;

pub use indicator::{Indicator, IndicatorSeries, IndicatorSet};
pub use signal::{Signal, SignalAction, SignalRule};
