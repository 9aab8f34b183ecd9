//! Concrete indicator implementations.
//!
//! All indicators implement the `Indicator` trait from `components::indicator`
//! and operate on close prices. They are computed once per analysis run by
//! `engine::compute_indicators`.
//!
//! Multi-series indicators (MACD, Bollinger) are exposed as separate named
//! instances per line/band, keeping the single-series `Indicator` trait
//! unchanged.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{Bollinger, BollingerBand};
pub use ema::{ema_of_series, Ema};
pub use macd::{Macd, MacdLine, MacdOutput};
pub use rsi::{Rsi, RSI_SATURATED};
pub use sma::{rolling_mean, Sma};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
