//! Moving Average Convergence Divergence (MACD).
//!
//! Three lines (separate Indicator instances):
//! - MACD: EMA(close, short) - EMA(close, long)
//! - Signal: EMA(MACD, signal)
//! - Histogram: MACD - Signal
//!
//! Every EMA uses the seed-then-recur convention, so all three lines are
//! defined from index 0.
//! Lookback: 0.

use super::ema::ema_of_series;
use crate::components::indicator::Indicator;

/// Which MACD line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
    Histogram,
}

/// All three MACD lines from one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Macd {
    short_span: usize,
    long_span: usize,
    signal_span: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    fn with_line(short_span: usize, long_span: usize, signal_span: usize, line: MacdLine) -> Self {
        assert!(short_span >= 1, "MACD short span must be >= 1");
        assert!(long_span >= 1, "MACD long span must be >= 1");
        assert!(signal_span >= 1, "MACD signal span must be >= 1");
        let name = match line {
            MacdLine::Macd => macd_name(short_span, long_span),
            MacdLine::Signal => macd_signal_name(short_span, long_span, signal_span),
            MacdLine::Histogram => macd_histogram_name(short_span, long_span, signal_span),
        };
        Self {
            short_span,
            long_span,
            signal_span,
            line,
            name,
        }
    }

    pub fn macd(short_span: usize, long_span: usize, signal_span: usize) -> Self {
        Self::with_line(short_span, long_span, signal_span, MacdLine::Macd)
    }

    pub fn signal(short_span: usize, long_span: usize, signal_span: usize) -> Self {
        Self::with_line(short_span, long_span, signal_span, MacdLine::Signal)
    }

    pub fn histogram(short_span: usize, long_span: usize, signal_span: usize) -> Self {
        Self::with_line(short_span, long_span, signal_span, MacdLine::Histogram)
    }

    /// Standard 12/26/9 parameterization.
    pub fn default_params() -> Self {
        Self::macd(12, 26, 9)
    }

    pub fn line(&self) -> MacdLine {
        self.line
    }

    /// Compute all three lines at once.
    pub fn compute_all(&self, values: &[f64]) -> MacdOutput {
        let short = ema_of_series(values, self.short_span);
        let long = ema_of_series(values, self.long_span);
        let macd: Vec<f64> = short.iter().zip(&long).map(|(s, l)| s - l).collect();
        let signal = ema_of_series(&macd, self.signal_span);
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();
        MacdOutput {
            macd,
            signal,
            histogram,
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        let out = self.compute_all(values);
        match self.line {
            MacdLine::Macd => out.macd,
            MacdLine::Signal => out.signal,
            MacdLine::Histogram => out.histogram,
        }
    }
}

pub fn macd_name(short_span: usize, long_span: usize) -> String {
    format!("macd_{short_span}_{long_span}")
}

pub fn macd_signal_name(short_span: usize, long_span: usize, signal_span: usize) -> String {
    format!("macd_signal_{short_span}_{long_span}_{signal_span}")
}

pub fn macd_histogram_name(short_span: usize, long_span: usize, signal_span: usize) -> String {
    format!("macd_hist_{short_span}_{long_span}_{signal_span}")
}
