//! Indicator parameters and their validation.

use crate::indicators::bollinger::{bollinger_name, BollingerBand};
use crate::indicators::macd::{macd_histogram_name, macd_name, macd_signal_name};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameter validation failures. Returned before any series is computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("{param} must be >= 1")]
    ZeroWindow { param: &'static str },

    #[error("{short_param} ({short}) must be smaller than {long_param} ({long})")]
    PairOrder {
        short_param: &'static str,
        long_param: &'static str,
        short: usize,
        long: usize,
    },

    #[error("bb_k must be finite and non-negative, got {0}")]
    InvalidMultiplier(f64),

    #[error(
        "RSI thresholds must satisfy 0 <= oversold < overbought <= 100, got {oversold}/{overbought}"
    )]
    InvalidThresholds { oversold: f64, overbought: f64 },
}

/// Every tunable of the indicator engine and classifier.
///
/// Any subset may be overridden; missing fields take the defaults below when
/// deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorParams {
    pub sma_short: usize,
    pub sma_long: usize,
    pub ema_short: usize,
    pub ema_long: usize,
    pub rsi_window: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub macd_short: usize,
    pub macd_long: usize,
    pub macd_signal: usize,
    pub bb_window: usize,
    pub bb_k: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_short: 50,
            sma_long: 200,
            ema_short: 20,
            ema_long: 50,
            rsi_window: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            macd_short: 12,
            macd_long: 26,
            macd_signal: 9,
            bb_window: 20,
            bb_k: 2.0,
        }
    }
}

impl IndicatorParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        let windows = [
            ("sma_short", self.sma_short),
            ("sma_long", self.sma_long),
            ("ema_short", self.ema_short),
            ("ema_long", self.ema_long),
            ("rsi_window", self.rsi_window),
            ("macd_short", self.macd_short),
            ("macd_long", self.macd_long),
            ("macd_signal", self.macd_signal),
            ("bb_window", self.bb_window),
        ];
        if let Some(&(param, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(ParamError::ZeroWindow { param });
        }

        let pairs = [
            ("sma_short", self.sma_short, "sma_long", self.sma_long),
            ("ema_short", self.ema_short, "ema_long", self.ema_long),
            ("macd_short", self.macd_short, "macd_long", self.macd_long),
        ];
        for (short_param, short, long_param, long) in pairs {
            if short >= long {
                return Err(ParamError::PairOrder {
                    short_param,
                    long_param,
                    short,
                    long,
                });
            }
        }

        if !self.bb_k.is_finite() || self.bb_k < 0.0 {
            return Err(ParamError::InvalidMultiplier(self.bb_k));
        }

        let (oversold, overbought) = (self.rsi_oversold, self.rsi_overbought);
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(oversold) || !in_range(overbought) || oversold >= overbought {
            return Err(ParamError::InvalidThresholds {
                oversold,
                overbought,
            });
        }

        Ok(())
    }

    pub fn sma_short_name(&self) -> String {
        format!("sma_{}", self.sma_short)
    }

    pub fn sma_long_name(&self) -> String {
        format!("sma_{}", self.sma_long)
    }

    pub fn ema_short_name(&self) -> String {
        format!("ema_{}", self.ema_short)
    }

    pub fn ema_long_name(&self) -> String {
        format!("ema_{}", self.ema_long)
    }

    pub fn rsi_name(&self) -> String {
        format!("rsi_{}", self.rsi_window)
    }

    pub fn macd_name(&self) -> String {
        macd_name(self.macd_short, self.macd_long)
    }

    pub fn macd_signal_name(&self) -> String {
        macd_signal_name(self.macd_short, self.macd_long, self.macd_signal)
    }

    pub fn macd_histogram_name(&self) -> String {
        macd_histogram_name(self.macd_short, self.macd_long, self.macd_signal)
    }

    pub fn bollinger_upper_name(&self) -> String {
        bollinger_name(BollingerBand::Upper, self.bb_window, self.bb_k)
    }

    pub fn bollinger_middle_name(&self) -> String {
        bollinger_name(BollingerBand::Middle, self.bb_window, self.bb_k)
    }

    pub fn bollinger_lower_name(&self) -> String {
        bollinger_name(BollingerBand::Lower, self.bb_window, self.bb_k)
    }

    /// Longest lookback across all indicators: bars needed before every
    /// series is defined.
    pub fn max_lookback(&self) -> usize {
        [
            self.sma_long.saturating_sub(1),
            self.rsi_window,
            self.bb_window.saturating_sub(1),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(IndicatorParams::default().validate().is_ok());
    }

    #[test]
    fn zero_window_rejected() {
        let params = IndicatorParams {
            rsi_window: 0,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParamError::ZeroWindow {
                param: "rsi_window"
            })
        );
    }

    #[test]
    fn short_not_below_long_rejected() {
        let params = IndicatorParams {
            ema_short: 50,
            ema_long: 50,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamError::PairOrder {
                short_param: "ema_short",
                ..
            })
        ));
    }

    #[test]
    fn negative_multiplier_rejected() {
        let params = IndicatorParams {
            bb_k: -1.0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ParamError::InvalidMultiplier(-1.0)));

        let params = IndicatorParams {
            bb_k: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let params = IndicatorParams {
            rsi_oversold: 70.0,
            rsi_overbought: 30.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn partial_toml_overrides_keep_defaults() {
        let params: IndicatorParams = toml::from_str("sma_short = 20\nsma_long = 50").unwrap();
        assert_eq!(params.sma_short, 20);
        assert_eq!(params.sma_long, 50);
        assert_eq!(params.rsi_window, 14);
        assert_eq!(params.macd_signal, 9);
    }

    #[test]
    fn unknown_field_rejected() {
        let result: Result<IndicatorParams, _> = toml::from_str("sma_shrt = 20");
        assert!(result.is_err());
    }

    #[test]
    fn names_follow_parameters() {
        let params = IndicatorParams::default();
        assert_eq!(params.sma_short_name(), "sma_50");
        assert_eq!(params.sma_long_name(), "sma_200");
        assert_eq!(params.ema_short_name(), "ema_20");
        assert_eq!(params.rsi_name(), "rsi_14");
        assert_eq!(params.macd_name(), "macd_12_26");
        assert_eq!(params.macd_signal_name(), "macd_signal_12_26_9");
        assert_eq!(params.bollinger_middle_name(), "bollinger_middle_20_2");
        assert_eq!(params.max_lookback(), 199);
    }
}
