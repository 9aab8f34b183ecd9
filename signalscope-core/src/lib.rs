//! SignalScope Core — indicator engine, signal classifier, report assembly.
//!
//! This crate contains everything between a fetched price series and the
//! final recommendation report:
//! - Domain types (price bars, validated price series)
//! - Indicators (SMA, EMA, RSI, MACD, Bollinger Bands) as pure functions over closes
//! - Indicator precompute into one aligned, date-indexed set
//! - Signal rules reducing each indicator to BUY / SELL / HOLD
//! - Report assembly, configuration, and the data providers feeding it

pub mod components;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod report;

pub use components::{IndicatorSeries, IndicatorSet, Signal, SignalAction, SignalRule};
pub use config::{AnalysisConfig, ConfigError, DataConfig};
pub use domain::{PriceBar, PriceSeries, SeriesError};
pub use engine::{compute_indicators, IndicatorParams, ParamError};
pub use report::{analyze, classify, AnalysisError, RecommendationReport, SnapshotRow};
