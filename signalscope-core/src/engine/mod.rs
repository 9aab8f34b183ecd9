//! Indicator engine: parameter validation and per-series computation.

pub mod params;
pub mod precompute;

pub use params::{IndicatorParams, ParamError};
pub use precompute::compute_indicators;
