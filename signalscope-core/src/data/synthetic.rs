//! Deterministic synthetic price provider.
//!
//! Generates a geometric random walk over weekdays. The RNG is seeded from
//! BLAKE3(seed, symbol), so the same `(symbol, start, end)` always yields the
//! same bars. Used for offline runs (`--synthetic`) and tests.

use super::provider::{check_range, DataError, DataProvider, DataSource, FetchResult};
use crate::domain::PriceBar;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    /// Mean daily log return.
    drift: f64,
    /// Daily log-return standard deviation.
    volatility: f64,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            seed: 0,
            drift: 0.0003,
            volatility: 0.015,
        }
    }
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn with_drift(mut self, drift: f64) -> Self {
        self.drift = drift;
        self
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility.abs();
        self
    }

    fn rng_for(&self, symbol: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    /// Generate bars for every weekday in `start..=end`.
    pub fn generate(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<PriceBar> {
        let mut rng = self.rng_for(symbol);
        let mut close: f64 = rng.gen_range(20.0..250.0);
        let mut bars = Vec::new();

        for date in start.iter_days().take_while(|d| *d <= end) {
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }

            let gap: f64 = rng.sample(StandardNormal);
            let ret: f64 = rng.sample(StandardNormal);
            let open = close * (self.volatility * 0.25 * gap).exp();
            close = open * (self.drift + self.volatility * ret).exp();
            let wick_up: f64 = rng.gen_range(0.0..self.volatility.max(f64::EPSILON));
            let wick_down: f64 = rng.gen_range(0.0..self.volatility.max(f64::EPSILON));

            bars.push(PriceBar {
                date,
                open,
                high: open.max(close) * (1.0 + wick_up),
                low: open.min(close) / (1.0 + wick_down),
                close,
                volume: Some(rng.gen_range(100_000..10_000_000)),
            });
        }

        bars
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        check_range(start, end)?;
        let bars = self.generate(symbol, start, end);
        if bars.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        debug!(symbol, bars = bars.len(), seed = self.seed, "generated synthetic bars");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::Synthetic,
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}
