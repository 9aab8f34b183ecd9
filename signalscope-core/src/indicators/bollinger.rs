//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances):
//! - Middle: SMA(close, period)
//! - Upper: middle + k * stddev(close, period)
//! - Lower: middle - k * stddev(close, period)
//!
//! Uses sample stddev (divide by N - 1), so a one-bar window has a defined
//! middle band but undefined upper and lower bands.
//! Lookback: period - 1.

use crate::components::indicator::Indicator;
use crate::indicators::sma::window_mean;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

impl BollingerBand {
    fn label(&self) -> &'static str {
        match self {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    k: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    fn with_band(period: usize, k: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self {
            period,
            k,
            band,
            name: bollinger_name(band, period, k),
        }
    }

    pub fn upper(period: usize, k: f64) -> Self {
        Self::with_band(period, k, BollingerBand::Upper)
    }

    pub fn middle(period: usize, k: f64) -> Self {
        Self::with_band(period, k, BollingerBand::Middle)
    }

    pub fn lower(period: usize, k: f64) -> Self {
        Self::with_band(period, k, BollingerBand::Lower)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        for i in (self.period - 1)..n {
            let window = &values[(i + 1 - self.period)..=i];
            if window.iter().any(|v| v.is_nan()) {
                continue;
            }

            let mean = window_mean(window);

            result[i] = match self.band {
                BollingerBand::Middle => mean,
                BollingerBand::Upper | BollingerBand::Lower => {
                    let stddev = sample_stddev(window, mean);
                    if self.band == BollingerBand::Upper {
                        mean + self.k * stddev
                    } else {
                        mean - self.k * stddev
                    }
                }
            };
        }

        result
    }
}

/// Sample standard deviation (ddof = 1). NaN for fewer than two values.
fn sample_stddev(window: &[f64], mean: f64) -> f64 {
    if window.len() < 2 {
        return f64::NAN;
    }
    let sum_sq: f64 = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum();
    (sum_sq / (window.len() - 1) as f64).sqrt()
}

pub fn bollinger_name(band: BollingerBand, period: usize, k: f64) -> String {
    format!("bollinger_{}_{period}_{k}", band.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn bollinger_middle_is_sma() {
        let result = Bollinger::middle(3, 2.0).compute(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_uses_sample_stddev() {
        // Window [10, 11, 12]: mean 11, squared deviations sum 2, sample var = 2/2 = 1
        let closes = [10.0, 11.0, 12.0];
        let upper = Bollinger::upper(3, 2.0).compute(&closes);
        let lower = Bollinger::lower(3, 2.0).compute(&closes);
        assert_approx(upper[2], 13.0, DEFAULT_EPSILON);
        assert_approx(lower[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_bands_symmetric() {
        let closes = [10.0, 11.5, 12.0, 13.7, 14.0];
        let upper = Bollinger::upper(3, 2.0).compute(&closes);
        let middle = Bollinger::middle(3, 2.0).compute(&closes);
        let lower = Bollinger::lower(3, 2.0).compute(&closes);

        for i in 2..5 {
            let half_width = upper[i] - middle[i];
            assert!(half_width >= 0.0);
            assert_approx(middle[i] - lower[i], half_width, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn bollinger_constant_price_zero_width() {
        let closes = [100.0, 100.0, 100.0, 100.0];
        let upper = Bollinger::upper(3, 2.0).compute(&closes);
        let lower = Bollinger::lower(3, 2.0).compute(&closes);
        assert_approx(upper[2], 100.0, DEFAULT_EPSILON);
        assert_approx(lower[3], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_constant_non_dyadic_price_is_exact() {
        let closes = vec![101.37; 25];
        let upper = Bollinger::upper(20, 2.0).compute(&closes);
        let middle = Bollinger::middle(20, 2.0).compute(&closes);
        let lower = Bollinger::lower(20, 2.0).compute(&closes);
        for i in 19..25 {
            assert_eq!(middle[i], 101.37);
            assert_eq!(upper[i], 101.37);
            assert_eq!(lower[i], 101.37);
        }
    }

    #[test]
    fn bollinger_single_bar_window() {
        let closes = [10.0, 11.0];
        let middle = Bollinger::middle(1, 2.0).compute(&closes);
        let upper = Bollinger::upper(1, 2.0).compute(&closes);
        assert_approx(middle[1], 11.0, DEFAULT_EPSILON);
        assert!(upper.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn bollinger_window_longer_than_series() {
        let result = Bollinger::upper(20, 2.0).compute(&[1.0, 2.0, 3.0]);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn bollinger_names_and_lookback() {
        assert_eq!(Bollinger::upper(20, 2.0).name(), "bollinger_upper_20_2");
        assert_eq!(Bollinger::lower(20, 2.5).name(), "bollinger_lower_20_2.5");
        assert_eq!(Bollinger::upper(20, 2.0).lookback(), 19);
    }
}
