//! Yahoo Finance data provider.
//!
//! Fetches daily bars from Yahoo's v8 chart API. Handles rate limiting,
//! retries with exponential backoff, response parsing, and the circuit breaker.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; any shape we don't recognise is reported as
//! [`DataError::ResponseFormatChanged`] rather than guessed at.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{check_range, DataError, DataProvider, DataSource, FetchResult};
use crate::domain::PriceBar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: QuoteIndicators,
}

#[derive(Debug, Deserialize)]
struct QuoteIndicators {
    quote: Vec<QuoteColumns>,
    adjclose: Option<Vec<AdjCloseColumn>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteColumns {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseColumn {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
    adjust_prices: bool,
}

impl YahooProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            adjust_prices: true,
        })
    }

    /// Use raw closes instead of split/dividend-adjusted ones.
    pub fn unadjusted(mut self) -> Self {
        self.adjust_prices = false;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Chart API URL for an inclusive date range.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        // period2 is exclusive on Yahoo's side
        let end_ts = end
            .succ_opt()
            .unwrap_or(end)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true"
        )
    }

    fn parse_response(
        symbol: &str,
        resp: ChartResponse,
        adjust_prices: bool,
    ) -> Result<Vec<PriceBar>, DataError> {
        let result = match (resp.chart.result, resp.chart.error) {
            (Some(result), _) => result,
            (None, Some(err)) if err.code == "Not Found" => {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                })
            }
            (None, Some(err)) => {
                return Err(DataError::ResponseFormatChanged(format!(
                    "{}: {}",
                    err.code, err.description
                )))
            }
            (None, None) => {
                return Err(DataError::ResponseFormatChanged(
                    "empty result with no error".into(),
                ))
            }
        };

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        // A symbol with no trading days in range comes back without timestamps.
        let timestamps = data.timestamp.unwrap_or_default();

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let Some(close) = quote.close.get(i).copied().flatten() else {
                warn!(symbol, %date, "dropping row with missing close");
                continue;
            };

            let adj_close = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());
            let factor = match adj_close {
                Some(adj) if adjust_prices && close > 0.0 => adj / close,
                _ => 1.0,
            };

            // Missing open/high/low fall back to the close.
            let field = |col: &[Option<f64>]| col.get(i).copied().flatten().unwrap_or(close) * factor;

            let bar = PriceBar {
                date,
                open: field(&quote.open),
                high: field(&quote.high),
                low: field(&quote.low),
                close: close * factor,
                volume: quote.volume.get(i).copied().flatten(),
            };

            // During market hours Yahoo appends a live bar that can share the
            // last session's date; the later row wins.
            match bars.last_mut() {
                Some(last) if last.date == date => {
                    debug!(symbol, %date, "replacing duplicate-date row");
                    *last = bar;
                }
                _ => bars.push(bar),
            }
        }

        Ok(bars)
    }

    /// Execute the request with retry and circuit breaker logic.
    fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let url = Self::chart_url(symbol, start, end);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                warn!(
                    symbol,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = ?last_error,
                    "retrying Yahoo request"
                );
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            let resp = match self.client.get(&url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            if !status.is_success() {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Http {
                    status: status.as_u16(),
                    symbol: symbol.to_string(),
                });
                continue;
            }

            let chart: ChartResponse = resp.json().map_err(|e| {
                DataError::ResponseFormatChanged(format!(
                    "failed to parse response for {symbol}: {e}"
                ))
            })?;

            let bars = Self::parse_response(symbol, chart, self.adjust_prices)?;
            self.circuit_breaker.record_success();
            return Ok(bars);
        }

        Err(last_error
            .unwrap_or_else(|| DataError::NetworkUnreachable("max retries exceeded".into())))
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        check_range(start, end)?;
        let bars = self.fetch_with_retry(symbol, start, end)?;
        if bars.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        info!(symbol, bars = bars.len(), %start, %end, "fetched from Yahoo Finance");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::YahooFinance,
        })
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-02, 2024-01-03, 2024-01-04 at 14:30 UTC
    const TS: [i64; 3] = [1_704_205_800, 1_704_292_200, 1_704_378_600];

    fn parse(json: serde_json::Value, adjust: bool) -> Result<Vec<PriceBar>, DataError> {
        let resp: ChartResponse = serde_json::from_value(json).unwrap();
        YahooProvider::parse_response("AAPL", resp, adjust)
    }

    fn chart(close: serde_json::Value, adjclose: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "chart": {
                "result": [{
                    "timestamp": TS,
                    "indicators": {
                        "quote": [{
                            "open": [10.0, 11.0, 12.0],
                            "high": [10.5, 11.5, null],
                            "low": [9.5, 10.5, 11.5],
                            "close": close,
                            "volume": [100, null, 300]
                        }],
                        "adjclose": [{ "adjclose": adjclose }]
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn parses_rows_into_bars() {
        let bars = parse(
            chart(serde_json::json!([10.2, 11.2, 12.2]), serde_json::json!([10.2, 11.2, 12.2])),
            true,
        )
        .unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].volume, Some(100));
        assert_eq!(bars[1].volume, None);
        // Missing high falls back to close.
        assert_eq!(bars[2].high, 12.2);
    }

    #[test]
    fn missing_close_rows_are_dropped() {
        let bars = parse(
            chart(serde_json::json!([10.2, null, 12.2]), serde_json::json!([10.2, null, 12.2])),
            true,
        )
        .unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn adjusted_close_scales_the_bar() {
        let json = chart(serde_json::json!([10.0, 11.0, 12.0]), serde_json::json!([5.0, 5.5, 6.0]));
        let adjusted = parse(json, true).unwrap();
        assert_eq!(adjusted[0].close, 5.0);
        assert_eq!(adjusted[0].open, 5.0);
        assert_eq!(adjusted[0].high, 5.25);

        let json = chart(serde_json::json!([10.0, 11.0, 12.0]), serde_json::json!([5.0, 5.5, 6.0]));
        let raw = parse(json, false).unwrap();
        assert_eq!(raw[0].close, 10.0);
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let json = serde_json::json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        });
        assert!(matches!(
            parse(json, true),
            Err(DataError::SymbolNotFound { symbol }) if symbol == "AAPL"
        ));
    }

    #[test]
    fn unknown_error_is_format_change() {
        let json = serde_json::json!({
            "chart": { "result": null, "error": { "code": "Bad Request", "description": "x" } }
        });
        assert!(matches!(
            parse(json, true),
            Err(DataError::ResponseFormatChanged(_))
        ));
    }

    #[test]
    fn duplicate_trailing_date_keeps_latest_row() {
        let json = serde_json::json!({
            "chart": {
                "result": [{
                    "timestamp": [TS[0], TS[0] + 3600],
                    "indicators": {
                        "quote": [{
                            "open": [10.0, 10.0],
                            "high": [11.0, 12.0],
                            "low": [9.0, 9.0],
                            "close": [10.5, 11.5],
                            "volume": [1, 2]
                        }]
                    }
                }],
                "error": null
            }
        });
        let bars = parse(json, true).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 11.5);
    }

    #[test]
    fn no_timestamps_is_empty() {
        let json = serde_json::json!({
            "chart": {
                "result": [{ "indicators": { "quote": [{}] } }],
                "error": null
            }
        });
        assert!(parse(json, true).unwrap().is_empty());
    }

    #[test]
    fn url_covers_inclusive_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let url = YahooProvider::chart_url("MSFT", start, end);
        assert!(url.contains("/chart/MSFT?"));
        assert!(url.contains("period1=1704067200"));
        // 2024-02-01 00:00 UTC
        assert!(url.contains("period2=1706745600"));
    }
}
