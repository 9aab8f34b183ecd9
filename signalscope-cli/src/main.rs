//! SignalScope CLI — analyze, indicators, and params commands.
//!
//! Commands:
//! - `analyze` — fetch a ticker's history, compute indicators, print the recommendation report
//! - `indicators` — print the trailing rows of every computed indicator series
//! - `params` — print the effective indicator parameters as TOML
//!
//! Logs go to stderr; stdout carries only the report.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use signalscope_core::data::{CircuitBreaker, DataProvider, SyntheticProvider, YahooProvider};
use signalscope_core::{
    analyze, compute_indicators, AnalysisConfig, IndicatorSet, PriceSeries, RecommendationReport,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "signalscope",
    version,
    about = "SignalScope — technical indicator signals for a single stock"
)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG when set).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch history, compute indicators, and print BUY / SELL / HOLD per indicator.
    Analyze {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        params: ParamArgs,

        /// Print the report as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the last rows of every indicator series, aligned by date.
    Indicators {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        params: ParamArgs,

        /// Number of trailing rows to print.
        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
    /// Print the effective parameters (config file plus overrides) as TOML.
    Params {
        #[command(flatten)]
        params: ParamArgs,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Ticker symbol (e.g., AAPL).
    ticker: String,

    /// Start date (YYYY-MM-DD). Defaults to `lookback_days` before the end date.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Use a deterministic synthetic series instead of Yahoo Finance.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

#[derive(Args)]
struct ParamArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    sma_short: Option<usize>,

    #[arg(long)]
    sma_long: Option<usize>,

    #[arg(long)]
    ema_short: Option<usize>,

    #[arg(long)]
    ema_long: Option<usize>,

    #[arg(long)]
    rsi_window: Option<usize>,

    #[arg(long)]
    bb_window: Option<usize>,

    /// Bollinger band width in standard deviations.
    #[arg(long)]
    bb_k: Option<f64>,
}

impl ParamArgs {
    /// Load the config file (or defaults), apply flag overrides, validate once.
    fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };

        let p = &mut config.indicators;
        let overrides = [
            (&mut p.sma_short, self.sma_short),
            (&mut p.sma_long, self.sma_long),
            (&mut p.ema_short, self.ema_short),
            (&mut p.ema_long, self.ema_long),
            (&mut p.rsi_window, self.rsi_window),
            (&mut p.bb_window, self.bb_window),
        ];
        for (field, value) in overrides {
            if let Some(v) = value {
                *field = v;
            }
        }
        if let Some(k) = self.bb_k {
            p.bb_k = k;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze { data, params, json } => run_analyze(&data, &params, json),
        Commands::Indicators { data, params, tail } => run_indicators(&data, &params, tail),
        Commands::Params { params } => run_params(&params),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose {
        "debug,signalscope_core=debug"
    } else {
        "warn,signalscope_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(filter)
        .init();
}

/// One fetch per invocation, so providers are used directly without a cache.
fn provider_for(data: &DataArgs) -> Result<Box<dyn DataProvider>> {
    if data.synthetic {
        return Ok(Box::new(SyntheticProvider::default()));
    }
    let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
    Ok(Box::new(YahooProvider::new(circuit_breaker)?))
}

fn load_series(data: &DataArgs, config: &AnalysisConfig) -> Result<PriceSeries> {
    let end = data
        .end
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let start = data
        .start
        .unwrap_or_else(|| config.data.default_start(end));

    let provider = provider_for(data)?;

    info!(
        ticker = %data.ticker,
        %start,
        %end,
        provider = provider.name(),
        "fetching price history"
    );

    let fetched = provider
        .fetch(&data.ticker, start, end)
        .with_context(|| format!("fetching {} from {}", data.ticker, provider.name()))?;
    Ok(fetched.into_series()?)
}

fn run_analyze(data: &DataArgs, params: &ParamArgs, json: bool) -> Result<()> {
    let config = params.resolve()?;
    let series = load_series(data, &config)?;
    let report = analyze(&series, &config.indicators)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn run_indicators(data: &DataArgs, params: &ParamArgs, tail: usize) -> Result<()> {
    let config = params.resolve()?;
    let series = load_series(data, &config)?;
    let set = compute_indicators(&series, &config.indicators)?;
    print_indicator_table(&set, tail);
    Ok(())
}

fn run_params(params: &ParamArgs) -> Result<()> {
    let config = params.resolve()?;
    print!("{}", config.to_toml()?);
    Ok(())
}

fn print_report(report: &RecommendationReport) {
    println!();
    println!("=== SignalScope: {} ===", report.symbol);
    println!("As of:    {} ({} bars)", report.as_of, report.bar_count);
    println!("Dataset:  {}", &report.dataset_hash[..16.min(report.dataset_hash.len())]);
    println!();

    if report.signals.is_empty() {
        println!("No indicator has enough history for a signal.");
    } else {
        println!("{:<14} {:<6} Rationale", "Indicator", "Action");
        println!("{}", "-".repeat(78));
        for signal in &report.signals {
            println!(
                "{:<14} {:<6} {}",
                signal.indicator, signal.action, signal.rationale
            );
        }
    }

    println!();
    println!("--- Latest values ---");
    for row in &report.snapshot {
        println!("{:<24} {:>12}", row.name, format_value(row.value));
    }
    println!();
}

fn print_indicator_table(set: &IndicatorSet, tail: usize) {
    let names = set.names();
    let start = set.bar_count().saturating_sub(tail);

    print!("{:<12}", "date");
    for name in &names {
        print!(" {:>22}", name);
    }
    println!();

    for (i, date) in set.dates().iter().enumerate().skip(start) {
        print!("{:<12}", date.to_string());
        for series in set.iter() {
            print!(" {:>22}", format_value(series.value_at(i)));
        }
        println!();
    }
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "-".to_string(),
    }
}
