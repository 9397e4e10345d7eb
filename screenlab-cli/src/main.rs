//! Screenlab CLI — historical data fetch and portfolio screening commands.
//!
//! Commands:
//! - `fetch` — download daily history for the ticker universe (or a
//!   hand-picked list) and write one CSV per ticker
//! - `screen` — enrich the latest portfolio snapshot with fundamentals and
//!   technical indicators, flag overvalued holdings, write the dated report
//!
//! Exit policy: fatal configuration errors (missing reference files, zero
//! valid snapshots) exit non-zero; per-ticker and per-symbol errors are
//! printed and do not affect the exit code.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use screenlab_core::data::{HistoryStore, Universe, YahooProvider};
use screenlab_pipeline::config::{
    thresholds_from_file, FetchConfig, ScreenConfig, DEFAULT_LOOKBACK_DAYS,
};
use screenlab_pipeline::fetch::{run_fetch, StdoutProgress};
use screenlab_pipeline::screen::run_screen;

#[derive(Parser)]
#[command(
    name = "screenlab",
    about = "Screenlab CLI — market history fetcher and overvaluation screen"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily OHLCV history and write one CSV per ticker.
    Fetch {
        /// Fetch the full reference universe (index constituents + ETFs).
        #[arg(long, default_value_t = false)]
        all_tickers: bool,

        /// Fetch only these tickers (e.g. INFY TCS RELIANCE).
        #[arg(long, num_args = 1.., value_name = "SYMBOL")]
        tickers: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 500 days ago.
        #[arg(long)]
        start_date: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end_date: Option<String>,

        /// Index-constituent reference list with a SYMBOL column.
        #[arg(long, default_value = "nifty/nifty500.csv")]
        index_list: PathBuf,

        /// ETF reference list with a SYMBOL column.
        #[arg(long, default_value = "etf/etf_list_nse.csv")]
        etf_list: PathBuf,

        /// Output directory for per-ticker CSVs.
        #[arg(long, default_value = "historical_data")]
        out_dir: PathBuf,

        /// Exchange suffix appended to tickers for provider queries.
        #[arg(long, default_value = ".NS")]
        suffix: String,

        /// Keep existing (ticker, range) files instead of overwriting them.
        #[arg(long, default_value_t = false)]
        skip_existing: bool,
    },
    /// Screen the latest portfolio snapshot for overvalued holdings.
    Screen {
        /// Directory holding dated equity_portfolio_*.csv snapshots.
        #[arg(long, default_value = "portfolio/equity")]
        portfolio_dir: PathBuf,

        /// Output directory for the dated report CSV.
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// Exchange suffix appended to portfolio symbols.
        #[arg(long, default_value = ".NS")]
        suffix: String,

        /// TOML file overriding the classifier thresholds.
        #[arg(long)]
        thresholds: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            all_tickers,
            tickers,
            start_date,
            end_date,
            index_list,
            etf_list,
            out_dir,
            suffix,
            skip_existing,
        } => run_fetch_cmd(
            all_tickers,
            tickers,
            start_date,
            end_date,
            index_list,
            etf_list,
            out_dir,
            suffix,
            skip_existing,
        ),
        Commands::Screen {
            portfolio_dir,
            output_dir,
            suffix,
            thresholds,
        } => run_screen_cmd(portfolio_dir, output_dir, suffix, thresholds),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_fetch_cmd(
    all_tickers: bool,
    tickers: Vec<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    index_list: PathBuf,
    etf_list: PathBuf,
    out_dir: PathBuf,
    suffix: String,
    skip_existing: bool,
) -> Result<()> {
    // Validate mutually exclusive options
    if all_tickers && !tickers.is_empty() {
        bail!("--all-tickers and --tickers are mutually exclusive");
    }
    if !all_tickers && tickers.is_empty() {
        bail!("one of --all-tickers or --tickers is required");
    }

    let start = start_date
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| {
            chrono::Local::now().date_naive() - chrono::Duration::days(DEFAULT_LOOKBACK_DAYS)
        });

    let end = end_date
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let resolved: Vec<String> = if all_tickers {
        // Missing/malformed reference files are fatal: no fallback universe
        let universe = Universe::load(&index_list, &etf_list)?;
        universe.all_tickers().to_vec()
    } else {
        tickers
    };

    let config = FetchConfig {
        index_list,
        etf_list,
        out_dir,
        exchange_suffix: suffix,
        overwrite: !skip_existing,
    };

    let provider = YahooProvider::new();
    let store = HistoryStore::new(&config.out_dir);
    let progress = StdoutProgress;

    let summary = run_fetch(&resolved, start, end, &provider, &store, &config, &progress);

    // Per-ticker failures are reported but never change the exit code
    for (ticker, err) in &summary.errors {
        eprintln!("Error fetching data for {ticker}: {err}");
    }

    Ok(())
}

fn run_screen_cmd(
    portfolio_dir: PathBuf,
    output_dir: PathBuf,
    suffix: String,
    thresholds_path: Option<PathBuf>,
) -> Result<()> {
    let thresholds = match thresholds_path {
        Some(path) => thresholds_from_file(&path)?,
        None => Default::default(),
    };

    let config = ScreenConfig {
        portfolio_dir,
        output_dir,
        exchange_suffix: suffix,
        thresholds,
        ..ScreenConfig::default()
    };

    let provider = YahooProvider::new();
    let today = chrono::Local::now().date_naive();

    let summary = run_screen(&config, &provider, &provider, today)?;

    println!(
        "Screened {} symbols: {} enriched, {} flagged, {} skipped",
        summary.symbols_total,
        summary.enriched,
        summary.flagged,
        summary.failures.len()
    );

    Ok(())
}
