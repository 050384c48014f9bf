//! CLI argument definitions.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `history` | Daily prices for stocks, indices and industry indices |
//! | `client-type` | Retail/institutional daily totals |
//! | `intraday` | Live or historical intraday ticks and candles |
//! | `currency` | Currency and coin quotes |
//! | `capital-increase` | Share-count changes |
//! | `convert-date` | Jalali/Gregorian conversion |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table, csv) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `20000` | Per-request timeout |
//! | `--retries` | `3` | Retries for throttled or failed requests |
//! | `--rate-limit-ms` | `300` | Minimum gap between requests |
//! | `--insecure` | `false` | Skip TLS certificate verification |
//! | `--output` | | Also write the table to a CSV file |
//!
//! # Examples
//!
//! ```bash
//! tsefeed history فولاد --limit 30 --pretty
//! tsefeed history فولاد شپنا --start 1402-01-01 --date-format both --output-type full
//! tsefeed intraday فولاد --interval 5min --start 1402-10-16
//! tsefeed currency dollar euro --format table
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tsefeed_core::{DateFormat, IntradayInterval, OutputType, ReturnSpec};

/// Tehran Stock Exchange and currency market data
#[derive(Debug, Parser)]
#[command(name = "tsefeed", author, version, about)]
pub struct Cli {
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-request timeout in milliseconds. Overrides TSEFEED_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Retry bound for throttled or failed requests. Overrides TSEFEED_MAX_RETRIES.
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Minimum delay between requests in milliseconds; 0 disables pacing.
    #[arg(long, global = true)]
    pub rate_limit_ms: Option<u64>,

    /// Skip TLS certificate verification.
    #[arg(long, global = true, default_value_t = false)]
    pub insecure: bool,

    /// Also write the result table to this CSV file.
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Envelope with metadata and the table as JSON.
    Json,
    /// Aligned text columns.
    Table,
    /// CSV on stdout.
    Csv,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Daily price history of one or more stocks, indices or industry indices.
    History(HistoryArgs),
    /// Retail and institutional trading totals.
    ClientType(ClientTypeArgs),
    /// Intraday ticks or candles for one stock.
    Intraday(IntradayArgs),
    /// Currency and coin quotes.
    Currency(CurrencyArgs),
    /// Capital increase (share count change) history.
    CapitalIncrease(CapitalIncreaseArgs),
    /// Convert a date between the Jalali and Gregorian calendars.
    ConvertDate(ConvertDateArgs),
}

/// Window and layout options shared by the daily series commands.
#[derive(Debug, Clone, Args)]
pub struct SeriesArgs {
    /// Inclusive start date, Jalali (1402-10-16) or Gregorian (2024-01-06).
    #[arg(long)]
    pub start: Option<String>,

    /// Inclusive end date.
    #[arg(long)]
    pub end: Option<String>,

    /// Keep only the last N rows; ignored when a date is given. 0 keeps all.
    #[arg(long, default_value_t = 0)]
    pub limit: usize,

    /// jalali, gregorian or both.
    #[arg(long, default_value = "jalali")]
    pub date_format: DateFormat,

    /// standard or full.
    #[arg(long, default_value = "standard")]
    pub output_type: OutputType,

    /// Keep rows where some symbols have no data.
    #[arg(long, default_value_t = false)]
    pub keep_incomplete: bool,

    /// Newest rows first.
    #[arg(long, default_value_t = false)]
    pub descending: bool,
}

#[derive(Debug, Clone, Args)]
pub struct HistoryArgs {
    #[arg(required = true)]
    pub symbols: Vec<String>,

    #[command(flatten)]
    pub series: SeriesArgs,

    /// Return the provider's raw columns without adjustment or formatting.
    #[arg(long, default_value_t = false)]
    pub raw: bool,

    /// Keep raw prices and add `Adj Close` instead of replacing them.
    #[arg(long, default_value_t = false)]
    pub no_adjust: bool,

    /// Add an `Adj Volume` column.
    #[arg(long, default_value_t = false)]
    pub adjust_volume: bool,

    /// simple, log, both, or mode:Column:period.
    #[arg(long)]
    pub returns: Option<ReturnSpec>,
}

#[derive(Debug, Clone, Args)]
pub struct ClientTypeArgs {
    #[arg(required = true)]
    pub symbols: Vec<String>,

    #[command(flatten)]
    pub series: SeriesArgs,
}

#[derive(Debug, Clone, Args)]
pub struct IntradayArgs {
    pub symbol: String,

    /// tick, 1min, 5min, 15min, 30min, 1h, 4h or 12h.
    #[arg(long, default_value = "1min")]
    pub interval: IntradayInterval,

    /// First day of historical data; today's live trades when omitted.
    #[arg(long)]
    pub start: Option<String>,

    /// Last day of historical data; defaults to the start day.
    #[arg(long, requires = "start")]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CurrencyArgs {
    /// English keys or Persian names; the dollar when omitted.
    pub names: Vec<String>,

    #[command(flatten)]
    pub series: SeriesArgs,

    /// simple, log, both, or mode:Column:period.
    #[arg(long)]
    pub returns: Option<ReturnSpec>,
}

#[derive(Debug, Clone, Args)]
pub struct CapitalIncreaseArgs {
    pub symbol: String,

    /// Newest rows first.
    #[arg(long, default_value_t = false)]
    pub descending: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ConvertDateArgs {
    /// A Jalali or Gregorian date in any supported layout.
    pub date: String,
}
