//! CryptoCompare candles - command line entry point
//!
//! This binary provides two subcommands:
//! - hour: Fetch hourly candle history
//! - minute: Fetch minute candle history

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "cryptocompare-candles")]
#[command(about = "Fetch hourly and minute OHLCV history from CryptoCompare", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a JSON client configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory for per-run log files
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch hourly candles
    Hour {
        #[command(flatten)]
        query: QueryArgs,

        /// End of the window (RFC 3339, e.g. 2021-01-01T00:00:00Z). Defaults to now
        #[arg(long)]
        to: Option<String>,
    },

    /// Fetch minute candles
    Minute {
        #[command(flatten)]
        query: QueryArgs,

        /// End of the window as Unix seconds. Defaults to now
        #[arg(long, allow_hyphen_values = true)]
        to: Option<i64>,
    },
}

/// Options shared by both granularities
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Base symbol, e.g. "BTC"
    #[arg(long, default_value = "BTC")]
    pub fsym: String,

    /// Quote symbol, e.g. "USD"
    #[arg(long, default_value = "USD")]
    pub tsym: String,

    /// Number of candles (clamped to 1..=2000)
    #[arg(short, long, default_value = "24", allow_hyphen_values = true)]
    pub limit: i64,

    /// Exchange to query instead of the aggregate index
    #[arg(short, long)]
    pub exchange: Option<String>,

    /// Application name sent as extraParams
    #[arg(long)]
    pub extra_params: Option<String>,

    /// Request a signed response
    #[arg(long)]
    pub sign: bool,

    /// Disable conversion through intermediate currencies
    #[arg(long)]
    pub no_try_conversion: bool,

    /// Write candles to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// `cryptocompare_{command}_{FSYM}-{TSYM}_{timestamp}.log`
fn log_file_name(command: &str, query: &QueryArgs, started: DateTime<Local>) -> String {
    format!(
        "cryptocompare_{}_{}-{}_{}.log",
        command,
        query.fsym.to_uppercase(),
        query.tsym.to_uppercase(),
        started.format("%Y%m%dT%H%M%S")
    )
}

/// Default directives when `RUST_LOG` is unset; `--verbose` only raises this crate
fn filter_directives(verbose: bool) -> String {
    let own = if verbose { "debug" } else { "info" };
    format!(
        "warn,cryptocompare_candles={own},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn"
    )
}

fn setup_logging(verbose: bool, log_dir: &Path, log_file: &str) -> Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(verbose)));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(verbose)
        .with_ansi(true);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::never(log_dir, log_file))
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Log file: {}", log_dir.join(log_file).display());

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (command_name, query) = match &cli.command {
        Commands::Hour { query, .. } => ("hour", query),
        Commands::Minute { query, .. } => ("minute", query),
    };
    let log_file = log_file_name(command_name, query, Local::now());

    setup_logging(cli.verbose, &cli.log_dir, &log_file)?;

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Hour { query, to } => commands::history::run_hourly(&config, query, to),
        Commands::Minute { query, to } => commands::history::run_minute(&config, query, to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_log_file_name_names_command_and_pair() {
        let cli = parse(&["cryptocompare-candles", "minute", "--fsym", "eth", "--tsym", "btc"]);
        let Commands::Minute { query, .. } = &cli.command else {
            panic!("expected minute command");
        };
        let started = Local.with_ymd_and_hms(2021, 1, 1, 9, 30, 0).unwrap();

        assert_eq!(
            log_file_name("minute", query, started),
            "cryptocompare_minute_ETH-BTC_20210101T093000.log"
        );
    }

    #[test]
    fn test_log_dir_flag() {
        assert_eq!(parse(&["cryptocompare-candles", "hour"]).log_dir, PathBuf::from("logs"));

        let cli = parse(&["cryptocompare-candles", "hour", "--log-dir", "/tmp/cc-logs"]);
        assert_eq!(cli.log_dir, PathBuf::from("/tmp/cc-logs"));
    }

    #[test]
    fn test_verbose_only_raises_own_crate() {
        assert!(filter_directives(false).starts_with("warn,cryptocompare_candles=info,"));
        assert!(filter_directives(true).starts_with("warn,cryptocompare_candles=debug,"));
        assert!(filter_directives(true).contains("reqwest=warn"));
    }
}
