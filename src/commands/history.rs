//! Hour / minute commands - fetch one window of candle history and print it

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use cryptocompare_candles::cryptocompare::{
    CandleQuery, CandleResponse, Granularity, HourlyCandleQuery, MinuteCandleQuery,
};
use cryptocompare_candles::export::write_csv;
use cryptocompare_candles::{ClientConfig, CryptoCompareClient};
use tracing::info;

use crate::QueryArgs;

pub fn run_hourly(config: &ClientConfig, args: QueryArgs, to: Option<String>) -> Result<()> {
    let anchor = match to {
        Some(to) => DateTime::parse_from_rfc3339(&to)
            .with_context(|| format!("Invalid --to timestamp: {}", to))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let query = apply_args(HourlyCandleQuery::new(&args.fsym, &args.tsym, args.limit, anchor), &args);
    run(config, query, &args)
}

pub fn run_minute(config: &ClientConfig, args: QueryArgs, to: Option<i64>) -> Result<()> {
    let anchor = to.unwrap_or_else(|| Utc::now().timestamp());

    let query = apply_args(MinuteCandleQuery::new(&args.fsym, &args.tsym, args.limit, anchor), &args);
    run(config, query, &args)
}

fn apply_args<G: Granularity>(mut query: CandleQuery<G>, args: &QueryArgs) -> CandleQuery<G> {
    if let Some(exchange) = &args.exchange {
        query = query.with_exchange(exchange);
    }
    if let Some(extra_params) = &args.extra_params {
        query = query.with_extra_params(extra_params);
    }
    query
        .with_sign(args.sign)
        .with_try_conversion(!args.no_try_conversion)
}

fn run<G: Granularity>(config: &ClientConfig, query: CandleQuery<G>, args: &QueryArgs) -> Result<()> {
    info!(
        "Fetching {} {} {}/{} candles from {}",
        query.limit(),
        G::NAME,
        query.fsym(),
        query.tsym(),
        query.exchange()
    );

    let client = CryptoCompareClient::with_config(config)?;
    let rt = tokio::runtime::Runtime::new()?;

    let (history, meta) = rt
        .block_on(client.candles(Some(&query)))
        .with_context(|| format!("Failed to fetch {}/{} history", query.fsym(), query.tsym()))?;

    info!("{} returned {} candles", meta.url, history.data.len());

    print_summary(&history, G::NAME);

    if let Some(output) = &args.output {
        let path = write_csv(output, &history.data)?;
        println!("  Saved to:  {}", path.display());
    }

    Ok(())
}

fn print_summary(history: &CandleResponse, granularity: &str) {
    let format_ts = |ts: i64| {
        DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| ts.to_string())
    };

    println!("\n{}", "=".repeat(72));
    println!("CANDLE HISTORY ({})", granularity.to_uppercase());
    println!("{}", "=".repeat(72));
    println!(
        "  Range:   {} -> {}",
        format_ts(history.time_from),
        format_ts(history.time_to)
    );
    println!("  Candles: {}", history.data.len());
    println!("{}", "-".repeat(72));
    println!(
        "  {:<19} {:>10} {:>10} {:>10} {:>10} {:>12}",
        "time", "open", "high", "low", "close", "volumefrom"
    );

    for candle in &history.data {
        println!(
            "  {:<19} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12.4}",
            format_ts(candle.time),
            candle.open,
            candle.high,
            candle.low,
            candle.close,
            candle.volume_from
        );
    }

    println!("{}", "=".repeat(72));
}
