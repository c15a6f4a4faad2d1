//! CSV export of candle history

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cryptocompare::Candle;

/// Column order of exported files
pub const CSV_HEADER: [&str; 8] = [
    "time",
    "datetime",
    "open",
    "high",
    "low",
    "close",
    "volumefrom",
    "volumeto",
];

/// Write candles to `path`, creating parent directories as needed
pub fn write_csv(path: impl AsRef<Path>, candles: &[Candle]) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path).context("Failed to create output file")?;
    writer.write_record(CSV_HEADER)?;

    for candle in candles {
        let datetime = candle
            .datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

        writer.write_record([
            candle.time.to_string(),
            datetime,
            candle.open.to_string(),
            candle.high.to_string(),
            candle.low.to_string(),
            candle.close.to_string(),
            candle.volume_from.to_string(),
            candle.volume_to.to_string(),
        ])?;
    }

    writer.flush().context("Failed to flush CSV writer")?;

    info!("Saved {} rows to {}", candles.len(), path.display());
    Ok(path.to_path_buf())
}
