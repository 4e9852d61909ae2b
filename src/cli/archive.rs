//! Archive command implementation

use chrono::{DateTime, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::archiver::{ArchiveBuilder, ArchiveRequest};
use crate::fetcher::binance_spot::BinanceSpotFetcher;

use super::CliError;

/// Try to parse a datetime from RFC3339 format
///
/// Handles both inputs with and without timezone designators:
/// - "2024-01-01T00:00:00Z" - explicit UTC
/// - "2024-01-01T00:00:00+01:00" - explicit offset
/// - "2024-01-01T00:00:00" - no timezone, assumed UTC
///
/// Returns timestamp in milliseconds, or None if parsing fails.
fn try_parse_datetime_rfc3339(input: &str) -> Option<i64> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.timestamp_millis());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&format!("{input}Z")) {
        return Some(dt.timestamp_millis());
    }

    None
}

/// Parse an end time from YYYY-MM-DD or RFC3339 datetime format.
///
/// For date-only format, uses end-of-day (23:59:59.999 UTC) so the specified
/// date is fully included. For RFC3339 format, uses the exact time specified.
fn parse_end_time_flexible(input: &str) -> Result<i64, CliError> {
    if let Some(ts) = try_parse_datetime_rfc3339(input) {
        return Ok(ts);
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| CliError::InvalidArgument(format!("Invalid end time: {e}")))?;
    let datetime = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .ok_or_else(|| CliError::InvalidArgument("Invalid end time".to_string()))?;
    Ok(datetime.and_utc().timestamp_millis())
}

/// Kline Archiver CLI
#[derive(Parser, Debug)]
#[command(name = "kline-archiver")]
#[command(about = "Archive Binance spot klines across multiple intervals", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Trading pair symbol
    #[arg(long, default_value = "BTCUSDT")]
    pub symbol: String,

    /// Lookback window in days, ending at --end-time
    #[arg(long, default_value_t = 30)]
    pub lookback_days: u32,

    /// End of the window (YYYY-MM-DD or RFC3339 datetime); defaults to now
    #[arg(long)]
    pub end_time: Option<String>,

    /// Output archive path
    #[arg(long, default_value = "btc_klines.npz")]
    pub output: PathBuf,
}

impl Cli {
    /// Execute the archive build
    pub async fn execute(&self) -> Result<(), CliError> {
        let end_time = self
            .end_time
            .as_deref()
            .map(parse_end_time_flexible)
            .transpose()?;

        let request = ArchiveRequest {
            symbol: self.symbol.clone(),
            lookback_days: self.lookback_days,
            end_time,
            output: self.output.clone(),
        };

        let builder = ArchiveBuilder::new(BinanceSpotFetcher::new());
        let summary = builder.build(&request).await?;

        for (interval, count) in &summary {
            info!("{}: {} candles", interval, count);
        }
        info!("Data saved to {}", self.output.display());

        Ok(())
    }
}
