//! Archive build orchestration
//!
//! Drives one range fetch per configured interval, in the fixed archive
//! order, and hands the collected series to the npz writer. Intervals are
//! fetched strictly one after another; the external rate limit makes
//! parallel fetching pointless. Serialization happens only after every
//! interval has succeeded, so a failed run leaves no partial archive behind.

use chrono::Utc;
use std::path::PathBuf;
use tracing::info;

use crate::fetcher::pagination::RangeFetcher;
use crate::fetcher::{FetcherError, KlineSource};
use crate::output::{npz, OutputError};
use crate::{Candle, Interval, ARCHIVE_INTERVALS};

/// Archive build errors
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// A range fetch failed
    #[error("fetcher error: {0}")]
    FetcherError(#[from] FetcherError),

    /// Writing the archive failed
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),
}

/// Parameters for one archive build
#[derive(Debug, Clone)]
pub struct ArchiveRequest {
    /// Trading symbol (e.g., "BTCUSDT")
    pub symbol: String,
    /// Lookback window in days, ending at `end_time`
    pub lookback_days: u32,
    /// End of the window (Unix timestamp in milliseconds); `None` means now
    pub end_time: Option<i64>,
    /// Output archive path
    pub output: PathBuf,
}

/// Per-interval candle counts from a completed build
pub type ArchiveSummary = Vec<(Interval, usize)>;

/// Builds one multi-interval kline archive from a [`KlineSource`]
pub struct ArchiveBuilder<S> {
    source: S,
}

impl<S: KlineSource> ArchiveBuilder<S> {
    /// Create a builder over the given source
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch every configured interval and write the archive
    ///
    /// Fetches one series per interval in [`ARCHIVE_INTERVALS`] order, then
    /// serializes the full mapping to `request.output`.
    ///
    /// # Errors
    /// Any fetch or write failure aborts the build; no file is written
    /// unless every interval succeeded.
    pub async fn build(&self, request: &ArchiveRequest) -> Result<ArchiveSummary, ArchiveError> {
        let end_time = request
            .end_time
            .unwrap_or_else(|| Utc::now().timestamp_millis());

        let mut series: Vec<(Interval, Vec<Candle>)> = Vec::with_capacity(ARCHIVE_INTERVALS.len());

        for interval in ARCHIVE_INTERVALS {
            info!("Fetching {} data for {}...", interval, request.symbol);

            let candles = RangeFetcher::fetch(
                &self.source,
                &request.symbol,
                interval,
                request.lookback_days,
                end_time,
            )
            .await?;

            info!("Fetched {} {} candles", candles.len(), interval);
            series.push((interval, candles));
        }

        npz::write_archive(&request.output, &series)?;

        Ok(series
            .iter()
            .map(|(interval, candles)| (*interval, candles.len()))
            .collect())
    }
}
