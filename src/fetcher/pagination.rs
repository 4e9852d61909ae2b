//! Paginated range fetch for kline requests
//!
//! The exchange caps every kline request at 1000 records, so covering an
//! arbitrary lookback window means issuing repeated bounded requests and
//! stitching the pages together. The loop here advances `startTime` to one
//! millisecond past the last open time seen, which guarantees forward
//! progress without duplicating the boundary record, and pauses a fixed
//! delay between pages to stay under the exchange rate limit.
//!
//! Safety mechanisms:
//! - Maximum page count turns a non-advancing loop into an error
//! - A successful but empty page means the available history is exhausted

use crate::fetcher::{FetcherError, FetcherResult, KlineSource};
use crate::{Candle, Interval};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Maximum number of pages fetched for one window, to prevent infinite loops
const MAX_PAGES: usize = 10_000;

/// Per-request record limit imposed by the exchange
pub const PAGE_LIMIT: usize = 1000;

/// Fixed pause between page requests
pub const PAGE_DELAY: Duration = Duration::from_millis(500);

/// Milliseconds in one day
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Range fetcher over a [`KlineSource`]
pub struct RangeFetcher;

impl RangeFetcher {
    /// Fetch the full series for a lookback window ending at `end_time`
    ///
    /// # Arguments
    /// * `source` - Kline page source
    /// * `symbol` - Trading symbol
    /// * `interval` - Time interval
    /// * `lookback_days` - Window length in days
    /// * `end_time` - End of the window (Unix timestamp in milliseconds)
    ///
    /// # Returns
    /// All candles in `[end_time - lookback_days * 86_400_000, end_time)`,
    /// clipped to whatever history the exchange actually has
    pub async fn fetch<S>(
        source: &S,
        symbol: &str,
        interval: Interval,
        lookback_days: u32,
        end_time: i64,
    ) -> FetcherResult<Vec<Candle>>
    where
        S: KlineSource + ?Sized,
    {
        let start_time = end_time - i64::from(lookback_days) * MILLIS_PER_DAY;
        Self::fetch_window(source, symbol, interval, start_time, end_time).await
    }

    /// Fetch all candles in the half-open window `[start_time, end_time)`
    ///
    /// # Errors
    /// Returns an error if the page cap is exceeded or a page fetch fails;
    /// a failed page aborts the whole fetch rather than truncating the series
    pub async fn fetch_window<S>(
        source: &S,
        symbol: &str,
        interval: Interval,
        start_time: i64,
        end_time: i64,
    ) -> FetcherResult<Vec<Candle>>
    where
        S: KlineSource + ?Sized,
    {
        let mut all_candles = Vec::new();
        let mut current_start = start_time;
        let mut page = 0;

        while current_start < end_time {
            if page >= MAX_PAGES {
                return Err(FetcherError::ApiError(format!(
                    "Max pages ({MAX_PAGES}) exceeded for symbol {symbol} - possible infinite loop. Last timestamp: {current_start}"
                )));
            }

            debug!(
                "Fetching {} klines page {} for {} from {} to {}",
                interval,
                page + 1,
                symbol,
                current_start,
                end_time
            );

            let candles = source
                .fetch_klines(symbol, interval, current_start, end_time, PAGE_LIMIT)
                .await?;

            if candles.is_empty() {
                debug!(
                    "Empty page received at page {}. Total candles collected: {}",
                    page + 1,
                    all_candles.len()
                );
                break;
            }

            debug!("Received {} candles in page {}", candles.len(), page + 1);

            // SAFETY: unwrap() is safe because we break early on empty page above
            let last_open_time = candles.last().unwrap().open_time;

            all_candles.extend(candles);

            // Advance to one millisecond past the last open time seen
            current_start = last_open_time + 1;

            page += 1;

            sleep(PAGE_DELAY).await;
        }

        debug!(
            "Pagination completed after {} pages. Total candles: {}",
            page,
            all_candles.len()
        );

        Ok(all_candles)
    }
}
