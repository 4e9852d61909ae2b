//! Data fetcher implementations

use crate::{Candle, Interval};
use async_trait::async_trait;

pub mod binance_http;
pub mod binance_parser;
pub mod binance_spot;
pub mod pagination;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Response parse error
    #[error("parse error: {0}")]
    ParseError(String),

    /// API error response
    #[error("API error: {0}")]
    ApiError(String),

    /// Network error
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Source of candlestick pages
///
/// One call fetches a single bounded page; the range fetch in [`pagination`]
/// drives repeated calls to cover an arbitrary time window. The seam exists
/// so the pagination and archive logic can run against a stub in tests.
#[async_trait]
pub trait KlineSource: Send + Sync {
    /// Fetch one page of candles for the half-open window `[start_time, end_time)`
    ///
    /// # Arguments
    /// * `symbol` - Trading symbol (e.g., "BTCUSDT")
    /// * `interval` - Time interval for candles
    /// * `start_time` - Start time (Unix timestamp in milliseconds)
    /// * `end_time` - End time (Unix timestamp in milliseconds)
    /// * `limit` - Maximum number of candles to return
    ///
    /// # Returns
    /// Up to `limit` candles, in ascending open-time order. An empty vector
    /// means the exchange has no further data in the window.
    async fn fetch_klines(
        &self,
        symbol: &str,
        interval: Interval,
        start_time: i64,
        end_time: i64,
        limit: usize,
    ) -> FetcherResult<Vec<Candle>>;
}
