//! Binance spot market kline fetcher
//!
//! Implements [`KlineSource`] against the public spot REST API
//! (`GET /api/v3/klines`). One call maps to one HTTP request; pagination
//! across a wider time range lives in [`crate::fetcher::pagination`].

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::fetcher::binance_http::BinanceHttpClient;
use crate::fetcher::binance_parser::BinanceParser;
use crate::fetcher::{FetcherResult, KlineSource};
use crate::{Candle, Interval};

/// Base URL for the Binance spot REST API
pub const BINANCE_SPOT_BASE_URL: &str = "https://api.binance.com";

const KLINES_ENDPOINT: &str = "/api/v3/klines";

/// Kline fetcher for the Binance spot market
pub struct BinanceSpotFetcher {
    http_client: BinanceHttpClient,
}

impl BinanceSpotFetcher {
    /// Create a fetcher against the production API
    pub fn new() -> Self {
        Self::with_base_url(BINANCE_SPOT_BASE_URL)
    }

    /// Create a fetcher with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: BinanceHttpClient::new(base_url),
        }
    }

    /// Base URL this fetcher targets
    pub fn base_url(&self) -> &str {
        self.http_client.base_url()
    }
}

impl Default for BinanceSpotFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KlineSource for BinanceSpotFetcher {
    async fn fetch_klines(
        &self,
        symbol: &str,
        interval: Interval,
        start_time: i64,
        end_time: i64,
        limit: usize,
    ) -> FetcherResult<Vec<Candle>> {
        let params = [
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("startTime", start_time.to_string()),
            ("endTime", end_time.to_string()),
            ("limit", limit.to_string()),
        ];

        debug!(
            "Requesting {} {} klines from {} to {}",
            symbol, interval, start_time, end_time
        );

        let raw: Vec<Value> = self.http_client.get(KLINES_ENDPOINT, &params).await?;
        BinanceParser::parse_klines(raw)
    }
}
