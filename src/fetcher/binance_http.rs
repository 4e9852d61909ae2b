//! Binance HTTP client helper module
//!
//! Thin wrapper over a shared [`reqwest::Client`] for Binance REST endpoints.
//! Requests are issued one at a time with no timeout and no retries; a
//! non-success status is surfaced as a typed error so callers can tell a
//! failed request apart from an empty result.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::fetcher::{FetcherError, FetcherResult};

/// HTTP client for Binance API interactions
pub struct BinanceHttpClient {
    client: Client,
    base_url: String,
}

impl BinanceHttpClient {
    /// Create a new HTTP client
    ///
    /// # Arguments
    /// * `base_url` - Base URL for API endpoints (e.g., "<https://api.binance.com>")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Execute a GET request with generic deserialization
    ///
    /// # Arguments
    /// * `endpoint` - API endpoint path (e.g., "/api/v3/klines")
    /// * `params` - Query parameters as key-value pairs
    ///
    /// # Returns
    /// Deserialized response of type T
    ///
    /// # Errors
    /// Returns `FetcherError` on network failure, non-success status, or an
    /// undeserializable body.
    pub async fn get<T>(&self, endpoint: &str, params: &[(&str, String)]) -> FetcherResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);

        debug!("Making GET request to: {} with {} params", url, params.len());

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| FetcherError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FetcherError::HttpError(format!(
                "HTTP {status}: {error_text}"
            )));
        }

        response.json::<T>().await.map_err(|e| {
            FetcherError::ParseError(format!("Failed to deserialize response: {e}"))
        })
    }

    /// Base URL this client targets
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
