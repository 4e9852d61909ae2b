//! Binance response parser
//!
//! Stateless parsing of raw Binance kline JSON into typed [`Candle`] records.
//! The wire format is an untyped nested array; every record is checked for
//! the fixed 12-element arity and field parseability at this boundary so the
//! rest of the crate only ever sees typed data.

use crate::fetcher::{FetcherError, FetcherResult};
use crate::Candle;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Number of positional fields in one raw kline record
pub const KLINE_FIELDS: usize = 12;

/// Stateless parser for Binance API responses
pub struct BinanceParser;

impl BinanceParser {
    /// Parse a Binance klines JSON array into Candle structs
    ///
    /// # Arguments
    /// * `klines` - Vector of JSON values representing klines from the API
    ///
    /// # Returns
    /// Vector of parsed Candle structs
    ///
    /// # Errors
    /// Returns `FetcherError::ParseError` if a record is not an array, has
    /// the wrong arity, or a field cannot be parsed
    ///
    /// # Format
    /// `[open_time, open, high, low, close, volume, close_time, quote_volume,
    /// trades, taker_buy_base, taker_buy_quote, ignore]`
    pub fn parse_klines(klines: Vec<Value>) -> FetcherResult<Vec<Candle>> {
        let mut candles = Vec::with_capacity(klines.len());

        for kline in klines {
            let arr = kline
                .as_array()
                .ok_or_else(|| FetcherError::ParseError("Kline is not an array".to_string()))?;

            if arr.len() != KLINE_FIELDS {
                return Err(FetcherError::ParseError(format!(
                    "Expected {KLINE_FIELDS} elements in kline, got {}",
                    arr.len()
                )));
            }

            let open_time = arr[0]
                .as_i64()
                .ok_or_else(|| FetcherError::ParseError("Invalid open_time".to_string()))?;

            let close_time = arr[6]
                .as_i64()
                .ok_or_else(|| FetcherError::ParseError("Invalid close_time".to_string()))?;

            let trades = arr[8]
                .as_u64()
                .ok_or_else(|| FetcherError::ParseError("Invalid trades count".to_string()))?;

            // Price and volume fields arrive as decimal strings
            let open = Self::parse_decimal(&arr[1], "open")?;
            let high = Self::parse_decimal(&arr[2], "high")?;
            let low = Self::parse_decimal(&arr[3], "low")?;
            let close = Self::parse_decimal(&arr[4], "close")?;
            let volume = Self::parse_decimal(&arr[5], "volume")?;
            let quote_volume = Self::parse_decimal(&arr[7], "quote_volume")?;
            let taker_buy_base_volume = Self::parse_decimal(&arr[9], "taker_buy_base_volume")?;
            let taker_buy_quote_volume = Self::parse_decimal(&arr[10], "taker_buy_quote_volume")?;
            let ignore = Self::parse_decimal(&arr[11], "ignore")?;

            candles.push(Candle {
                open_time,
                open,
                high,
                low,
                close,
                volume,
                close_time,
                quote_volume,
                trades,
                taker_buy_base_volume,
                taker_buy_quote_volume,
                ignore,
            });
        }

        Ok(candles)
    }

    /// Helper to parse decimal from JSON value
    fn parse_decimal(value: &Value, field_name: &str) -> FetcherResult<Decimal> {
        let s = value
            .as_str()
            .ok_or_else(|| FetcherError::ParseError(format!("{field_name} is not a string")))?;

        Decimal::from_str(s)
            .map_err(|e| FetcherError::ParseError(format!("Failed to parse {field_name}: {e}")))
    }
}
