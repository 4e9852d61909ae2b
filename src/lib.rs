//! # Kline Archiver Library
//!
//! A small library for downloading historical candlestick (kline) data from
//! the Binance spot API and archiving it as a single NumPy `.npz` file for
//! offline analysis.
//!
//! ## Features
//!
//! - **Paginated range fetch**: transparently stitches together the exchange's
//!   1000-records-per-request pages into one continuous series
//! - **Multi-interval archives**: one series per interval in a fixed set,
//!   all written to a single self-describing archive file
//! - **Type-safe parsing**: raw API responses are validated into typed
//!   [`Candle`] records at the boundary
//!
//! ## Quick Start
//!
//! ```no_run
//! use kline_archiver::archiver::{ArchiveBuilder, ArchiveRequest};
//! use kline_archiver::fetcher::binance_spot::BinanceSpotFetcher;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let request = ArchiveRequest {
//!     symbol: "BTCUSDT".to_string(),
//!     lookback_days: 30,
//!     end_time: None, // defaults to now
//!     output: "btc_klines.npz".into(),
//! };
//!
//! let builder = ArchiveBuilder::new(BinanceSpotFetcher::new());
//! let summary = builder.build(&request).await?;
//! println!("{} series archived", summary.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`fetcher`] - HTTP client, response parsing, and the paginated range fetch
//! - [`archiver`] - Drives one fetch per interval and writes the archive
//! - [`output`] - `.npz` archive writer
//! - [`cli`] - Command-line surface

#![warn(missing_docs)]
#![warn(clippy::all)]

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Archive build orchestration
pub mod archiver;

/// CLI command implementation
pub mod cli;

/// Data fetching from the exchange API
pub mod fetcher;

/// Archive output writer
pub mod output;

pub use archiver::{ArchiveBuilder, ArchiveRequest};

/// One OHLCV candlestick record
///
/// Fields mirror the Binance kline wire format: 12 positional values per
/// record, kept in API order. The final `ignore` field is reserved by the
/// exchange and passed through as returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    /// Open time (Unix timestamp in milliseconds)
    pub open_time: i64,
    /// Open price
    pub open: Decimal,
    /// High price
    pub high: Decimal,
    /// Low price
    pub low: Decimal,
    /// Close price
    pub close: Decimal,
    /// Volume (base asset)
    pub volume: Decimal,
    /// Close time (Unix timestamp in milliseconds)
    pub close_time: i64,
    /// Quote asset volume
    pub quote_volume: Decimal,
    /// Number of trades
    pub trades: u64,
    /// Taker buy base asset volume
    pub taker_buy_base_volume: Decimal,
    /// Taker buy quote asset volume
    pub taker_buy_quote_volume: Decimal,
    /// Reserved field, unused by the exchange
    pub ignore: Decimal,
}

/// Time interval for candlestick data
///
/// Restricted to the fixed set of resolutions the archive covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// 1 minute
    #[serde(rename = "1m")]
    OneMinute,
    /// 5 minutes
    #[serde(rename = "5m")]
    FiveMinutes,
    /// 15 minutes
    #[serde(rename = "15m")]
    FifteenMinutes,
    /// 30 minutes
    #[serde(rename = "30m")]
    ThirtyMinutes,
    /// 1 hour
    #[serde(rename = "1h")]
    OneHour,
    /// 2 hours
    #[serde(rename = "2h")]
    TwoHours,
    /// 4 hours
    #[serde(rename = "4h")]
    FourHours,
    /// 8 hours
    #[serde(rename = "8h")]
    EightHours,
}

/// The fixed set of intervals fetched into every archive, in fetch order.
pub const ARCHIVE_INTERVALS: [Interval; 8] = [
    Interval::OneMinute,
    Interval::FiveMinutes,
    Interval::FifteenMinutes,
    Interval::ThirtyMinutes,
    Interval::OneHour,
    Interval::TwoHours,
    Interval::FourHours,
    Interval::EightHours,
];

impl Interval {
    /// Convert interval to milliseconds
    pub fn to_milliseconds(&self) -> i64 {
        match self {
            Interval::OneMinute => 60_000,
            Interval::FiveMinutes => 300_000,
            Interval::FifteenMinutes => 900_000,
            Interval::ThirtyMinutes => 1_800_000,
            Interval::OneHour => 3_600_000,
            Interval::TwoHours => 7_200_000,
            Interval::FourHours => 14_400_000,
            Interval::EightHours => 28_800_000,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::TwoHours => "2h",
            Interval::FourHours => "4h",
            Interval::EightHours => "8h",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Interval::OneMinute),
            "5m" => Ok(Interval::FiveMinutes),
            "15m" => Ok(Interval::FifteenMinutes),
            "30m" => Ok(Interval::ThirtyMinutes),
            "1h" => Ok(Interval::OneHour),
            "2h" => Ok(Interval::TwoHours),
            "4h" => Ok(Interval::FourHours),
            "8h" => Ok(Interval::EightHours),
            _ => Err(format!("Invalid interval: {s}")),
        }
    }
}
