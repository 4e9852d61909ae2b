//! End-to-end archive build tests against stub kline sources

use async_trait::async_trait;
use kline_archiver::archiver::{ArchiveBuilder, ArchiveRequest};
use kline_archiver::fetcher::pagination::RangeFetcher;
use kline_archiver::fetcher::{FetcherResult, KlineSource};
use kline_archiver::output::npz::CANDLE_COLUMNS;
use kline_archiver::{Candle, Interval, ARCHIVE_INTERVALS};
use ndarray::Array2;
use ndarray_npy::NpzReader;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs::File;
use std::str::FromStr;
use std::sync::Mutex;
use tempfile::TempDir;

/// Day-aligned end instant, so every interval's grid lines up with it
const END_TIME: i64 = 1_699_920_000_000;

const MILLIS_PER_DAY: i64 = 86_400_000;

fn grid_candle(open_time: i64, step: i64) -> Candle {
    Candle {
        open_time,
        open: Decimal::from_str("35000.50").unwrap(),
        high: Decimal::from_str("35100.00").unwrap(),
        low: Decimal::from_str("34950.00").unwrap(),
        close: Decimal::from_str("35050.75").unwrap(),
        volume: Decimal::from_str("1234.567").unwrap(),
        close_time: open_time + step - 1,
        quote_volume: Decimal::from_str("43210987.65").unwrap(),
        trades: 5432,
        taker_buy_base_volume: Decimal::from_str("617.283").unwrap(),
        taker_buy_quote_volume: Decimal::from_str("21605493.82").unwrap(),
        ignore: Decimal::ZERO,
    }
}

/// Stub exchange with a complete interval-aligned history
///
/// Serves candles on each interval's grid inside the requested window,
/// capped at `limit` per page, and records every request per interval.
struct GridSource {
    requests: Mutex<HashMap<Interval, Vec<i64>>>,
}

impl GridSource {
    fn new() -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
        }
    }

    fn request_count(&self, interval: Interval) -> usize {
        self.requests
            .lock()
            .unwrap()
            .get(&interval)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl KlineSource for GridSource {
    async fn fetch_klines(
        &self,
        _symbol: &str,
        interval: Interval,
        start_time: i64,
        end_time: i64,
        limit: usize,
    ) -> FetcherResult<Vec<Candle>> {
        self.requests
            .lock()
            .unwrap()
            .entry(interval)
            .or_default()
            .push(start_time);

        let step = interval.to_milliseconds();
        let mut open = if start_time % step == 0 {
            start_time
        } else {
            (start_time / step + 1) * step
        };

        let mut candles = Vec::new();
        while open < end_time && candles.len() < limit {
            candles.push(grid_candle(open, step));
            open += step;
        }
        Ok(candles)
    }
}

/// Stub exchange with no history at all
struct EmptySource;

#[async_trait]
impl KlineSource for EmptySource {
    async fn fetch_klines(
        &self,
        _symbol: &str,
        _interval: Interval,
        _start_time: i64,
        _end_time: i64,
        _limit: usize,
    ) -> FetcherResult<Vec<Candle>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_build_archive_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("btc_klines.npz");

    let source = GridSource::new();
    let builder = ArchiveBuilder::new(source);

    let request = ArchiveRequest {
        symbol: "BTCUSDT".to_string(),
        lookback_days: 1,
        end_time: Some(END_TIME),
        output: output.clone(),
    };

    let summary = builder.build(&request).await.unwrap();

    // One entry per configured interval, in the fixed order
    let intervals: Vec<Interval> = summary.iter().map(|(i, _)| *i).collect();
    assert_eq!(intervals, ARCHIVE_INTERVALS);

    // One day of candles per interval
    let counts: HashMap<Interval, usize> = summary.into_iter().collect();
    for interval in ARCHIVE_INTERVALS {
        let expected = (MILLIS_PER_DAY / interval.to_milliseconds()) as usize;
        assert_eq!(counts[&interval], expected, "count mismatch for {interval}");
    }

    // The 1m series needed two full pages then an empty one
    assert_eq!(counts[&Interval::OneMinute], 1440);

    let mut npz = NpzReader::new(File::open(&output).unwrap()).unwrap();
    assert_eq!(npz.names().unwrap().len(), ARCHIVE_INTERVALS.len());

    let start_time = END_TIME - MILLIS_PER_DAY;
    for interval in ARCHIVE_INTERVALS {
        let array: Array2<f64> = npz.by_name(&interval.to_string()).unwrap();
        let expected_rows = (MILLIS_PER_DAY / interval.to_milliseconds()) as usize;
        assert_eq!(array.shape(), &[expected_rows, CANDLE_COLUMNS]);

        // Chronological order, every open time inside the half-open window
        let mut previous = i64::MIN;
        for row in 0..array.nrows() {
            let open_time = array[[row, 0]] as i64;
            assert!(open_time >= start_time && open_time < END_TIME);
            assert!(open_time > previous);
            previous = open_time;
        }
    }
}

#[tokio::test]
async fn test_range_fetch_request_pattern() {
    // 1440 one-minute candles in one day: two full pages, then the empty
    // page that terminates the loop
    let source = GridSource::new();
    let candles = RangeFetcher::fetch(&source, "BTCUSDT", Interval::OneMinute, 1, END_TIME)
        .await
        .unwrap();

    assert_eq!(candles.len(), 1440);
    assert_eq!(source.request_count(Interval::OneMinute), 3);

    // Coarser intervals fit in one page and terminate on the second request
    let candles = RangeFetcher::fetch(&source, "BTCUSDT", Interval::EightHours, 1, END_TIME)
        .await
        .unwrap();

    assert_eq!(candles.len(), 3);
    assert_eq!(source.request_count(Interval::EightHours), 2);
}

#[tokio::test]
async fn test_build_archive_empty_history() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("empty_klines.npz");

    let builder = ArchiveBuilder::new(EmptySource);

    let request = ArchiveRequest {
        symbol: "BTCUSDT".to_string(),
        lookback_days: 1,
        end_time: Some(END_TIME),
        output: output.clone(),
    };

    let summary = builder.build(&request).await.unwrap();

    // The run completes and every interval is present with zero candles
    assert_eq!(summary.len(), ARCHIVE_INTERVALS.len());
    assert!(summary.iter().all(|(_, count)| *count == 0));
    assert!(output.exists());

    let mut npz = NpzReader::new(File::open(&output).unwrap()).unwrap();
    for interval in ARCHIVE_INTERVALS {
        let array: Array2<f64> = npz.by_name(&interval.to_string()).unwrap();
        assert_eq!(array.shape(), &[0, CANDLE_COLUMNS]);
    }
}
