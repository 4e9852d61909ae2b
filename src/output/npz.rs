//! NumPy `.npz` archive writer
//!
//! On-disk schema: one named 2-D `f64` array per interval label, rows in
//! chronological order, columns being the 12 raw kline fields in API order:
//!
//! `open_time, open, high, low, close, volume, close_time, quote_volume,
//! trades, taker_buy_base_volume, taker_buy_quote_volume, ignore`
//!
//! Timestamps are kept as epoch milliseconds; decimal fields are converted
//! to `f64` at this boundary. An empty series is written as a 0 x 12 array
//! so every configured interval has an entry regardless of available data.

use crate::{Candle, Interval};
use ndarray::Array2;
use ndarray_npy::NpzWriter;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use super::{OutputError, OutputResult};

/// Number of columns per candle row in the on-disk schema
pub const CANDLE_COLUMNS: usize = 12;

/// Write one archive file holding every interval's series
///
/// # Arguments
/// * `path` - Output file path
/// * `series` - Interval label and series pairs, in archive order
///
/// # Errors
/// Returns `OutputError` if the file cannot be created or a value cannot be
/// represented in the on-disk schema. Nothing is written until every series
/// has been converted.
pub fn write_archive<P: AsRef<Path>>(
    path: P,
    series: &[(Interval, Vec<Candle>)],
) -> OutputResult<()> {
    let path = path.as_ref();

    // Convert everything up front so a bad value cannot leave a partial file
    let mut arrays = Vec::with_capacity(series.len());
    for (interval, candles) in series {
        arrays.push((*interval, series_to_array(candles)?));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::IoError(format!("Failed to create directory: {e}")))?;
        }
    }

    let file = File::create(path)
        .map_err(|e| OutputError::IoError(format!("Failed to create file: {e}")))?;
    let mut npz = NpzWriter::new(file);

    for (interval, array) in &arrays {
        debug!(
            "Adding array {}: {} rows x {} columns",
            interval,
            array.nrows(),
            array.ncols()
        );
        npz.add_array(interval.to_string(), array)
            .map_err(|e| OutputError::NpzError(format!("Failed to add array {interval}: {e}")))?;
    }

    npz.finish()
        .map_err(|e| OutputError::NpzError(format!("Failed to finalize archive: {e}")))?;

    info!("Archive written to {}", path.display());
    Ok(())
}

/// Reshape a series into its rows x columns on-disk form
///
/// # Errors
/// Returns `OutputError::ConversionError` if a decimal field is not
/// representable as `f64`
pub fn series_to_array(candles: &[Candle]) -> OutputResult<Array2<f64>> {
    let mut array = Array2::zeros((candles.len(), CANDLE_COLUMNS));

    for (row, candle) in candles.iter().enumerate() {
        array[[row, 0]] = candle.open_time as f64;
        array[[row, 1]] = decimal_to_f64(candle.open, "open")?;
        array[[row, 2]] = decimal_to_f64(candle.high, "high")?;
        array[[row, 3]] = decimal_to_f64(candle.low, "low")?;
        array[[row, 4]] = decimal_to_f64(candle.close, "close")?;
        array[[row, 5]] = decimal_to_f64(candle.volume, "volume")?;
        array[[row, 6]] = candle.close_time as f64;
        array[[row, 7]] = decimal_to_f64(candle.quote_volume, "quote_volume")?;
        array[[row, 8]] = candle.trades as f64;
        array[[row, 9]] = decimal_to_f64(candle.taker_buy_base_volume, "taker_buy_base_volume")?;
        array[[row, 10]] = decimal_to_f64(candle.taker_buy_quote_volume, "taker_buy_quote_volume")?;
        array[[row, 11]] = decimal_to_f64(candle.ignore, "ignore")?;
    }

    Ok(array)
}

fn decimal_to_f64(value: Decimal, field_name: &str) -> OutputResult<f64> {
    value.to_f64().ok_or_else(|| {
        OutputError::ConversionError(format!("{field_name} value {value} is not representable as f64"))
    })
}
