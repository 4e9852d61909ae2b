//! Unit tests for the Binance kline parser

use kline_archiver::fetcher::binance_parser::{BinanceParser, KLINE_FIELDS};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;

/// One raw kline as the API returns it
fn raw_kline(open_time: i64) -> Value {
    json!([
        open_time,
        "35000.50",
        "35100.00",
        "34950.00",
        "35050.75",
        "1234.567",
        open_time + 59_999,
        "43210987.65",
        5432,
        "617.283",
        "21605493.82",
        "0"
    ])
}

#[test]
fn test_parse_klines_valid() {
    let raw = vec![raw_kline(1699920000000), raw_kline(1699920060000)];

    let candles = BinanceParser::parse_klines(raw).unwrap();

    assert_eq!(candles.len(), 2);
    let first = &candles[0];
    assert_eq!(first.open_time, 1699920000000);
    assert_eq!(first.open, Decimal::from_str("35000.50").unwrap());
    assert_eq!(first.high, Decimal::from_str("35100.00").unwrap());
    assert_eq!(first.low, Decimal::from_str("34950.00").unwrap());
    assert_eq!(first.close, Decimal::from_str("35050.75").unwrap());
    assert_eq!(first.volume, Decimal::from_str("1234.567").unwrap());
    assert_eq!(first.close_time, 1699920059999);
    assert_eq!(first.quote_volume, Decimal::from_str("43210987.65").unwrap());
    assert_eq!(first.trades, 5432);
    assert_eq!(
        first.taker_buy_base_volume,
        Decimal::from_str("617.283").unwrap()
    );
    assert_eq!(
        first.taker_buy_quote_volume,
        Decimal::from_str("21605493.82").unwrap()
    );
    assert_eq!(first.ignore, Decimal::ZERO);
    assert_eq!(candles[1].open_time, 1699920060000);
}

#[test]
fn test_parse_klines_empty() {
    let candles = BinanceParser::parse_klines(vec![]).unwrap();
    assert!(candles.is_empty());
}

#[test]
fn test_parse_klines_wrong_arity() {
    // 11 elements instead of 12
    let raw = vec![json!([
        1699920000000_i64,
        "35000.50",
        "35100.00",
        "34950.00",
        "35050.75",
        "1234.567",
        1699920059999_i64,
        "43210987.65",
        5432,
        "617.283",
        "21605493.82"
    ])];

    let err = BinanceParser::parse_klines(raw).unwrap_err();
    assert!(err.to_string().contains(&KLINE_FIELDS.to_string()));
}

#[test]
fn test_parse_klines_not_an_array() {
    let raw = vec![json!({"open_time": 1699920000000_i64})];
    assert!(BinanceParser::parse_klines(raw).is_err());
}

#[test]
fn test_parse_klines_numeric_price_rejected() {
    // Prices must arrive as decimal strings, not JSON numbers
    let mut kline = raw_kline(1699920000000);
    kline[1] = json!(35000.50);

    assert!(BinanceParser::parse_klines(vec![kline]).is_err());
}

#[test]
fn test_parse_klines_unparseable_decimal() {
    let mut kline = raw_kline(1699920000000);
    kline[5] = json!("not-a-number");

    let err = BinanceParser::parse_klines(vec![kline]).unwrap_err();
    assert!(err.to_string().contains("volume"));
}

#[test]
fn test_parse_klines_invalid_open_time() {
    let mut kline = raw_kline(1699920000000);
    kline[0] = json!("1699920000000");

    let err = BinanceParser::parse_klines(vec![kline]).unwrap_err();
    assert!(err.to_string().contains("open_time"));
}
