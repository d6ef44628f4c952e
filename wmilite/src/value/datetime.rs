// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CIM DATETIME text encoding
//!
//! Timestamps travel as 25-character text: `yyyymmddHHMMSS.mmmmmmsUUU`, where
//! `s` is `+` or `-` and `UUU` is the UTC offset in minutes. Intervals use
//! `ddddddddHHMMSS.mmmmmm:000`.

use super::convert::ConversionError;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike};

const CIM_TEXT_LEN: usize = 25;

fn field(text: &str, range: std::ops::Range<usize>, target: &'static str) -> Result<u32, ConversionError> {
    text.get(range)
        .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<u32>().ok())
        .ok_or_else(|| ConversionError::Parse {
            text: text.to_string(),
            target,
        })
}

/// Parse a CIM timestamp
pub fn parse_cim_datetime(text: &str) -> Result<DateTime<FixedOffset>, ConversionError> {
    const TARGET: &str = "CIM datetime";

    let invalid = || ConversionError::Parse {
        text: text.to_string(),
        target: TARGET,
    };

    if text.len() != CIM_TEXT_LEN || !text.is_ascii() || &text[14..15] != "." {
        return Err(invalid());
    }

    let year = field(text, 0..4, TARGET)?;
    let month = field(text, 4..6, TARGET)?;
    let day = field(text, 6..8, TARGET)?;
    let hour = field(text, 8..10, TARGET)?;
    let minute = field(text, 10..12, TARGET)?;
    let second = field(text, 12..14, TARGET)?;
    let micros = field(text, 15..21, TARGET)?;
    let offset_minutes = field(text, 22..25, TARGET)? as i32;

    let offset_seconds = match &text[21..22] {
        "+" => offset_minutes * 60,
        "-" => -offset_minutes * 60,
        _ => return Err(invalid()),
    };

    let offset = FixedOffset::east_opt(offset_seconds).ok_or_else(invalid)?;
    let naive = NaiveDate::from_ymd_opt(year as i32, month, day)
        .and_then(|date| date.and_hms_micro_opt(hour, minute, second, micros))
        .ok_or_else(invalid)?;

    naive
        .and_local_timezone(offset)
        .single()
        .ok_or_else(invalid)
}

/// Parse a CIM interval
pub fn parse_cim_interval(text: &str) -> Result<Duration, ConversionError> {
    const TARGET: &str = "CIM interval";

    if text.len() != CIM_TEXT_LEN || !text.is_ascii() || &text[14..15] != "." || &text[21..] != ":000" {
        return Err(ConversionError::Parse {
            text: text.to_string(),
            target: TARGET,
        });
    }

    let days = field(text, 0..8, TARGET)? as i64;
    let hours = field(text, 8..10, TARGET)? as i64;
    let minutes = field(text, 10..12, TARGET)? as i64;
    let seconds = field(text, 12..14, TARGET)? as i64;
    let micros = field(text, 15..21, TARGET)? as i64;

    let total_seconds = ((days * 24 + hours) * 60 + minutes) * 60 + seconds;
    Ok(Duration::microseconds(total_seconds * 1_000_000 + micros))
}

/// Encode a timestamp as CIM text
pub fn format_cim_datetime(value: &DateTime<FixedOffset>) -> String {
    let offset_minutes = value.offset().local_minus_utc() / 60;
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}.{:06}{}{:03}",
        value.year(),
        value.month(),
        value.day(),
        value.hour(),
        value.minute(),
        value.second(),
        value.nanosecond() / 1_000 % 1_000_000,
        sign,
        offset_minutes.abs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_with_offset() {
        let parsed = parse_cim_datetime("20240315093000.250000+060").unwrap();
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.month(), 3);
        assert_eq!(parsed.hour(), 9);
        assert_eq!(parsed.nanosecond(), 250_000_000);
        assert_eq!(parsed.offset().local_minus_utc(), 3600);
        assert_eq!(format_cim_datetime(&parsed), "20240315093000.250000+060");
    }

    #[test]
    fn test_parse_datetime_negative_offset() {
        let parsed = parse_cim_datetime("20231231235959.000000-300").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), -300 * 60);
    }

    #[test]
    fn test_reject_malformed_datetime() {
        assert!(parse_cim_datetime("2024").is_err());
        assert!(parse_cim_datetime("20241315093000.000000+000").is_err());
        assert!(parse_cim_datetime("2024031509300*.000000+000").is_err());
        assert!(parse_cim_datetime("20240315093000.000000*000").is_err());
    }

    #[test]
    fn test_parse_interval() {
        let parsed = parse_cim_interval("00000001020304.000005:000").unwrap();
        let expected = Duration::days(1)
            + Duration::hours(2)
            + Duration::minutes(3)
            + Duration::seconds(4)
            + Duration::microseconds(5);
        assert_eq!(parsed, expected);
        assert!(parse_cim_interval("00000001020304.000005+000").is_err());
    }
}
