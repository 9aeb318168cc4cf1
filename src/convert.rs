//! Coercion of arbitrary JSON values into the semantic column types.
//!
//! [`convert_value`] never fails: anything that cannot be coerced becomes
//! `null` and is reported through `log::warn!`. The fallible building blocks
//! are public so callers can inspect why a value was rejected.

use anyhow::{Context, Result, anyhow, bail, ensure};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeDelta, Utc};
use itertools::Itertools;
use log::warn;
use serde_json::{Map, Number, Value};

use crate::{error::json_kind, schema::ColumnType};

/// Numbers above this are read as spreadsheet serial dates.
pub const SERIAL_DATE_THRESHOLD: f64 = 1000.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
const TRUTHY_TOKENS: &[&str] = &["true", "yes", "1", "y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y", "%Y년 %m월 %d일"];

pub fn convert_value(raw: &Value, target: ColumnType) -> Value {
    if is_blank(raw) {
        return Value::Null;
    }
    match try_convert(raw, target) {
        Ok(converted) => converted,
        Err(err) => {
            warn!("Could not convert {raw} to {target}: {err:#}");
            Value::Null
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

pub fn try_convert(raw: &Value, target: ColumnType) -> Result<Value> {
    let converted = match target {
        ColumnType::String => Value::String(stringify(raw)),
        ColumnType::Number => match raw {
            Value::Number(_) => raw.clone(),
            other => number_value(parse_number(other)?)?,
        },
        ColumnType::Date => Value::String(format_iso(parse_date(raw)?)),
        ColumnType::Boolean => Value::Bool(parse_boolean(raw)),
        ColumnType::Array => match raw {
            Value::Array(_) => raw.clone(),
            other => Value::Array(vec![other.clone()]),
        },
        ColumnType::Object => parse_object(raw),
    };
    Ok(converted)
}

/// Renders a value the way a spreadsheet cell would show it.
///
/// Integral floats lose their trailing `.0`, arrays are comma-joined, and
/// objects are written as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => format_number(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(stringify).join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn format_number(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() <= MAX_SAFE_INTEGER => {
            (float as i64).to_string()
        }
        _ => number.to_string(),
    }
}

pub fn parse_number(raw: &Value) -> Result<f64> {
    match raw {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| anyhow!("{number} is outside the f64 range")),
        Value::Bool(flag) => Ok(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => parse_numeric_text(text),
        other => bail!("{} cannot be read as a number", json_kind(other)),
    }
}

/// Parses decimal text, tolerating surrounding whitespace and `,` grouping.
pub fn parse_numeric_text(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    ensure!(!trimmed.is_empty(), "blank text is not a number");
    let parsed = trimmed
        .parse::<f64>()
        .or_else(|_| trimmed.replace(',', "").parse::<f64>())
        .with_context(|| format!("'{text}' is not a number"))?;
    ensure!(parsed.is_finite(), "'{text}' is not a finite number");
    Ok(parsed)
}

/// Emits integral values as JSON integers so `2500` stays `2500`, not `2500.0`.
pub fn number_value(value: f64) -> Result<Value> {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        return Ok(Value::from(value as i64));
    }
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| anyhow!("{value} is not representable in JSON"))
}

pub fn parse_date(raw: &Value) -> Result<DateTime<Utc>> {
    match raw {
        Value::Number(number) => {
            let value = number
                .as_f64()
                .ok_or_else(|| anyhow!("{number} is outside the f64 range"))?;
            if value > SERIAL_DATE_THRESHOLD {
                from_serial_date(value)
            } else {
                DateTime::from_timestamp_millis(value.trunc() as i64)
                    .ok_or_else(|| anyhow!("{value} is outside the supported date range"))
            }
        }
        Value::String(text) => parse_date_text(text),
        other => bail!("{} cannot be read as a date", json_kind(other)),
    }
}

/// Decodes a spreadsheet serial date.
///
/// Day 1 is 1900-01-01 and the format counts a 29 February 1900 that never
/// existed, so modern serials sit two days past `1900-01-01 + serial`.
/// Serials before 1900-03-01 come out one day early, exactly as existing
/// imports recorded them. Fractions carry the time of day.
pub fn from_serial_date(serial: f64) -> Result<DateTime<Utc>> {
    let epoch = NaiveDate::from_ymd_opt(1900, 1, 1)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .ok_or_else(|| anyhow!("serial date epoch is invalid"))?;
    let offset_millis = ((serial - 2.0) * MILLIS_PER_DAY).trunc();
    TimeDelta::try_milliseconds(offset_millis as i64)
        .and_then(|offset| epoch.checked_add_signed(offset))
        .ok_or_else(|| anyhow!("serial date {serial} is outside the supported range"))
}

pub fn parse_date_text(text: &str) -> Result<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(parsed.and_time(NaiveTime::MIN).and_utc());
        }
    }
    bail!("'{text}' is not a recognised date")
}

pub fn format_iso(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_boolean(raw: &Value) -> bool {
    match raw {
        Value::Bool(flag) => *flag,
        other => {
            let lowered = stringify(other).to_lowercase();
            TRUTHY_TOKENS.contains(&lowered.as_str())
        }
    }
}

/// Objects pass through. Anything else is read as JSON text (scalars through
/// their cell form) and kept as parsed, or wrapped as `{"raw": value}` when it
/// does not parse.
fn parse_object(raw: &Value) -> Value {
    let parsed = match raw {
        Value::Object(_) => return raw.clone(),
        Value::String(text) => serde_json::from_str::<Value>(text),
        other => serde_json::from_str::<Value>(&stringify(other)),
    };
    parsed.unwrap_or_else(|_| wrap_raw(raw))
}

fn wrap_raw(value: &Value) -> Value {
    let mut wrapped = Map::new();
    wrapped.insert("raw".to_string(), value.clone());
    Value::Object(wrapped)
}
