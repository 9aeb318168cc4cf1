//! Reconstruction of list-valued fields from flattened `field[index]` keys.
//!
//! Spreadsheet and CSV exports flatten arrays into one column per element
//! (`zones[0]`, `zones[1]`, ...). This pre-pass folds them back into a single
//! `zones` array per record before any mapping happens.

use std::{
    collections::BTreeMap,
    sync::LazyLock,
};

use log::debug;
use regex::Regex;
use serde_json::Value;

use crate::record::RawRecord;

static ARRAY_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\[(\d+)\]$").expect("array key pattern is valid"));

/// Splits `zones[3]` into `("zones", 3)`.
pub fn parse_array_key(key: &str) -> Option<(&str, u64)> {
    let captures = ARRAY_KEY.captures(key)?;
    let field = captures.get(1)?.as_str();
    let index = captures.get(2)?.as_str().parse::<u64>().ok()?;
    Some((field, index))
}

/// Folds indexed keys of one record into arrays.
///
/// Elements are ordered by index and missing indices are skipped rather than
/// filled with `null`. Keys without an index pass through in their original
/// order; merged arrays follow them. A plain key sharing a merged field's name
/// keeps its position but takes the array as its value.
pub fn merge_record(record: &RawRecord) -> RawRecord {
    let mut merged = RawRecord::new();
    let mut arrays: BTreeMap<&str, BTreeMap<u64, &Value>> = BTreeMap::new();
    let mut field_order: Vec<&str> = Vec::new();

    for (key, value) in record {
        match parse_array_key(key) {
            Some((field, index)) => {
                let slots = arrays.entry(field).or_insert_with(|| {
                    field_order.push(field);
                    BTreeMap::new()
                });
                slots.insert(index, value);
            }
            None => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }

    for field in field_order {
        if let Some(slots) = arrays.remove(field) {
            debug!("Merged {} indexed column(s) into '{field}'", slots.len());
            let values = slots.into_values().cloned().collect::<Vec<_>>();
            merged.insert(field.to_string(), Value::Array(values));
        }
    }
    merged
}

pub fn merge_array_columns(records: &[RawRecord]) -> Vec<RawRecord> {
    records.iter().map(merge_record).collect()
}
