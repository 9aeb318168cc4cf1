//! Record types shared by every stage of the engine.

use serde_json::{Map, Value};

use crate::error::{NormalizeError, Result, json_kind};

/// One ingested row or object. Key order is preserved.
pub type RawRecord = Map<String, Value>;

/// Canonical column values plus the [`ORIGINAL_KEY`] audit copy.
pub type NormalizedRecord = Map<String, Value>;

/// Reserved key holding the post-array-merge input of a normalized record.
pub const ORIGINAL_KEY: &str = "_original";

/// Turns a decoded JSON document into records.
///
/// Accepts an array of objects or a single object. Anything else is a
/// caller-contract violation.
pub fn records_from_json(document: Value) -> Result<Vec<RawRecord>> {
    match document {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(NormalizeError::NonObjectRecord {
                    index,
                    found: json_kind(&other),
                }),
            })
            .collect(),
        Value::Object(map) => Ok(vec![map]),
        other => Err(NormalizeError::UnexpectedTopLevel(json_kind(&other))),
    }
}
