//! Quality score: the share of important schema columns that were mapped.

use crate::{mapping::ColumnMapping, schema::DataSchema};

/// Optional columns that still count toward quality when a schema has them.
pub const IMPORTANT_OPTIONAL_COLUMNS: [&str; 4] =
    ["timestamp", "product_category", "total_amount", "discount"];

/// Score returned when a schema has no important columns at all.
pub const NEUTRAL_SCORE: f64 = 0.5;

pub fn important_columns(schema: &DataSchema) -> Vec<&'static str> {
    schema
        .columns
        .iter()
        .filter(|column| column.required || IMPORTANT_OPTIONAL_COLUMNS.contains(&column.name))
        .map(|column| column.name)
        .collect()
}

pub fn calculate_quality_score(schema: &DataSchema, mapping: &ColumnMapping) -> f64 {
    let important = important_columns(schema);
    if important.is_empty() {
        return NEUTRAL_SCORE;
    }
    let mapped = important
        .iter()
        .filter(|name| mapping.contains_key(**name))
        .count();
    mapped as f64 / important.len() as f64
}
