//! Automatic mapping of raw column names onto canonical schema columns.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::{keywords::similarity_ratio, schema::DataSchema};

/// Canonical column name to the raw column chosen for it.
pub type ColumnMapping = BTreeMap<String, String>;

/// Minimum similarity a candidate must exceed to be accepted.
pub const MIN_MATCH_SCORE: f64 = 0.3;

/// Best raw candidate found for one schema column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMatch {
    pub column: &'static str,
    pub candidate: Option<String>,
    pub score: f64,
}

impl ColumnMatch {
    pub fn is_accepted(&self) -> bool {
        self.candidate.is_some() && self.score > MIN_MATCH_SCORE
    }
}

/// Scores every raw column against each schema column, keeping the best.
///
/// Schema columns are visited in declaration order. Candidates are ranked on
/// the unclamped ratio and a tie keeps the raw column that appears first; the
/// reported score is clamped to 1. Raw columns may win for several schema
/// columns.
pub fn score_columns(raw_columns: &[String], schema: &DataSchema) -> Vec<ColumnMatch> {
    schema
        .columns
        .iter()
        .map(|column| {
            let search_text = column.search_text();
            let mut best: Option<&String> = None;
            let mut best_ratio = 0.0_f64;
            for raw in raw_columns {
                let ratio = similarity_ratio(raw, &search_text);
                if ratio > best_ratio {
                    best = Some(raw);
                    best_ratio = ratio;
                }
            }
            ColumnMatch {
                column: column.name,
                candidate: best.cloned(),
                score: best_ratio.min(1.0),
            }
        })
        .collect()
}

pub fn auto_map_columns(raw_columns: &[String], schema: &DataSchema) -> ColumnMapping {
    mapping_from_matches(&score_columns(raw_columns, schema))
}

/// Keeps the accepted candidates of `matches`.
pub fn mapping_from_matches(matches: &[ColumnMatch]) -> ColumnMapping {
    let mut mapping = ColumnMapping::new();
    for matched in matches {
        match &matched.candidate {
            Some(raw) if matched.is_accepted() => {
                debug!(
                    "Mapped '{}' -> '{}' (score {:.3})",
                    matched.column, raw, matched.score
                );
                mapping.insert(matched.column.to_string(), raw.clone());
            }
            Some(raw) => {
                debug!(
                    "Rejected '{}' -> '{}' (score {:.3} <= {MIN_MATCH_SCORE})",
                    matched.column, raw, matched.score
                );
            }
            None => debug!("No candidate for '{}'", matched.column),
        }
    }
    mapping
}
