//! Normalization orchestrator.
//!
//! Ties the stages together: array-column merge, domain detection, column
//! mapping, per-column conversion, derived fields, and quality scoring. The
//! engine holds no state between calls and never mutates its input.

use std::ops::Index;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::{
    convert::{convert_value, format_iso},
    derive::{DerivedColumn, apply_derived_columns, apply_domain_rules},
    detect::detect_data_type,
    mapping::{ColumnMapping, auto_map_columns},
    merge::merge_array_columns,
    quality::{NEUTRAL_SCORE, calculate_quality_score},
    record::{NormalizedRecord, ORIGINAL_KEY, RawRecord},
    schema::{DataSchema, DomainType, get_schema},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationMetadata {
    pub total_records: usize,
    pub normalized_at: String,
    pub column_mappings: ColumnMapping,
    pub quality_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedData {
    pub schema_type: String,
    pub original_columns: Vec<String>,
    pub mapped_data: Vec<NormalizedRecord>,
    pub metadata: NormalizationMetadata,
}

/// Extra knobs on top of the built-in behaviour.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Evaluated per record, in order, after the domain rules.
    pub derived_columns: Vec<DerivedColumn>,
}

/// One labelled input for [`normalize_multiple_datasets`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetInput {
    pub raw_data: Vec<RawRecord>,
    pub data_type: String,
}

impl DatasetInput {
    pub fn new(raw_data: Vec<RawRecord>, data_type: impl Into<String>) -> Self {
        DatasetInput {
            raw_data,
            data_type: data_type.into(),
        }
    }
}

pub fn normalize_data(raw_records: &[RawRecord], label: &str) -> NormalizedData {
    normalize_data_with_options(raw_records, label, &NormalizeOptions::default())
}

pub fn normalize_data_with_options(
    raw_records: &[RawRecord],
    label: &str,
    options: &NormalizeOptions,
) -> NormalizedData {
    let started = Utc::now();
    if raw_records.is_empty() {
        info!("No records to normalize for '{label}'");
        return NormalizedData {
            schema_type: label.to_string(),
            original_columns: Vec::new(),
            mapped_data: Vec::new(),
            metadata: NormalizationMetadata {
                total_records: 0,
                normalized_at: format_iso(started),
                column_mappings: ColumnMapping::new(),
                quality_score: 0.0,
            },
        };
    }

    let merged = merge_array_columns(raw_records);
    let original_columns = merged
        .first()
        .map(|record| record.keys().cloned().collect::<Vec<_>>())
        .unwrap_or_default();
    let domain = detect_data_type(label);

    let Some(schema) = get_schema(domain) else {
        warn!(
            "Label '{label}' matches no known domain; passing {} record(s) through unchanged",
            merged.len()
        );
        let mut mapped_data = merged;
        if !options.derived_columns.is_empty() {
            for (index, record) in mapped_data.iter_mut().enumerate() {
                apply_derived_columns(&options.derived_columns, record, index);
            }
        }
        return NormalizedData {
            schema_type: DomainType::Other.to_string(),
            original_columns,
            metadata: NormalizationMetadata {
                total_records: mapped_data.len(),
                normalized_at: format_iso(started),
                column_mappings: ColumnMapping::new(),
                quality_score: NEUTRAL_SCORE,
            },
            mapped_data,
        };
    };

    let column_mappings = auto_map_columns(&original_columns, schema);
    let mapped_data = merged
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            normalize_record(record, index, schema, &column_mappings, options, started)
        })
        .collect::<Vec<_>>();
    let quality_score = calculate_quality_score(schema, &column_mappings);

    info!(
        "Normalized {} record(s) as '{domain}': {} of {} column(s) mapped, quality {:.2}",
        mapped_data.len(),
        column_mappings.len(),
        schema.columns.len(),
        quality_score
    );

    NormalizedData {
        schema_type: domain.to_string(),
        original_columns,
        metadata: NormalizationMetadata {
            total_records: mapped_data.len(),
            normalized_at: format_iso(started),
            column_mappings,
            quality_score,
        },
        mapped_data,
    }
}

fn normalize_record(
    record: RawRecord,
    index: usize,
    schema: &DataSchema,
    mapping: &ColumnMapping,
    options: &NormalizeOptions,
    started: DateTime<Utc>,
) -> NormalizedRecord {
    let mut normalized = NormalizedRecord::new();
    for column in schema.columns {
        let Some(raw_column) = mapping.get(column.name) else {
            continue;
        };
        let raw = record.get(raw_column).unwrap_or(&Value::Null);
        normalized.insert(
            column.name.to_string(),
            convert_value(raw, column.column_type),
        );
    }
    apply_domain_rules(schema.domain, &mut normalized, index, started.timestamp_millis());
    apply_derived_columns(&options.derived_columns, &mut normalized, index);
    normalized.insert(ORIGINAL_KEY.to_string(), Value::Object(record));
    normalized
}

/// Results of [`normalize_multiple_datasets`] in input order.
///
/// Serializes as a JSON object whose keys follow the order of the inputs, so
/// `dataset_2_x` comes before `dataset_10_x`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedDatasets(Vec<(String, NormalizedData)>);

impl NormalizedDatasets {
    pub fn get(&self, key: &str) -> Option<&NormalizedData> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, data)| data)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NormalizedData)> {
        self.0.iter().map(|(name, data)| (name.as_str(), data))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<&str> for NormalizedDatasets {
    type Output = NormalizedData;

    fn index(&self, key: &str) -> &NormalizedData {
        match self.get(key) {
            Some(data) => data,
            None => panic!("no dataset named '{key}'"),
        }
    }
}

impl Serialize for NormalizedDatasets {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

/// Normalizes each dataset independently, keyed `dataset_<index>_<data_type>`.
pub fn normalize_multiple_datasets(datasets: &[DatasetInput]) -> NormalizedDatasets {
    NormalizedDatasets(
        datasets
            .iter()
            .enumerate()
            .map(|(index, dataset)| {
                (
                    format!("dataset_{index}_{}", dataset.data_type),
                    normalize_data(&dataset.raw_data, &dataset.data_type),
                )
            })
            .collect(),
    )
}
