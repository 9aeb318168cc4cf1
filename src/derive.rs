//! Derived fields computed after per-column conversion.
//!
//! Built-in rules depend on the detected domain. Callers may add their own
//! `name=expression` columns; expressions are evaluated with `evalexpr`
//! against the already-normalized values of the record.

use anyhow::{Context, Result, anyhow};
use evalexpr::{ContextWithMutableVariables, HashMapContext, Value as EvalValue, eval_with_context};
use log::warn;
use serde_json::Value;

use crate::{
    convert::number_value,
    error::NormalizeError,
    record::{NormalizedRecord, ORIGINAL_KEY},
    schema::DomainType,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedColumn {
    pub name: String,
    pub expression: String,
}

impl DerivedColumn {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        DerivedColumn {
            name: name.into(),
            expression: expression.into(),
        }
    }

    /// Parses `name=expression`.
    pub fn parse(spec: &str) -> Result<Self, NormalizeError> {
        let invalid = |reason| NormalizeError::InvalidDerivedColumn {
            spec: spec.to_string(),
            reason,
        };
        let (name, expression) = spec.split_once('=').ok_or_else(|| invalid("expected name=expression"))?;
        let name = name.trim();
        let expression = expression.trim();
        if name.is_empty() {
            return Err(invalid("missing column name"));
        }
        if name == ORIGINAL_KEY {
            return Err(invalid("the _original column is reserved"));
        }
        if expression.is_empty() {
            return Err(invalid("missing expression"));
        }
        Ok(DerivedColumn::new(name, expression))
    }

    /// Evaluates the expression with every scalar field of `record` bound by
    /// name. Arrays, objects, nulls, and the audit copy are not bound.
    pub fn evaluate(&self, record: &NormalizedRecord) -> Result<Value> {
        let mut context: HashMapContext = HashMapContext::new();
        for (key, value) in record {
            if key == ORIGINAL_KEY {
                continue;
            }
            if let Some(bound) = json_to_eval(value) {
                context
                    .set_value(key.clone(), bound)
                    .with_context(|| format!("Binding column '{key}'"))?;
            }
        }
        let result = eval_with_context(&self.expression, &context)
            .with_context(|| format!("Evaluating expression for column '{}'", self.name))?;
        eval_to_json(result)
    }
}

pub fn parse_derived_columns(specs: &[String]) -> Result<Vec<DerivedColumn>, NormalizeError> {
    specs.iter().map(|spec| DerivedColumn::parse(spec)).collect()
}

fn json_to_eval(value: &Value) -> Option<EvalValue> {
    match value {
        Value::Bool(flag) => Some(EvalValue::Boolean(*flag)),
        Value::Number(number) => number
            .as_i64()
            .map(EvalValue::Int)
            .or_else(|| number.as_f64().map(EvalValue::Float)),
        Value::String(text) => Some(EvalValue::String(text.clone())),
        _ => None,
    }
}

fn eval_to_json(value: EvalValue) -> Result<Value> {
    let converted = match value {
        EvalValue::String(text) => Value::String(text),
        EvalValue::Int(int) => Value::from(int),
        EvalValue::Float(float) => number_value(float)?,
        EvalValue::Boolean(flag) => Value::Bool(flag),
        EvalValue::Tuple(values) => Value::Array(
            values
                .into_iter()
                .map(eval_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        EvalValue::Empty => Value::Null,
    };
    Ok(converted)
}

/// Integer operands multiply exactly; a product outside `i64` falls back to
/// floating point.
fn multiply(left: &Value, right: &Value) -> Result<Value> {
    let exact = match (left.as_i64(), right.as_i64()) {
        (Some(a), Some(b)) => a.checked_mul(b),
        _ => None,
    };
    if let Some(product) = exact {
        return Ok(Value::from(product));
    }
    let a = left.as_f64().ok_or_else(|| anyhow!("{left} is not a number"))?;
    let b = right.as_f64().ok_or_else(|| anyhow!("{right} is not a number"))?;
    number_value(a * b)
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => !flag,
        Some(Value::Number(number)) => number.as_f64() == Some(0.0),
        other => is_missing(other),
    }
}

/// Applies the built-in derived fields of `domain` to one record.
///
/// `batch_millis` and `index` seed synthesized sales transaction ids, which
/// are unique within one batch but may repeat across batches started in the
/// same millisecond.
pub fn apply_domain_rules(
    domain: DomainType,
    record: &mut NormalizedRecord,
    index: usize,
    batch_millis: i64,
) {
    match domain {
        DomainType::Sales => {
            if is_missing(record.get("transaction_id")) {
                record.insert(
                    "transaction_id".to_string(),
                    Value::String(format!("TXN_{batch_millis}_{index}")),
                );
            }
            let price = record.get("price");
            let quantity = record.get("quantity");
            if is_falsy(record.get("total_amount")) && !is_missing(price) && !is_missing(quantity) {
                let total = match (price, quantity) {
                    (Some(price), Some(quantity)) => multiply(price, quantity),
                    _ => Err(anyhow!("price or quantity is missing")),
                };
                match total {
                    Ok(total) => {
                        record.insert("total_amount".to_string(), total);
                    }
                    Err(err) => warn!("Record {index}: could not derive total_amount: {err:#}"),
                }
            }
        }
        DomainType::Zone
        | DomainType::Traffic
        | DomainType::Product
        | DomainType::Customer
        | DomainType::Inventory
        | DomainType::Other => {}
    }
}

/// Applies caller-supplied derived columns in order; later columns can read
/// earlier ones. A failing expression yields `null` for that column.
pub fn apply_derived_columns(columns: &[DerivedColumn], record: &mut NormalizedRecord, index: usize) {
    for column in columns {
        let value = column.evaluate(record).unwrap_or_else(|err| {
            warn!("Record {index}: {err:#}");
            Value::Null
        });
        record.insert(column.name.clone(), value);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> NormalizedRecord {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn parse_splits_name_and_expression() {
        let column = DerivedColumn::parse("margin = price - cost").unwrap();
        assert_eq!(column, DerivedColumn::new("margin", "price - cost"));
    }

    #[test]
    fn parse_rejects_malformed_specs() {
        for spec in ["no_equals", "=price", "margin=", "_original=1"] {
            assert!(
                matches!(
                    DerivedColumn::parse(spec),
                    Err(NormalizeError::InvalidDerivedColumn { .. })
                ),
                "{spec}"
            );
        }
    }

    #[test]
    fn sales_total_is_price_times_quantity() {
        let mut sales = record(json!({"price": 2500, "quantity": 3}));
        apply_domain_rules(DomainType::Sales, &mut sales, 0, 1_700_000_000_000);
        assert_eq!(sales["total_amount"], json!(7500));
        assert_eq!(sales["transaction_id"], json!("TXN_1700000000000_0"));
    }

    #[test]
    fn sales_total_handles_fractional_prices() {
        let mut sales = record(json!({"price": 1.5, "quantity": 3, "total_amount": null}));
        apply_domain_rules(DomainType::Sales, &mut sales, 4, 1);
        assert_eq!(sales["total_amount"], json!(4.5));
        assert_eq!(sales["transaction_id"], json!("TXN_1_4"));
    }

    #[test]
    fn sales_total_falls_back_to_float_on_integer_overflow() {
        let mut sales = record(json!({"price": 10_000_000_000i64, "quantity": 10_000_000_000i64}));
        apply_domain_rules(DomainType::Sales, &mut sales, 0, 1);
        assert_eq!(sales["total_amount"], json!(1.0e20));

        let mut sales = record(json!({"price": i64::MAX, "quantity": 2}));
        apply_domain_rules(DomainType::Sales, &mut sales, 0, 1);
        assert!(sales["total_amount"].as_f64().is_some_and(|total| total > 1.8e19));
    }

    #[test]
    fn existing_values_are_kept() {
        let mut sales = record(json!({
            "transaction_id": "T-9",
            "price": 10,
            "quantity": 2,
            "total_amount": 18
        }));
        apply_domain_rules(DomainType::Sales, &mut sales, 0, 1);
        assert_eq!(sales["transaction_id"], json!("T-9"));
        assert_eq!(sales["total_amount"], json!(18));
    }

    #[test]
    fn zero_total_is_recomputed() {
        let mut sales = record(json!({"price": 10, "quantity": 2, "total_amount": 0}));
        apply_domain_rules(DomainType::Sales, &mut sales, 0, 1);
        assert_eq!(sales["total_amount"], json!(20));
    }

    #[test]
    fn total_needs_both_operands() {
        let mut sales = record(json!({"price": 10, "quantity": null}));
        apply_domain_rules(DomainType::Sales, &mut sales, 0, 1);
        assert!(!sales.contains_key("total_amount"));
    }

    #[test]
    fn other_domains_are_untouched() {
        let original = record(json!({"price": 10, "quantity": 2}));
        let mut product = original.clone();
        apply_domain_rules(DomainType::Product, &mut product, 0, 1);
        assert_eq!(product, original);
    }

    #[test]
    fn custom_columns_chain_and_fail_soft() {
        let columns = vec![
            DerivedColumn::new("margin", "price - cost"),
            DerivedColumn::new("margin_rate", "margin / price"),
            DerivedColumn::new("broken", "price +"),
        ];
        let mut product = record(json!({"price": 200.0, "cost": 150, "_original": {"price": "x"}}));
        apply_derived_columns(&columns, &mut product, 0);
        assert_eq!(product["margin"], json!(50));
        assert_eq!(product["margin_rate"], json!(0.25));
        assert_eq!(product["broken"], Value::Null);
    }
}
