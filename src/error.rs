use thiserror::Error;

/// Caller-contract violations raised at the edges of the engine.
///
/// Data-quality problems never surface here: malformed values degrade to
/// `null`, unknown labels fall back to pass-through, and empty input yields an
/// empty result.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("record {index} is {found}, expected a JSON object")]
    NonObjectRecord { index: usize, found: &'static str },
    #[error("input must be a JSON array of objects or a single object, found {0}")]
    UnexpectedTopLevel(&'static str),
    #[error("unknown domain '{0}' (expected one of: sales, zone, traffic, product, customer, inventory)")]
    UnknownDomain(String),
    #[error("derived column '{spec}' is invalid: {reason}")]
    InvalidDerivedColumn { spec: String, reason: &'static str },
}

pub type Result<T, E = NormalizeError> = std::result::Result<T, E>;

/// Human-readable JSON kind, used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
