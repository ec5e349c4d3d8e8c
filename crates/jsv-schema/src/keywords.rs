//! # Recognized Keywords
//!
//! The keyword subset understood by the validator. Anything outside this
//! table is ignored by `validate` and reported by `check`.

use serde_json::Value;

/// Keywords with validation semantics.
pub const VALIDATION_KEYWORDS: &[&str] = &[
    "type",
    "enum",
    "const",
    "properties",
    "required",
    "additionalProperties",
    "items",
    "minItems",
    "maxItems",
    "minLength",
    "maxLength",
    "pattern",
    "format",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
];

/// Keywords accepted without any validation effect.
pub const ANNOTATION_KEYWORDS: &[&str] = &[
    "$schema",
    "$id",
    "$comment",
    "title",
    "description",
    "default",
    "examples",
];

/// Type names valid inside the `type` keyword.
pub const TYPE_NAMES: &[&str] = &[
    "null", "boolean", "object", "array", "number", "integer", "string",
];

/// Whether `keyword` is part of the supported subset.
pub fn is_recognized(keyword: &str) -> bool {
    VALIDATION_KEYWORDS.contains(&keyword) || ANNOTATION_KEYWORDS.contains(&keyword)
}

/// JSON kind name of a value, as used in messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether `value` is an instance of the JSON Schema type `name`.
///
/// `integer` accepts any number with a zero fractional part, so `1.0`
/// qualifies. Unknown type names match nothing.
pub fn matches_type(value: &Value, name: &str) -> bool {
    match (name, value) {
        ("null", Value::Null) => true,
        ("boolean", Value::Bool(_)) => true,
        ("object", Value::Object(_)) => true,
        ("array", Value::Array(_)) => true,
        ("string", Value::String(_)) => true,
        ("number", Value::Number(_)) => true,
        ("integer", Value::Number(n)) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

/// Read a non-negative integer keyword value (`minLength: 3`, `3.0` too).
pub fn as_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}
