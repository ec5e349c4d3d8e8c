//! # Schema Validation
//!
//! Recursive validation of a JSON instance against a schema written in
//! the Draft-7 keyword subset listed in [`keywords`](crate::keywords).
//!
//! ## Error Accumulation
//!
//! Violations are data, not control flow. Every failing keyword at a node
//! records its own [`ValidationError`](crate::ValidationError); the only
//! short-circuit is the `type` gate, which skips the remaining keywords of
//! that node once the instance kind is wrong. A node's own errors are
//! recorded before any error from its children, and children are visited
//! in instance order, so a given (instance, schema) pair always yields the
//! same errors in the same order.
//!
//! ## Purity
//!
//! `validate` never mutates the instance or the schema. Each call owns a
//! fresh [`ErrorCollector`] and threads an immutable
//! [`InstancePath`](crate::pointer::InstancePath) through the recursion,
//! so one validator can be shared by every batch worker.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use fancy_regex::Regex;
use parking_lot::RwLock;
use serde_json::{Map, Number, Value};

use crate::ecma::compile_pattern;
use crate::error::{ErrorCollector, ValidationResult};
use crate::format::{FormatCheck, FormatRegistry};
use crate::keywords::{as_count, kind_of, matches_type};
use crate::pointer::InstancePath;

/// Behaviour switches for [`SchemaValidator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Treat `format` names missing from the registry as violations
    /// instead of annotation-only passes.
    pub strict_formats: bool,
}

/// Validates instances against schemas using a [`FormatRegistry`].
///
/// `SchemaValidator` is `Send + Sync`. Compiled `pattern` regexes are
/// cached by source text and shared between calls.
#[derive(Debug)]
pub struct SchemaValidator {
    formats: FormatRegistry,
    options: ValidatorOptions,
    patterns: RwLock<HashMap<String, Result<Arc<Regex>, String>>>,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new(FormatRegistry::with_builtins())
    }
}

impl SchemaValidator {
    /// Create a validator with default options.
    pub fn new(formats: FormatRegistry) -> Self {
        Self::with_options(formats, ValidatorOptions::default())
    }

    pub fn with_options(formats: FormatRegistry, options: ValidatorOptions) -> Self {
        Self {
            formats,
            options,
            patterns: RwLock::new(HashMap::new()),
        }
    }

    /// Validate `instance` against `schema`.
    ///
    /// Never fails: every rule violation becomes an entry of the returned
    /// [`ValidationResult`].
    pub fn validate(&self, instance: &Value, schema: &Value) -> ValidationResult {
        let mut collector = ErrorCollector::new();
        self.validate_node(instance, schema, &InstancePath::Root, &mut collector);
        collector.into_result()
    }

    fn validate_node(
        &self,
        instance: &Value,
        schema: &Value,
        path: &InstancePath<'_>,
        out: &mut ErrorCollector,
    ) {
        let rules = match schema {
            Value::Object(rules) => rules,
            Value::Bool(true) => return,
            Value::Bool(false) => {
                out.push(path.to_tokens(), "false", "no value is allowed here");
                return;
            }
            // Not a schema; nothing to enforce.
            _ => return,
        };

        if let Some(expected) = rules.get("type") {
            if !self.check_type(instance, expected, path, out) {
                return;
            }
        }

        if let Some(allowed) = rules.get("enum").and_then(Value::as_array) {
            if !allowed.iter().any(|candidate| json_equal(candidate, instance)) {
                out.push(
                    path.to_tokens(),
                    "enum",
                    format!("{} is not one of the allowed values", preview(instance)),
                );
            }
        }

        if let Some(expected) = rules.get("const") {
            if !json_equal(expected, instance) {
                out.push(
                    path.to_tokens(),
                    "const",
                    format!("{} does not equal the constant {}", preview(instance), preview(expected)),
                );
            }
        }

        match instance {
            Value::Object(members) => self.validate_object(members, rules, path, out),
            Value::Array(elements) => self.validate_array(elements, rules, path, out),
            Value::String(text) => self.validate_string(text, rules, path, out),
            Value::Number(number) => validate_number(number, rules, path, out),
            Value::Null | Value::Bool(_) => {}
        }
    }

    /// Returns false when the type gate closes.
    fn check_type(
        &self,
        instance: &Value,
        expected: &Value,
        path: &InstancePath<'_>,
        out: &mut ErrorCollector,
    ) -> bool {
        let names: Vec<&str> = match expected {
            Value::String(name) => vec![name.as_str()],
            Value::Array(names) => names.iter().filter_map(Value::as_str).collect(),
            _ => return true,
        };
        if names.is_empty() || names.iter().any(|name| matches_type(instance, name)) {
            return true;
        }

        let found = kind_of(instance);
        let message = match names.as_slice() {
            [single] => format!("expected {single}, found {found}"),
            many => format!("expected one of [{}], found {found}", many.join(", ")),
        };
        out.push(path.to_tokens(), "type", message);
        false
    }

    fn validate_object(
        &self,
        members: &Map<String, Value>,
        rules: &Map<String, Value>,
        path: &InstancePath<'_>,
        out: &mut ErrorCollector,
    ) {
        let properties = rules.get("properties").and_then(Value::as_object);
        let additional = rules.get("additionalProperties");

        if let Some(required) = rules.get("required").and_then(Value::as_array) {
            for name in required.iter().filter_map(Value::as_str) {
                if !members.contains_key(name) {
                    out.push(
                        path.to_tokens(),
                        "required",
                        format!("missing required property \"{name}\""),
                    );
                }
            }
        }

        if let Some(Value::Bool(false)) = additional {
            for key in members.keys() {
                if !properties.is_some_and(|declared| declared.contains_key(key)) {
                    out.push(
                        path.to_tokens(),
                        "additionalProperties",
                        format!("additional property \"{key}\" is not allowed"),
                    );
                }
            }
        }

        for (key, value) in members {
            let child = path.key(key);
            if let Some(subschema) = properties.and_then(|declared| declared.get(key)) {
                self.validate_node(value, subschema, &child, out);
            } else if let Some(subschema @ Value::Object(_)) = additional {
                self.validate_node(value, subschema, &child, out);
            }
        }
    }

    fn validate_array(
        &self,
        elements: &[Value],
        rules: &Map<String, Value>,
        path: &InstancePath<'_>,
        out: &mut ErrorCollector,
    ) {
        let len = elements.len() as u64;

        if let Some(min) = rules.get("minItems").and_then(as_count) {
            if len < min {
                out.push(
                    path.to_tokens(),
                    "minItems",
                    format!("array has {len} item(s), fewer than the minimum of {min}"),
                );
            }
        }

        if let Some(max) = rules.get("maxItems").and_then(as_count) {
            if len > max {
                out.push(
                    path.to_tokens(),
                    "maxItems",
                    format!("array has {len} item(s), more than the maximum of {max}"),
                );
            }
        }

        if let Some(items @ (Value::Object(_) | Value::Bool(_))) = rules.get("items") {
            for (index, element) in elements.iter().enumerate() {
                let child = path.index(index);
                self.validate_node(element, items, &child, out);
            }
        }
    }

    fn validate_string(
        &self,
        text: &str,
        rules: &Map<String, Value>,
        path: &InstancePath<'_>,
        out: &mut ErrorCollector,
    ) {
        let length = text.chars().count() as u64;

        if let Some(min) = rules.get("minLength").and_then(as_count) {
            if length < min {
                out.push(
                    path.to_tokens(),
                    "minLength",
                    format!("string length {length} is less than minLength {min}"),
                );
            }
        }

        if let Some(max) = rules.get("maxLength").and_then(as_count) {
            if length > max {
                out.push(
                    path.to_tokens(),
                    "maxLength",
                    format!("string length {length} is greater than maxLength {max}"),
                );
            }
        }

        if let Some(pattern) = rules.get("pattern").and_then(Value::as_str) {
            let outcome = self
                .compiled_pattern(pattern)
                .and_then(|regex| regex.is_match(text).map_err(|e| e.to_string()));
            match outcome {
                Ok(true) => {}
                Ok(false) => out.push(
                    path.to_tokens(),
                    "pattern",
                    format!("\"{text}\" does not match pattern \"{pattern}\""),
                ),
                Err(reason) => out.push(
                    path.to_tokens(),
                    "pattern",
                    format!("pattern \"{pattern}\" cannot be applied: {reason}"),
                ),
            }
        }

        if let Some(format) = rules.get("format").and_then(Value::as_str) {
            match self.formats.check(format, text) {
                FormatCheck::Valid => {}
                FormatCheck::Invalid => out.push(
                    path.to_tokens(),
                    "format",
                    format!("\"{text}\" is not a valid {format}"),
                ),
                FormatCheck::Unknown if self.options.strict_formats => out.push(
                    path.to_tokens(),
                    "format",
                    format!("unknown format \"{format}\""),
                ),
                FormatCheck::Unknown => {}
            }
        }
    }

    /// Compile `pattern` once. Compile failures are cached too, so every
    /// string checked against a broken pattern fails the same way.
    fn compiled_pattern(&self, pattern: &str) -> Result<Arc<Regex>, String> {
        if let Some(cached) = self.patterns.read().get(pattern) {
            return cached.clone();
        }
        let compiled = compile_pattern(pattern).map(Arc::new).map_err(|e| {
            tracing::debug!(pattern, error = %e, "schema pattern does not compile");
            e.to_string()
        });
        self.patterns
            .write()
            .insert(pattern.to_string(), compiled.clone());
        compiled
    }
}

fn validate_number(
    number: &Number,
    rules: &Map<String, Value>,
    path: &InstancePath<'_>,
    out: &mut ErrorCollector,
) {
    let bound = |keyword: &str| match rules.get(keyword) {
        Some(Value::Number(limit)) => Some(limit),
        _ => None,
    };

    if let Some(limit) = bound("minimum") {
        if compare_numbers(number, limit) == Some(Ordering::Less) {
            out.push(
                path.to_tokens(),
                "minimum",
                format!("{number} is less than the minimum of {limit}"),
            );
        }
    }

    if let Some(limit) = bound("maximum") {
        if compare_numbers(number, limit) == Some(Ordering::Greater) {
            out.push(
                path.to_tokens(),
                "maximum",
                format!("{number} is greater than the maximum of {limit}"),
            );
        }
    }

    if let Some(limit) = bound("exclusiveMinimum") {
        if compare_numbers(number, limit) != Some(Ordering::Greater) {
            out.push(
                path.to_tokens(),
                "exclusiveMinimum",
                format!("{number} is not greater than the exclusive minimum of {limit}"),
            );
        }
    }

    if let Some(limit) = bound("exclusiveMaximum") {
        if compare_numbers(number, limit) != Some(Ordering::Less) {
            out.push(
                path.to_tokens(),
                "exclusiveMaximum",
                format!("{number} is not less than the exclusive maximum of {limit}"),
            );
        }
    }
}

/// Exact comparison for integers, `f64` otherwise.
fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

/// JSON Schema equality: numbers compare by value, so `1 == 1.0`.
fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Some(Ordering::Equal),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| json_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Compact rendering of a value for messages.
fn preview(value: &Value) -> String {
    const LIMIT: usize = 60;
    let text = value.to_string();
    if text.chars().count() <= LIMIT {
        text
    } else {
        let head: String = text.chars().take(LIMIT).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keywords(instance: Value, schema: Value) -> Vec<String> {
        SchemaValidator::default()
            .validate(&instance, &schema)
            .errors()
            .iter()
            .map(|e| e.keyword.clone())
            .collect()
    }

    #[test]
    fn integer_minimum_reports_single_error() {
        let result = SchemaValidator::default().validate(&json!(-5), &json!({"type": "integer", "minimum": 0}));
        assert!(!result.is_valid());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.errors()[0].keyword, "minimum");
        assert!(result.errors()[0].message.contains("-5"));
    }

    #[test]
    fn type_mismatch_gates_remaining_keywords() {
        let schema = json!({"type": "string", "minLength": 10, "pattern": "^a"});
        assert_eq!(keywords(json!(42), schema), vec!["type"]);
    }

    #[test]
    fn type_union_accepts_any_listed_kind() {
        let schema = json!({"type": ["string", "null"]});
        assert!(keywords(json!(null), schema.clone()).is_empty());
        assert!(keywords(json!("x"), schema.clone()).is_empty());
        let result = SchemaValidator::default().validate(&json!(1), &schema);
        assert_eq!(result.errors()[0].message, "expected one of [string, null], found number");
    }

    #[test]
    fn whole_float_is_an_integer() {
        assert!(keywords(json!(1.0), json!({"type": "integer"})).is_empty());
        assert_eq!(keywords(json!(1.5), json!({"type": "integer"})), vec!["type"]);
    }

    #[test]
    fn sibling_string_keywords_do_not_short_circuit() {
        let schema = json!({"minLength": 5, "pattern": "^[0-9]+$"});
        assert_eq!(keywords(json!("ab"), schema), vec!["minLength", "pattern"]);
    }

    #[test]
    fn length_counts_code_points() {
        let schema = json!({"maxLength": 3});
        assert!(keywords(json!("héé"), schema.clone()).is_empty());
        assert!(keywords(json!("日本語"), schema.clone()).is_empty());
        assert_eq!(keywords(json!("日本語!"), schema), vec!["maxLength"]);
    }

    #[test]
    fn pattern_is_unanchored_search() {
        assert!(keywords(json!("xxabcxx"), json!({"pattern": "abc"})).is_empty());
        assert_eq!(keywords(json!("xxabcxx"), json!({"pattern": "^abc"})), vec!["pattern"]);
    }

    #[test]
    fn uncompilable_pattern_fails_every_string() {
        assert_eq!(keywords(json!("anything"), json!({"pattern": "(unclosed"})), vec!["pattern"]);
        let result = SchemaValidator::default().validate(&json!("x"), &json!({"pattern": "(unclosed"}));
        assert!(result.errors()[0].message.contains("cannot be applied"));
    }

    #[test]
    fn pattern_follows_ecma_semantics() {
        let not_admin = json!({"pattern": "^(?!admin$)"});
        assert_eq!(keywords(json!("admin"), not_admin.clone()), vec!["pattern"]);
        assert!(keywords(json!("root"), not_admin).is_empty());

        let digits = json!({"pattern": "^\\d+$"});
        assert!(keywords(json!("2024"), digits.clone()).is_empty());
        assert_eq!(keywords(json!("١٢٣"), digits), vec!["pattern"]);
    }

    #[test]
    fn missing_required_is_reported_at_the_object() {
        let schema = json!({
            "type": "object",
            "required": ["name", "age"],
            "properties": {"name": {"type": "string"}}
        });
        let result = SchemaValidator::default().validate(&json!({}), &schema);
        assert_eq!(result.error_count(), 2);
        for error in result.errors() {
            assert_eq!(error.keyword, "required");
            assert!(error.path.is_empty());
        }
        assert!(result.errors()[0].message.contains("\"name\""));
        assert!(result.errors()[1].message.contains("\"age\""));
    }

    #[test]
    fn additional_properties_false_names_each_extra_key() {
        let schema = json!({
            "properties": {"a": {}},
            "additionalProperties": false
        });
        let result = SchemaValidator::default().validate(&json!({"a": 1, "b": 2, "c": 3}), &schema);
        let messages: Vec<&str> = result.errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "additional property \"b\" is not allowed",
                "additional property \"c\" is not allowed"
            ]
        );
    }

    #[test]
    fn additional_properties_schema_validates_extras() {
        let schema = json!({
            "properties": {"id": {"type": "integer"}},
            "additionalProperties": {"type": "string"}
        });
        let result = SchemaValidator::default().validate(&json!({"id": 1, "tag": "x", "n": 5}), &schema);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.errors()[0].pointer(), "/n");
        assert_eq!(result.errors()[0].keyword, "type");
    }

    #[test]
    fn items_extend_the_path_with_indices() {
        let schema = json!({"type": "array", "items": {"type": "object", "properties": {"v": {"minimum": 0}}}});
        let instance = json!([{"v": 1}, {"v": -1}, {"v": 3}, {"v": -2}]);
        let result = SchemaValidator::default().validate(&instance, &schema);
        let pointers: Vec<String> = result.errors().iter().map(|e| e.pointer()).collect();
        assert_eq!(pointers, vec!["/1/v", "/3/v"]);
    }

    #[test]
    fn node_errors_precede_child_errors() {
        let schema = json!({
            "type": "array",
            "minItems": 5,
            "items": {"type": "string"}
        });
        let result = SchemaValidator::default().validate(&json!(["a", 1]), &schema);
        let summary: Vec<(String, String)> = result
            .errors()
            .iter()
            .map(|e| (e.keyword.clone(), e.pointer()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("minItems".to_string(), String::new()),
                ("type".to_string(), "/1".to_string())
            ]
        );
    }

    #[test]
    fn exclusive_bounds_reject_equality() {
        let schema = json!({"exclusiveMinimum": 0, "exclusiveMaximum": 10});
        assert_eq!(keywords(json!(0), schema.clone()), vec!["exclusiveMinimum"]);
        assert_eq!(keywords(json!(10), schema.clone()), vec!["exclusiveMaximum"]);
        assert!(keywords(json!(5.5), schema).is_empty());
    }

    #[test]
    fn inclusive_bounds_accept_equality() {
        let schema = json!({"minimum": 1.5, "maximum": 3});
        assert!(keywords(json!(1.5), schema.clone()).is_empty());
        assert!(keywords(json!(3.0), schema.clone()).is_empty());
        assert_eq!(keywords(json!(3.5), schema), vec!["maximum"]);
    }

    #[test]
    fn known_format_failure_is_an_error() {
        let schema = json!({"type": "string", "format": "email"});
        assert_eq!(keywords(json!("not-an-email"), schema.clone()), vec!["format"]);
        assert!(keywords(json!("a@b.io"), schema).is_empty());
    }

    #[test]
    fn unknown_format_passes_unless_strict() {
        let schema = json!({"format": "ipv6"});
        assert!(keywords(json!("zzz"), schema.clone()).is_empty());

        let strict = SchemaValidator::with_options(
            FormatRegistry::with_builtins(),
            ValidatorOptions { strict_formats: true },
        );
        let result = strict.validate(&json!("zzz"), &schema);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.errors()[0].message, "unknown format \"ipv6\"");
    }

    #[test]
    fn isolated_registry_overrides_builtins() {
        let mut registry = FormatRegistry::empty();
        registry.register("email", |s| s.ends_with("@corp.example"));
        let validator = SchemaValidator::new(registry);
        let schema = json!({"format": "email"});
        assert!(validator.validate(&json!("x@corp.example"), &schema).is_valid());
        assert!(!validator.validate(&json!("x@gmail.com"), &schema).is_valid());
    }

    #[test]
    fn enum_and_const_compare_numbers_by_value() {
        assert!(keywords(json!(1.0), json!({"enum": [1, "one"]})).is_empty());
        assert_eq!(keywords(json!(2), json!({"enum": [1, "one"]})), vec!["enum"]);
        assert!(keywords(json!({"a": [1]}), json!({"const": {"a": [1.0]}})).is_empty());
        assert_eq!(keywords(json!("x"), json!({"const": "y"})), vec!["const"]);
    }

    #[test]
    fn boolean_schemas_accept_or_reject_everything() {
        assert!(keywords(json!({"any": 1}), json!(true)).is_empty());
        assert_eq!(keywords(json!(null), json!(false)), vec!["false"]);
        let schema = json!({"properties": {"locked": false}});
        let result = SchemaValidator::default().validate(&json!({"locked": 1}), &schema);
        assert_eq!(result.errors()[0].pointer(), "/locked");
    }

    #[test]
    fn unrecognized_keywords_are_ignored() {
        let schema = json!({"patternProperties": {"^x": {"type": "string"}}, "$ref": "#/x"});
        assert!(keywords(json!({"xa": 1}), schema).is_empty());
    }

    #[test]
    fn large_integers_compare_exactly() {
        let schema = json!({"maximum": 9007199254740993u64});
        assert!(keywords(json!(9007199254740993u64), schema.clone()).is_empty());
        assert_eq!(keywords(json!(9007199254740994u64), schema), vec!["maximum"]);
    }

    #[test]
    fn validation_does_not_mutate_inputs() {
        let instance = json!({"a": [1, 2, {"b": "c"}]});
        let schema = json!({"properties": {"a": {"items": {"type": "integer"}}}});
        let (i0, s0) = (instance.clone(), schema.clone());
        let _ = SchemaValidator::default().validate(&instance, &schema);
        assert_eq!(instance, i0);
        assert_eq!(schema, s0);
    }
}
