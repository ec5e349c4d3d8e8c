//! # Schema Check
//!
//! Structural audit of a schema document, backing the `check` subcommand.
//! Walks every sub-schema the validator would visit and reports:
//!
//! - keywords outside the supported subset,
//! - recognized keywords whose value has the wrong shape,
//! - unknown `type` names and invalid `pattern` regexes,
//! - `format` names the registry cannot check.
//!
//! Findings are advisory. They never make a schema fail the check; only a
//! load failure does.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::ecma::compile_pattern;
use crate::format::FormatRegistry;
use crate::keywords::{as_count, is_recognized, TYPE_NAMES};
use crate::pointer::{to_json_pointer, PathToken};

/// Category of a schema finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Keyword not in the supported subset; ignored during validation.
    UnrecognizedKeyword,
    /// Recognized keyword with a value the validator cannot use.
    MalformedKeyword,
    /// `format` name with no registered checker; annotation only.
    UnknownFormat,
}

/// One advisory finding inside a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaWarning {
    pub kind: WarningKind,
    /// The keyword the finding is about.
    pub keyword: String,
    /// Location of the schema object holding the keyword.
    pub path: Vec<PathToken>,
    pub message: String,
}

impl SchemaWarning {
    /// JSON Pointer of the schema object holding the keyword.
    pub fn pointer(&self) -> String {
        to_json_pointer(&self.path)
    }
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pointer = self.pointer();
        let at = if pointer.is_empty() { "root" } else { pointer.as_str() };
        write!(f, "{}: {} (at {at})", self.keyword, self.message)
    }
}

/// Audit `schema` and return its findings in document order.
pub fn check_schema(schema: &Value, formats: &FormatRegistry) -> Vec<SchemaWarning> {
    let mut warnings = Vec::new();
    check_node(schema, &mut Vec::new(), formats, &mut warnings);
    warnings
}

fn check_node(
    node: &Value,
    path: &mut Vec<PathToken>,
    formats: &FormatRegistry,
    warnings: &mut Vec<SchemaWarning>,
) {
    let Some(rules) = node.as_object() else {
        return;
    };

    for (keyword, value) in rules {
        if !is_recognized(keyword) {
            warnings.push(warning(
                WarningKind::UnrecognizedKeyword,
                keyword,
                path,
                format!("unrecognized keyword \"{keyword}\" is ignored during validation"),
            ));
            continue;
        }
        if let Some((kind, message)) = audit_keyword(keyword, value, formats) {
            warnings.push(warning(kind, keyword, path, message));
        }
    }

    recurse(rules, path, formats, warnings);
}

/// Visit sub-schemas in the same places the validator does.
fn recurse(
    rules: &Map<String, Value>,
    path: &mut Vec<PathToken>,
    formats: &FormatRegistry,
    warnings: &mut Vec<SchemaWarning>,
) {
    if let Some(properties) = rules.get("properties").and_then(Value::as_object) {
        for (name, subschema) in properties {
            path.push(PathToken::from("properties"));
            path.push(PathToken::from(name.as_str()));
            check_node(subschema, path, formats, warnings);
            path.truncate(path.len() - 2);
        }
    }

    for keyword in ["additionalProperties", "items"] {
        if let Some(subschema @ Value::Object(_)) = rules.get(keyword) {
            path.push(PathToken::from(keyword));
            check_node(subschema, path, formats, warnings);
            path.pop();
        }
    }
}

fn audit_keyword(
    keyword: &str,
    value: &Value,
    formats: &FormatRegistry,
) -> Option<(WarningKind, String)> {
    let malformed = |expected: &str| {
        Some((
            WarningKind::MalformedKeyword,
            format!("\"{keyword}\" must be {expected}"),
        ))
    };

    match keyword {
        "type" => {
            let names: Vec<&Value> = match value {
                Value::String(_) => vec![value],
                Value::Array(names) => names.iter().collect(),
                _ => return malformed("a type name or an array of type names"),
            };
            for name in names {
                match name.as_str() {
                    Some(name) if TYPE_NAMES.contains(&name) => {}
                    Some(name) => {
                        return Some((
                            WarningKind::MalformedKeyword,
                            format!("unknown type name \"{name}\" matches no value"),
                        ))
                    }
                    None => return malformed("a type name or an array of type names"),
                }
            }
            None
        }
        "enum" if !value.is_array() => malformed("an array"),
        "properties" if !value.is_object() => malformed("an object"),
        "required" => match value.as_array() {
            Some(names) if names.iter().all(Value::is_string) => None,
            _ => malformed("an array of property names"),
        },
        "additionalProperties" => match value {
            Value::Bool(_) | Value::Object(_) => None,
            _ => malformed("a boolean or a schema"),
        },
        "items" => match value {
            Value::Bool(_) | Value::Object(_) => None,
            Value::Array(_) => Some((
                WarningKind::MalformedKeyword,
                "tuple-form \"items\" is not supported and is ignored".to_string(),
            )),
            _ => malformed("a schema"),
        },
        "minItems" | "maxItems" | "minLength" | "maxLength" if as_count(value).is_none() => {
            malformed("a non-negative integer")
        }
        "minimum" | "maximum" | "exclusiveMinimum" | "exclusiveMaximum" if !value.is_number() => {
            malformed("a number")
        }
        "pattern" => match value.as_str() {
            Some(pattern) => compile_pattern(pattern).err().map(|e| {
                (
                    WarningKind::MalformedKeyword,
                    format!("invalid regular expression \"{pattern}\": {e}"),
                )
            }),
            None => malformed("a string"),
        },
        "format" => match value.as_str() {
            Some(name) if formats.contains(name) => None,
            Some(name) => Some((
                WarningKind::UnknownFormat,
                format!("format \"{name}\" has no registered checker and is treated as an annotation"),
            )),
            None => malformed("a string"),
        },
        _ => None,
    }
}

fn warning(kind: WarningKind, keyword: &str, path: &[PathToken], message: String) -> SchemaWarning {
    SchemaWarning {
        kind,
        keyword: keyword.to_string(),
        path: path.to_vec(),
        message,
    }
}
