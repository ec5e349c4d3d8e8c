//! # Document Loading
//!
//! Reading schemas and instance documents into the JSON data model.
//!
//! Schemas are always JSON and must be objects at the top level. Instances
//! are JSON unless their name ends in `.yaml`/`.yml`, in which case they are
//! parsed as YAML and converted value-by-value into the JSON model.

use std::path::Path;

use serde_json::Value;

use crate::error::{DocumentError, SchemaLoadError};
use crate::keywords::kind_of;

/// Instance syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` select YAML; everything else, stdin included, is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Read and parse a schema file.
///
/// # Errors
///
/// Fails when the file cannot be read, is not valid JSON, or is not a
/// JSON object at the top level.
pub fn load_schema(path: &Path) -> Result<Value, SchemaLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| SchemaLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_schema(path, &content)
}

/// Parse schema text already in memory. `path` is used for diagnostics.
pub fn parse_schema(path: &Path, content: &str) -> Result<Value, SchemaLoadError> {
    let schema: Value =
        serde_json::from_str(content).map_err(|source| SchemaLoadError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;
    if !schema.is_object() {
        return Err(SchemaLoadError::NotAnObject {
            path: path.to_path_buf(),
            found: kind_of(&schema),
        });
    }
    Ok(schema)
}

/// Parse an instance document.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value, DocumentError> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(content)?),
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
            from_yaml(yaml).map_err(DocumentError::Conversion)
        }
    }
}

/// Move a YAML tree into the JSON model. Tags are dropped; only finite
/// numbers and scalar mapping keys have a JSON form.
fn from_yaml(yaml: serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(flag) => Value::Bool(flag),
        Yaml::Number(number) => yaml_number(&number)?,
        Yaml::String(text) => Value::String(text),
        Yaml::Sequence(items) => {
            Value::Array(items.into_iter().map(from_yaml).collect::<Result<_, _>>()?)
        }
        Yaml::Mapping(entries) => {
            let mut object = serde_json::Map::with_capacity(entries.len());
            for (key, value) in entries {
                object.insert(yaml_key(key)?, from_yaml(value)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

/// Integers keep their exact width; floats must be finite.
fn yaml_number(number: &serde_yaml::Number) -> Result<Value, String> {
    if let Some(signed) = number.as_i64() {
        return Ok(signed.into());
    }
    if let Some(unsigned) = number.as_u64() {
        return Ok(unsigned.into());
    }
    number
        .as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| format!("number {number} has no JSON representation"))
}

/// JSON member names are strings, so scalar keys are stringified.
fn yaml_key(key: serde_yaml::Value) -> Result<String, String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(text) => Ok(text),
        Yaml::Number(number) => Ok(number.to_string()),
        Yaml::Bool(flag) => Ok(flag.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => yaml_key(tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => {
            Err("mapping keys must be scalars to become JSON member names".to_string())
        }
    }
}
