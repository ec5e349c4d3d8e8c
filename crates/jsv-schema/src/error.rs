//! # Error Types
//!
//! Two families live here:
//!
//! - **Violations** ([`ValidationError`]) are data. The validator accumulates
//!   them into a [`ValidationResult`] and never returns them as `Err`.
//! - **Failures** ([`SchemaLoadError`], [`DocumentError`], [`BatchError`]) are
//!   `thiserror` enums returned through `Result`. A schema load failure aborts
//!   the whole invocation; a document failure is recorded per file.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::pointer::{to_json_pointer, PathToken};

/// A single schema keyword violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Location of the offending value inside the instance.
    pub path: Vec<PathToken>,
    /// The schema keyword that failed (`"type"`, `"required"`, ...).
    pub keyword: String,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    /// The instance location as a JSON Pointer string.
    pub fn pointer(&self) -> String {
        to_json_pointer(&self.path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pointer = self.pointer();
        if pointer.is_empty() {
            write!(f, "{}: {} (at root)", self.keyword, self.message)
        } else {
            write!(f, "{}: {} (at {})", self.keyword, self.message, pointer)
        }
    }
}

/// Outcome of validating one instance against one schema.
///
/// `valid` is derived from `errors` at construction and cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Build a result from collected errors.
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// True when no violation was recorded.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Append-only accumulator for one `validate()` call.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<ValidationError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation at `path`.
    pub fn push(&mut self, path: Vec<PathToken>, keyword: &str, message: impl Into<String>) {
        self.errors.push(ValidationError {
            path,
            keyword: keyword.to_string(),
            message: message.into(),
        });
    }

    /// Finish collection.
    pub fn into_result(self) -> ValidationResult {
        ValidationResult::from_errors(self.errors)
    }
}

/// The schema file could not be used. Fatal for the whole invocation.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// The schema file could not be read.
    #[error("cannot read schema '{}': {source}", .path.display())]
    Read {
        /// Path to the schema file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The schema file is not valid JSON.
    #[error("schema '{}' is not valid JSON: {source}", .path.display())]
    InvalidJson {
        /// Path to the schema file.
        path: PathBuf,
        /// Parser error with line and column.
        #[source]
        source: serde_json::Error,
    },

    /// The top-level value is not a JSON object.
    #[error("schema '{}' must be a JSON object, found {found}", .path.display())]
    NotAnObject {
        /// Path to the schema file.
        path: PathBuf,
        /// JSON kind of the top-level value.
        found: &'static str,
    },
}

/// An instance document could not be read or parsed. Recorded per file.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Reading the file or stdin failed.
    #[error("cannot read input: {0}")]
    Read(#[from] std::io::Error),

    /// The content is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The content is not valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The YAML document uses constructs with no JSON equivalent.
    #[error("YAML-to-JSON conversion failed: {0}")]
    Conversion(String),
}

/// Batch-level failure. Per-file problems never surface here.
#[derive(Error, Debug)]
pub enum BatchError {
    /// A glob pattern is syntactically invalid.
    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Patterns resolved to no input at all.
    #[error("no input files matched: {}", .patterns.join(", "))]
    NoInputs {
        /// The patterns that were tried.
        patterns: Vec<String>,
    },

    /// The worker pool could not be created.
    #[error("cannot start worker pool: {0}")]
    WorkerPool(String),

    /// The user interrupted processing.
    #[error("cancelled by user")]
    Cancelled,
}
