//! # jsv-schema — JSON Schema Validation Engine
//!
//! Validates JSON (and YAML) documents against schemas written in a
//! Draft-7 keyword subset, without `$ref` or combinators.
//!
//! ## Modules
//!
//! - [`validate`] — [`SchemaValidator`], the recursive keyword engine.
//! - [`format`] — [`FormatRegistry`] with `email`, `date` and `uri` checkers.
//! - [`error`] — violations ([`ValidationError`], [`ValidationResult`]) and
//!   the failure taxonomy ([`SchemaLoadError`], [`DocumentError`], [`BatchError`]).
//! - [`pointer`] — path tokens and JSON Pointer rendering.
//! - [`batch`] — [`BatchRunner`]: glob resolution and per-file outcomes.
//! - [`check`] — structural schema audit for the `check` subcommand.
//! - [`document`] — schema loading and instance parsing.
//! - [`ecma`] — ECMA-262 `pattern` compilation.
//!
//! ## Example
//!
//! ```
//! use jsv_schema::{FormatRegistry, SchemaValidator};
//! use serde_json::json;
//!
//! let validator = SchemaValidator::new(FormatRegistry::with_builtins());
//! let result = validator.validate(&json!(-5), &json!({"type": "integer", "minimum": 0}));
//! assert!(!result.is_valid());
//! assert_eq!(result.errors()[0].keyword, "minimum");
//! ```

pub mod batch;
pub mod cancel;
pub mod check;
pub mod document;
pub mod ecma;
pub mod error;
pub mod format;
pub mod keywords;
pub mod pointer;
pub mod validate;

pub use batch::{
    all_succeeded, resolve_patterns, BatchOptions, BatchRunner, FileValidationOutcome,
    InputSource, ProgressFn, STDIN_NAME,
};
pub use cancel::CancellationToken;
pub use check::{check_schema, SchemaWarning, WarningKind};
pub use document::{load_schema, parse_document, parse_schema, DocumentFormat};
pub use error::{
    BatchError, DocumentError, ErrorCollector, SchemaLoadError, ValidationError, ValidationResult,
};
pub use format::{FormatCheck, FormatRegistry};
pub use pointer::{to_json_pointer, PathToken};
pub use validate::{SchemaValidator, ValidatorOptions};
