//! # Batch Validation
//!
//! Resolves glob patterns to input files, parses each one, validates it
//! against a single schema, and returns one [`FileValidationOutcome`] per
//! input in lexicographic path order.
//!
//! ## Failure Classes
//!
//! A file that cannot be read or parsed yields an outcome with
//! `parse_error` set and no `result`; it never becomes a
//! [`ValidationError`](crate::ValidationError) and never stops the batch.
//! Only pattern errors, an empty input set, and cancellation fail the
//! whole run as a [`BatchError`].
//!
//! ## Worker Pool
//!
//! With `jobs > 1` files are processed on a bounded rayon pool. Results
//! are collected by input index, so output order never depends on which
//! worker finished first.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde_json::Value;

use crate::cancel::CancellationToken;
use crate::document::{parse_document, DocumentFormat};
use crate::error::{BatchError, DocumentError, ValidationResult};
use crate::validate::SchemaValidator;

/// Display name used for standard input.
pub const STDIN_NAME: &str = "<stdin>";

/// Progress callback: `(processed, total)` after every file.
pub type ProgressFn<'a> = dyn Fn(usize, usize) + Sync + 'a;

/// Where an instance document comes from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// Name shown in rendered output.
    pub fn display_name(&self) -> String {
        match self {
            InputSource::Stdin => STDIN_NAME.to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }

    /// Read and parse the document.
    pub fn read(&self) -> Result<Value, DocumentError> {
        match self {
            InputSource::Stdin => {
                let mut content = String::new();
                std::io::stdin().read_to_string(&mut content)?;
                parse_document(&content, DocumentFormat::Json)
            }
            InputSource::File(path) => {
                let content = std::fs::read_to_string(path)?;
                parse_document(&content, DocumentFormat::from_path(path))
            }
        }
    }
}

/// Result of processing one input.
///
/// Exactly one of `result` and `parse_error` is set.
#[derive(Debug, Clone)]
pub struct FileValidationOutcome {
    pub filename: String,
    pub result: Option<ValidationResult>,
    pub parse_error: Option<String>,
    pub elapsed: Duration,
}

impl FileValidationOutcome {
    /// Parsed and valid.
    pub fn succeeded(&self) -> bool {
        self.parse_error.is_none() && self.result.as_ref().is_some_and(ValidationResult::is_valid)
    }

    /// Number of schema violations; zero for parse failures.
    pub fn error_count(&self) -> usize {
        self.result.as_ref().map_or(0, ValidationResult::error_count)
    }
}

/// Overall success: every input parsed and validated cleanly.
pub fn all_succeeded(outcomes: &[FileValidationOutcome]) -> bool {
    outcomes.iter().all(FileValidationOutcome::succeeded)
}

/// Batch configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Worker threads. `0` and `1` both mean sequential.
    pub jobs: usize,
}

/// Runs a [`SchemaValidator`] over many inputs.
#[derive(Debug)]
pub struct BatchRunner<'v> {
    validator: &'v SchemaValidator,
    options: BatchOptions,
    cancel: CancellationToken,
}

impl<'v> BatchRunner<'v> {
    pub fn new(validator: &'v SchemaValidator, options: BatchOptions) -> Self {
        Self {
            validator,
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Observe `token`; once cancelled no further file is started.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Resolve `patterns` and validate every matching file against `schema`.
    ///
    /// # Errors
    ///
    /// Invalid patterns, no inputs at all, worker pool failure, or
    /// cancellation. Per-file problems are reported inside the outcomes.
    pub fn run(
        &self,
        patterns: &[String],
        schema: &Value,
        progress: Option<&ProgressFn<'_>>,
    ) -> Result<Vec<FileValidationOutcome>, BatchError> {
        let inputs = resolve_patterns(patterns)?;
        self.run_inputs(&inputs, schema, progress)
    }

    /// Validate already-resolved inputs, preserving their order.
    pub fn run_inputs(
        &self,
        inputs: &[InputSource],
        schema: &Value,
        progress: Option<&ProgressFn<'_>>,
    ) -> Result<Vec<FileValidationOutcome>, BatchError> {
        let total = inputs.len();
        let processed = AtomicUsize::new(0);
        let step = |outcome: FileValidationOutcome| {
            let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(report) = progress {
                report(done, total);
            }
            outcome
        };

        tracing::info!(files = total, jobs = self.options.jobs, "starting batch validation");

        let outcomes: Vec<Option<FileValidationOutcome>> = if self.options.jobs > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.jobs)
                .build()
                .map_err(|e| BatchError::WorkerPool(e.to_string()))?;
            pool.install(|| {
                inputs
                    .par_iter()
                    .map(|input| {
                        (!self.cancel.is_cancelled()).then(|| step(self.validate_input(input, schema)))
                    })
                    .collect()
            })
        } else {
            let mut outcomes = Vec::with_capacity(total);
            for input in inputs {
                if self.cancel.is_cancelled() {
                    break;
                }
                outcomes.push(Some(step(self.validate_input(input, schema))));
            }
            outcomes
        };

        if self.cancel.is_cancelled() {
            tracing::warn!(
                completed = processed.load(Ordering::SeqCst),
                total,
                "batch cancelled; discarding partial results"
            );
            return Err(BatchError::Cancelled);
        }

        Ok(outcomes.into_iter().flatten().collect())
    }

    /// Read, parse and validate a single input.
    pub fn validate_input(&self, input: &InputSource, schema: &Value) -> FileValidationOutcome {
        let started = Instant::now();
        let filename = input.display_name();

        let (result, parse_error) = match input.read() {
            Ok(instance) => (Some(self.validator.validate(&instance, schema)), None),
            Err(e) => (None, Some(e.to_string())),
        };
        let elapsed = started.elapsed();

        match (&result, &parse_error) {
            (Some(result), _) => tracing::debug!(
                file = %filename,
                valid = result.is_valid(),
                errors = result.error_count(),
                elapsed_us = elapsed.as_micros() as u64,
                "validated"
            ),
            (None, Some(reason)) => tracing::debug!(file = %filename, %reason, "parse failure"),
            (None, None) => {}
        }

        FileValidationOutcome {
            filename,
            result,
            parse_error,
            elapsed,
        }
    }
}

/// Expand glob patterns into a deduplicated, lexicographically ordered
/// list of files.
///
/// A pattern without glob metacharacters that matches nothing is kept as
/// a literal path, so its read failure shows up as that file's outcome.
/// A glob that matches nothing is skipped.
///
/// # Errors
///
/// [`BatchError::InvalidPattern`] for malformed patterns and
/// [`BatchError::NoInputs`] when nothing at all resolves.
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<InputSource>, BatchError> {
    // Keyed by the path text so ordering is plain string order
    // (`a-b.json` before `a/x.json`), not component order.
    let mut resolved: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut add = |path: PathBuf| {
        resolved.insert(path.to_string_lossy().into_owned(), path);
    };

    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|e| BatchError::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;

        let mut matched = 0usize;
        for entry in entries {
            match entry {
                Ok(path) if path.is_dir() => {}
                Ok(path) => {
                    matched += 1;
                    add(path);
                }
                Err(e) => tracing::warn!(%pattern, error = %e, "skipping unreadable path"),
            }
        }

        if matched == 0 {
            if is_literal(pattern) {
                add(PathBuf::from(pattern));
            } else {
                tracing::warn!(%pattern, "pattern matched no files");
            }
        }
    }

    if resolved.is_empty() {
        return Err(BatchError::NoInputs {
            patterns: patterns.to_vec(),
        });
    }

    Ok(resolved.into_values().map(InputSource::File).collect())
}

fn is_literal(pattern: &str) -> bool {
    !pattern.contains(['*', '?', '['])
}
