//! # jsv-cli — JSON Schema Validation Command-Line Interface
//!
//! Clap-based front end over [`jsv_schema`].
//!
//! ## Subcommands
//!
//! - `validate` — one file or stdin against a schema
//! - `batch` — every file matched by one or more glob patterns
//! - `check` — structural audit of a schema file
//!
//! ## Exit Codes
//!
//! - `0` — every input valid (or `check` found the schema usable)
//! - `1` — at least one input invalid or unparseable, or a fatal error
//! - `2` — usage error (reported by clap)
//! - `130` — interrupted
//!
//! Handlers parse arguments into library option structs and delegate; no
//! validation logic lives here.

pub mod batch;
pub mod check;
pub mod output;
pub mod validate;

use anyhow::Result;

use jsv_schema::{all_succeeded, BatchError, FileValidationOutcome};

use crate::output::RenderArgs;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INTERRUPTED: u8 = 130;

/// Render a finished run to stdout and compute its exit code.
///
/// A cancelled run renders nothing and exits 130; other batch failures
/// are fatal and propagate.
pub(crate) fn finish(
    outcomes: Result<Vec<FileValidationOutcome>, BatchError>,
    render: &RenderArgs,
) -> Result<u8> {
    let outcomes = match outcomes {
        Ok(outcomes) => outcomes,
        Err(BatchError::Cancelled) => return Ok(EXIT_INTERRUPTED),
        Err(e) => return Err(e.into()),
    };

    if let Some(rendered) = render.render(&outcomes)? {
        print!("{rendered}");
    }

    Ok(if all_succeeded(&outcomes) {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    })
}
