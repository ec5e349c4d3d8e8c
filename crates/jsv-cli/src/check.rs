//! # Check Subcommand
//!
//! Loads a schema and audits its structure. Warnings never fail the
//! command; only an unusable schema file does.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use jsv_schema::{check_schema, load_schema, FormatRegistry};

use crate::output::{render_check_json, render_check_text, CheckFormat};
use crate::EXIT_SUCCESS;

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema file to audit.
    #[arg(value_name = "SCHEMA_FILE")]
    pub schema: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = CheckFormat::Text)]
    pub output: CheckFormat,

    /// Disable ANSI colors in text output.
    #[arg(long)]
    pub no_color: bool,

    /// Print nothing; the exit code is the only result.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Run `check`, returning the process exit code.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let schema = load_schema(&args.schema)?;
    let warnings = check_schema(&schema, &FormatRegistry::with_builtins());
    tracing::info!(schema = %args.schema.display(), warnings = warnings.len(), "schema checked");

    if args.quiet {
        return Ok(EXIT_SUCCESS);
    }

    let filename = args.schema.display().to_string();
    let rendered = match args.output {
        CheckFormat::Text => render_check_text(&filename, &warnings, !args.no_color),
        CheckFormat::Json => render_check_json(&filename, &warnings)?,
    };
    print!("{rendered}");

    Ok(EXIT_SUCCESS)
}
