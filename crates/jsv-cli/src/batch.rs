//! # Batch Subcommand
//!
//! Validates every file matched by one or more glob patterns. Files are
//! deduplicated and processed in sorted path order.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use jsv_schema::{
    load_schema, BatchOptions, BatchRunner, CancellationToken, FormatRegistry, ProgressFn,
    SchemaValidator, ValidatorOptions,
};

use crate::output::RenderArgs;

/// Arguments for the batch subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Files or glob patterns.
    #[arg(value_name = "FILE_OR_GLOB", required = true, num_args = 1..)]
    pub patterns: Vec<String>,

    /// Schema file.
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,

    /// Treat unknown `format` names as errors.
    #[arg(long)]
    pub strict_format: bool,

    /// Report `[processed/total]` on stderr after each file.
    #[arg(long)]
    pub progress: bool,

    /// Number of files validated concurrently.
    #[arg(short, long, default_value_t = 1, value_name = "N")]
    pub jobs: usize,

    #[command(flatten)]
    pub render: RenderArgs,
}

/// Run `batch`, returning the process exit code.
pub fn run_batch(args: &BatchArgs, cancel: &CancellationToken) -> Result<u8> {
    let schema = load_schema(&args.schema)?;

    let validator = SchemaValidator::with_options(
        FormatRegistry::with_builtins(),
        ValidatorOptions {
            strict_formats: args.strict_format,
        },
    );
    let runner = BatchRunner::new(&validator, BatchOptions { jobs: args.jobs })
        .with_cancellation(cancel.clone());

    let report = |done: usize, total: usize| eprintln!("[{done}/{total}]");
    let progress: Option<&ProgressFn<'_>> = if args.progress && !args.render.quiet {
        Some(&report)
    } else {
        None
    };

    crate::finish(runner.run(&args.patterns, &schema, progress), &args.render)
}
