//! # Validate Subcommand
//!
//! Validates a single instance file, or stdin, against a schema. Runs as a
//! batch of one so rendering and exit codes match `batch`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use jsv_schema::{
    load_schema, BatchOptions, BatchRunner, CancellationToken, FormatRegistry, InputSource,
    SchemaValidator, ValidatorOptions,
};

use crate::output::RenderArgs;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Instance file. `-` or omitted reads stdin.
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Schema file.
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,

    /// Treat unknown `format` names as errors.
    #[arg(long)]
    pub strict_format: bool,

    #[command(flatten)]
    pub render: RenderArgs,
}

impl ValidateArgs {
    fn input(&self) -> InputSource {
        match self.file.as_deref() {
            None | Some("-") => InputSource::Stdin,
            Some(path) => InputSource::File(PathBuf::from(path)),
        }
    }
}

/// Run `validate`, returning the process exit code.
pub fn run_validate(args: &ValidateArgs, cancel: &CancellationToken) -> Result<u8> {
    let schema = load_schema(&args.schema)?;

    let validator = SchemaValidator::with_options(
        FormatRegistry::with_builtins(),
        ValidatorOptions {
            strict_formats: args.strict_format,
        },
    );
    let runner =
        BatchRunner::new(&validator, BatchOptions::default()).with_cancellation(cancel.clone());

    crate::finish(runner.run_inputs(&[args.input()], &schema, None), &args.render)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(file: Option<&str>) -> ValidateArgs {
        ValidateArgs {
            file: file.map(str::to_string),
            schema: PathBuf::from("schema.json"),
            strict_format: false,
            render: RenderArgs::default(),
        }
    }

    #[test]
    fn dash_and_absent_file_mean_stdin() {
        assert_eq!(args(None).input(), InputSource::Stdin);
        assert_eq!(args(Some("-")).input(), InputSource::Stdin);
        assert_eq!(
            args(Some("data/a.json")).input(),
            InputSource::File(PathBuf::from("data/a.json"))
        );
    }

    #[test]
    fn glob_characters_are_not_expanded() {
        assert_eq!(
            args(Some("odd[1].json")).input(),
            InputSource::File(PathBuf::from("odd[1].json"))
        );
    }

    #[test]
    fn unreadable_schema_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(Some("a.json"));
        args.schema = dir.path().join("missing.json");
        let err = run_validate(&args, &CancellationToken::new()).unwrap_err();
        assert!(format!("{err:#}").contains("cannot read schema"));
    }
}
