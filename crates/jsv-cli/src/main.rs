//! # jsv CLI Entry Point
//!
//! Parses arguments, initialises logging, and dispatches to the handler
//! modules on a blocking worker while watching for Ctrl-C.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jsv_cli::{EXIT_FAILURE, EXIT_INTERRUPTED};
use jsv_schema::CancellationToken;

/// jsv — validate JSON documents against a JSON Schema.
///
/// Supports single files, stdin, and glob batches, with text, JSON and
/// CSV reports.
#[derive(Parser, Debug)]
#[command(name = "jsv", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate one file, or stdin, against a schema.
    Validate(jsv_cli::validate::ValidateArgs),
    /// Validate every file matched by one or more glob patterns.
    Batch(jsv_cli::batch::BatchArgs),
    /// Audit a schema file for unsupported or malformed keywords.
    Check(jsv_cli::check::CheckArgs),
}

impl Commands {
    fn quiet(&self) -> bool {
        match self {
            Commands::Validate(args) => args.render.quiet,
            Commands::Batch(args) => args.render.quiet,
            Commands::Check(args) => args.quiet,
        }
    }

    fn run(&self, cancel: &CancellationToken) -> anyhow::Result<u8> {
        match self {
            Commands::Validate(args) => jsv_cli::validate::run_validate(args, cancel),
            Commands::Batch(args) => jsv_cli::batch::run_batch(args, cancel),
            Commands::Check(args) => jsv_cli::check::run_check(args),
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool, json: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn dispatch(command: Commands, cancel: CancellationToken) -> u8 {
    let worker_cancel = cancel.clone();
    let work = tokio::task::spawn_blocking(move || command.run(&worker_cancel));

    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::debug!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        joined = work => match joined {
            Ok(Ok(code)) => code,
            Ok(Err(e)) => {
                eprintln!("error: {e:#}");
                EXIT_FAILURE
            }
            Err(e) => {
                eprintln!("error: worker failed: {e}");
                EXIT_FAILURE
            }
        },
        () = interrupted => {
            cancel.cancel();
            tracing::warn!("interrupted; stopping");
            EXIT_INTERRUPTED
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.command.quiet(), cli.log_json);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: cannot start runtime: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let code = runtime.block_on(dispatch(cli.command, CancellationToken::new()));
    // Don't wait for a cancelled worker to drain its current file.
    runtime.shutdown_timeout(Duration::from_millis(200));
    ExitCode::from(code)
}
