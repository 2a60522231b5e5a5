//! devfile CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 4: Fetch failure
//! - 5: Malformed devfile

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod error;

use commands::{Cli, Commands};
use devfile_resolver::ResolveError;
use error::CliError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const FETCH_ERROR: u8 = 4;
    pub const MALFORMED_DOCUMENT: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args).await,
        Commands::Validate(args) => commands::validate::execute(args).await,
        Commands::Vars(args) => commands::vars::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// `RUST_LOG` wins; otherwise the verbosity flags pick the level.
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = match (verbose, quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Map an error to its exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(err) = e.downcast_ref::<ResolveError>() {
        return match err {
            ResolveError::Validation { .. } => ExitCodes::VALIDATION_FAILURE,
            ResolveError::Load(_) | ResolveError::Fetch { .. } => ExitCodes::FETCH_ERROR,
            ResolveError::MalformedDocument(_) => ExitCodes::MALFORMED_DOCUMENT,
            ResolveError::MissingInput => ExitCodes::INVALID_ARGS,
            ResolveError::Setup(_) => ExitCodes::GENERAL_ERROR,
        };
    }

    match e.downcast_ref::<CliError>() {
        Some(CliError::ValidationFailed { .. }) => ExitCodes::VALIDATION_FAILURE,
        Some(CliError::InvalidArgument(_)) | Some(CliError::VarFile { .. }) => {
            ExitCodes::INVALID_ARGS
        }
        None => ExitCodes::GENERAL_ERROR,
    }
}
