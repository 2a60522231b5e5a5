//! CLI command definitions.
//!
//! Each subcommand runs the same resolution pipeline and differs only in
//! what it reports.

use clap::{Parser, Subcommand};

pub mod inputs;
pub mod resolve;
pub mod validate;
pub mod vars;

/// devfile - resolve and validate devfiles
#[derive(Parser)]
#[command(name = "devfile")]
#[command(version, about = "Resolve and validate devfiles")]
#[command(long_about = r#"
Resolves devfile 2.x documents: manifests referenced by URI are fetched and
inlined, {{ NAME }} placeholders are substituted with the devfile's variables
(overridable with --var), and the result is validated.

COMMANDS:
  resolve   → Print the resolved devfile
  validate  → Resolve and validate one devfile or a directory of them
  vars      → Show effective variables and their usage

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Fetch failure
  5 - Malformed devfile
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a devfile and print the result
    Resolve(resolve::ResolveArgs),

    /// Validate devfiles
    Validate(validate::ValidateArgs),

    /// Show effective variables
    Vars(vars::VarsArgs),
}
