//! Validate command - Resolve and validate one or more devfiles.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use tracing::{debug, info};
use walkdir::WalkDir;

use devfile_resolver::{DevfileParser, ResolveError};

use super::inputs::{is_remote, SourceArgs};
use crate::error::CliError;

const DEVFILE_NAMES: [&str; 4] = ["devfile.yaml", ".devfile.yaml", "devfile.yml", ".devfile.yml"];

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Treat a directory source as a tree and validate every devfile in it
    #[arg(short, long)]
    recursive: bool,

    /// Print per-variable warnings for valid devfiles
    #[arg(long)]
    show_warnings: bool,
}

pub async fn execute(args: ValidateArgs) -> Result<()> {
    let targets = collect_targets(&args.source.source, args.recursive);
    if targets.is_empty() {
        anyhow::bail!(CliError::InvalidArgument(format!(
            "no devfile found under {}",
            args.source.source
        )));
    }

    info!("Validating {} devfile(s)", targets.len());
    let parser = DevfileParser::with_config(args.source.fetcher_config())?;

    let mut failed = 0;
    let mut last_error: Option<ResolveError> = None;

    for target in &targets {
        let mut source = args.source.clone();
        source.source = target.clone();

        match parser.parse(&source.parser_args()?).await {
            Ok(result) => {
                println!("✅ {}", target);
                if args.show_warnings {
                    super::resolve::report_warnings(&result);
                }
            }
            Err(e) => {
                failed += 1;
                println!("❌ {}", target);
                match e.violations() {
                    Some(violations) => {
                        for violation in violations {
                            println!("   - {}", violation);
                        }
                    }
                    None => println!("   - {}", e),
                }
                last_error = Some(e);
            }
        }
    }

    println!();
    match (failed, last_error) {
        (0, _) => {
            println!("✅ All {} devfile(s) valid", targets.len());
            Ok(())
        }
        // A single failure keeps its own category for the exit code
        (1, Some(e)) if targets.len() == 1 => Err(e.into()),
        _ => Err(CliError::ValidationFailed {
            failed,
            total: targets.len(),
        }
        .into()),
    }
}

/// Devfiles to validate, sorted for stable output.
fn collect_targets(source: &str, recursive: bool) -> Vec<String> {
    if is_remote(source) {
        return vec![source.to_string()];
    }

    let path = Path::new(source);
    if !path.is_dir() {
        return vec![source.to_string()];
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut targets: Vec<PathBuf> = WalkDir::new(path)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_devfile_name(e.path()))
        .map(|e| e.into_path())
        .collect();
    targets.sort();

    debug!("Found {} devfile(s) under {}", targets.len(), source);
    targets
        .into_iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect()
}

fn is_devfile_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| DEVFILE_NAMES.contains(&n))
        .unwrap_or(false)
}
