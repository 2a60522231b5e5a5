//! Resolve command - Print a fully resolved devfile.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use devfile_resolver::{DevfileParser, ParsedResult};

use super::inputs::{OutputFormat, SourceArgs};

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    output: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    out_file: Option<PathBuf>,

    /// Emit the full report (document, variables and warnings)
    #[arg(long)]
    report: bool,
}

pub async fn execute(args: ResolveArgs) -> Result<()> {
    info!("Resolving devfile: {}", args.source.source);

    let parser = DevfileParser::with_config(args.source.fetcher_config())?;
    let result = parser.parse(&args.source.parser_args()?).await?;

    let rendered = if args.report {
        args.output.encode(&result)?
    } else {
        args.output.encode(&result.devfile)?
    };

    match &args.out_file {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote resolved devfile to {}", path.display());
        }
        None => print!("{}", ensure_trailing_newline(rendered)),
    }

    report_warnings(&result);
    Ok(())
}

/// Summarize variable diagnostics on stderr.
pub fn report_warnings(result: &ParsedResult) {
    let warning = &result.variable_warning;
    if !warning.is_empty() {
        for (category, entries) in [
            ("command", &warning.commands),
            ("component", &warning.components),
            ("project", &warning.projects),
            ("starter project", &warning.starter_projects),
        ] {
            for (element, names) in entries {
                eprintln!(
                    "⚠️  {} '{}' references undefined variable(s): {}",
                    category,
                    element,
                    names.join(", ")
                );
            }
        }
    }

    if !result.unused_variables.is_empty() {
        eprintln!(
            "ℹ️  Unused variable(s): {}",
            result.unused_variables.join(", ")
        );
    }
}

fn ensure_trailing_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}
