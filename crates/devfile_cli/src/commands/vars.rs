//! Vars command - Show effective variables and how they are used.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::info;

use devfile_resolver::{DevfileParser, ParsedResult, VariableSource, VariableWarning};

use super::inputs::{OutputFormat, SourceArgs};

#[derive(Args)]
pub struct VarsArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Print as structured YAML or JSON instead of a table
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VariableRow {
    name: String,
    value: String,
    source: VariableSource,
    used: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VarsReport {
    variables: Vec<VariableRow>,
    variable_warning: VariableWarning,
}

pub async fn execute(args: VarsArgs) -> Result<()> {
    info!("Inspecting variables of {}", args.source.source);

    let parser = DevfileParser::with_config(args.source.fetcher_config())?;
    let result = parser.parse(&args.source.parser_args()?).await?;
    let report = build_report(&result);

    match args.output {
        Some(format) => print!("{}", format.encode(&report)?),
        None => print_table(&report),
    }

    Ok(())
}

fn build_report(result: &ParsedResult) -> VarsReport {
    let variables = result
        .variables
        .effective()
        .iter()
        .filter_map(|(name, value)| {
            let source = result.variables.source(name)?;
            Some(VariableRow {
                name: name.clone(),
                value: value.clone(),
                source,
                used: !result.unused_variables.contains(name),
            })
        })
        .collect();

    VarsReport {
        variables,
        variable_warning: result.variable_warning.clone(),
    }
}

fn print_table(report: &VarsReport) {
    if report.variables.is_empty() {
        println!("No variables defined");
    } else {
        let width = report
            .variables
            .iter()
            .map(|row| row.name.len())
            .max()
            .unwrap_or(0);

        for row in &report.variables {
            let source = match row.source {
                VariableSource::Document => "devfile",
                VariableSource::External => "external",
                VariableSource::Overridden => "override",
            };
            let marker = if row.used { "" } else { "  (unused)" };
            println!(
                "{:<width$}  {:<8}  {}{}",
                row.name,
                source,
                row.value,
                marker,
                width = width
            );
        }
    }

    let warning = &report.variable_warning;
    for (category, entries) in [
        ("commands", &warning.commands),
        ("components", &warning.components),
        ("projects", &warning.projects),
        ("starterProjects", &warning.starter_projects),
    ] {
        for (element, names) in entries {
            println!("⚠️  {}/{}: undefined {}", category, element, names.join(", "));
        }
    }
}
