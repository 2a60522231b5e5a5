//! Arguments shared by every subcommand that parses a devfile.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde_json::Value;

use devfile_fetch::FetcherConfig;
use devfile_resolver::ParserArgs;

use crate::error::CliError;

/// Where the devfile comes from and which variables apply.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Devfile path or http(s) URL
    #[arg(default_value = "devfile.yaml")]
    pub source: String,

    /// Set a variable (repeatable), overriding the devfile's value
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,

    /// Load variables from a YAML, JSON or TOML file (--var wins)
    #[arg(long, value_name = "FILE")]
    pub var_file: Option<PathBuf>,

    /// Base location for relative manifest URIs
    #[arg(long, value_name = "LOCATION")]
    pub base: Option<String>,

    /// Fetch timeout in seconds
    #[arg(long, env = "DEVFILE_FETCH_TIMEOUT_SECS")]
    pub timeout: Option<u64>,
}

impl SourceArgs {
    pub fn is_remote(&self) -> bool {
        is_remote(&self.source)
    }

    /// Variables from `--var-file` overlaid by `--var`.
    pub fn variables(&self) -> Result<HashMap<String, String>, CliError> {
        let mut variables = match &self.var_file {
            Some(path) => load_var_file(path)?,
            None => HashMap::new(),
        };
        variables.extend(self.vars.iter().cloned());
        Ok(variables)
    }

    pub fn parser_args(&self) -> Result<ParserArgs, CliError> {
        let args = if self.is_remote() {
            ParserArgs::from_url(&self.source)
        } else {
            ParserArgs::from_path(&self.source)
        };

        let mut args = args.with_variables(self.variables()?);
        if let Some(base) = &self.base {
            args = args.with_base_location(base);
        }
        Ok(args)
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        let config = FetcherConfig::from_env();
        match self.timeout {
            Some(seconds) => config.timeout_secs(seconds),
            None => config,
        }
    }
}

/// Output encoding for resolved documents.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn encode<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<String> {
        Ok(match self {
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
        })
    }
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Parse a `KEY=VALUE` pair.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Load a flat variable map. The format follows the file extension; YAML is
/// assumed otherwise.
pub fn load_var_file(path: &Path) -> Result<HashMap<String, String>, CliError> {
    let var_file_error = |message: String| CliError::VarFile {
        path: path.to_path_buf(),
        message,
    };

    let content = fs::read_to_string(path).map_err(|e| var_file_error(e.to_string()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let document: Value = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content).map_err(|e| var_file_error(e.to_string()))?,
        Some("toml") => toml::from_str(&content).map_err(|e| var_file_error(e.to_string()))?,
        _ => serde_yaml::from_str(&content).map_err(|e| var_file_error(e.to_string()))?,
    };

    let Value::Object(entries) = document else {
        return Err(var_file_error("expected a map of variable names to values".to_string()));
    };

    entries
        .into_iter()
        .map(|(name, value)| match value {
            Value::String(s) => Ok((name, s)),
            Value::Number(n) => Ok((name, n.to_string())),
            Value::Bool(b) => Ok((name, b.to_string())),
            _ => Err(var_file_error(format!("variable '{}' must be a scalar", name))),
        })
        .collect()
}
