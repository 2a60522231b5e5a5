//! Parser inputs.

use std::collections::HashMap;
use std::path::PathBuf;

/// Inputs to a single parse call.
///
/// Exactly one source is used, in order of precedence: `data`, `path`, `url`.
#[derive(Debug, Clone, Default)]
pub struct ParserArgs {
    /// Devfile content.
    pub data: Option<Vec<u8>>,
    /// Path to a devfile on disk.
    pub path: Option<PathBuf>,
    /// URL of a remote devfile.
    pub url: Option<String>,
    /// Caller-supplied variables; these win over the devfile's own.
    pub external_variables: HashMap<String, String>,
    /// Location relative manifest URIs resolve against. Defaults to the
    /// devfile's own path or URL; inline data has no default.
    pub base_location: Option<String>,
}

impl ParserArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Some(data.into()),
            ..Default::default()
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.external_variables.insert(name.into(), value.into());
        self
    }

    pub fn with_variables(mut self, vars: HashMap<String, String>) -> Self {
        self.external_variables.extend(vars);
        self
    }

    pub fn with_base_location(mut self, base: impl Into<String>) -> Self {
        self.base_location = Some(base.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_args_builder() {
        let args = ParserArgs::from_data("schemaVersion: 2.2.0")
            .with_variable("PARAMS", "bar")
            .with_variables(HashMap::from([("OTHER".to_string(), "other".to_string())]))
            .with_base_location("https://example.com/devfile.yaml");

        assert!(args.data.is_some());
        assert_eq!(args.external_variables.len(), 2);
        assert_eq!(args.external_variables.get("PARAMS"), Some(&"bar".to_string()));
        assert_eq!(
            args.base_location.as_deref(),
            Some("https://example.com/devfile.yaml")
        );
    }
}
