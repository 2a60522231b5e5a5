//! Parse entry point.
//!
//! A parse call runs, in order:
//! - load the devfile bytes (inline data, path or URL)
//! - decode
//! - inline by-URI manifests
//! - build the effective variables and write them back
//! - substitute placeholders, including inside inlined manifests
//! - classify variable usage
//! - validate the result
//!
//! Any failure ends the call with an error and no document.

use std::sync::Arc;

use devfile_fetch::{ContentFetcher, DefaultFetcher, FetchError, FetcherConfig};
use devfile_spec::{Devfile, DevfileReader, DevfileValidator, SchemaValidator};
use serde::Serialize;
use tracing::{debug, info};

use crate::args::ParserArgs;
use crate::error::{ResolveError, ResolveResult};
use crate::reference::ReferenceResolver;
use crate::substitution::SubstitutionEngine;
use crate::variables::VariableContext;
use crate::warnings::{VariableWarning, WarningAggregator};

/// A fully resolved and validated devfile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResult {
    pub devfile: Devfile,
    pub variables: VariableContext,
    pub variable_warning: VariableWarning,
    /// Effective variables no placeholder referenced.
    pub unused_variables: Vec<String>,
}

/// Resolves devfiles with injected fetch and validation collaborators.
pub struct DevfileParser {
    fetcher: Arc<dyn ContentFetcher>,
    validator: Arc<dyn SchemaValidator>,
    engine: SubstitutionEngine,
}

impl DevfileParser {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, validator: Arc<dyn SchemaValidator>) -> Self {
        Self {
            fetcher,
            validator,
            engine: SubstitutionEngine::new(),
        }
    }

    /// Parser with the default fetcher and the embedded schema.
    pub fn with_config(config: FetcherConfig) -> ResolveResult<Self> {
        let fetcher =
            DefaultFetcher::new(config).map_err(|e| ResolveError::Setup(e.to_string()))?;
        let validator = DevfileValidator::new()?;
        Ok(Self::new(Arc::new(fetcher), Arc::new(validator)))
    }

    pub async fn parse(&self, args: &ParserArgs) -> ResolveResult<ParsedResult> {
        let (bytes, source_location) = self.load(args).await?;
        let devfile = DevfileReader::from_bytes(&bytes)?;
        info!("Decoded devfile (schemaVersion {})", devfile.schema_version);

        let base = args.base_location.as_deref().or(source_location.as_deref());
        let mut devfile = ReferenceResolver::new(self.fetcher.clone())
            .resolve(devfile, base)
            .await?;

        let context = VariableContext::build(
            Some(&devfile.variables),
            Some(&args.external_variables),
        );
        context.apply_to(&mut devfile);
        debug!("Effective variables: {:?}", context.effective());

        let usage = self.engine.apply(&mut devfile, context.effective());
        let report = WarningAggregator::aggregate(&usage, &context);

        if let Err(violations) = self.validator.validate(&devfile) {
            info!("Devfile failed validation with {} violation(s)", violations.len());
            return Err(ResolveError::Validation { violations });
        }

        info!(
            "Resolved devfile with {} component(s) and {} command(s)",
            devfile.components.len(),
            devfile.commands.len()
        );

        Ok(ParsedResult {
            devfile,
            variables: context,
            variable_warning: report.warning,
            unused_variables: report.unused,
        })
    }

    /// Devfile bytes plus the location relative URIs resolve against.
    async fn load(&self, args: &ParserArgs) -> ResolveResult<(Vec<u8>, Option<String>)> {
        if let Some(data) = &args.data {
            debug!("Loading devfile from {} byte(s) of inline data", data.len());
            return Ok((data.clone(), None));
        }

        let locator = match (&args.path, &args.url) {
            (Some(path), _) => path.to_string_lossy().into_owned(),
            (None, Some(url)) => url.clone(),
            (None, None) => return Err(ResolveError::MissingInput),
        };

        info!("Loading devfile from {}", locator);
        let bytes = self.fetcher.fetch(&locator).await.map_err(ResolveError::Load)?;
        if bytes.is_empty() {
            return Err(ResolveError::Load(FetchError::Empty { locator }));
        }

        Ok((bytes, Some(locator)))
    }
}

/// Parse with the default fetcher configuration and the embedded schema.
pub async fn parse_devfile_and_validate(args: &ParserArgs) -> ResolveResult<ParsedResult> {
    DevfileParser::with_config(FetcherConfig::from_env())?
        .parse(args)
        .await
}
