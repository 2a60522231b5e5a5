//! Effective variable set.

use std::collections::{BTreeMap, HashMap};

use devfile_spec::Devfile;
use serde::Serialize;
use tracing::debug;

/// Where an effective value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableSource {
    /// Declared in the devfile only.
    Document,
    /// Supplied by the caller only.
    External,
    /// Declared in the devfile and replaced by the caller.
    Overridden,
}

/// Document variables merged with caller-supplied ones.
///
/// External values win on conflicts. External names absent from the
/// document are added.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableContext {
    document_variables: BTreeMap<String, String>,
    external_variables: BTreeMap<String, String>,
    effective: BTreeMap<String, String>,
}

impl VariableContext {
    /// Build the context. Either side may be absent.
    pub fn build(
        document: Option<&BTreeMap<String, String>>,
        external: Option<&HashMap<String, String>>,
    ) -> Self {
        let document_variables = document.cloned().unwrap_or_default();
        let external_variables: BTreeMap<String, String> = external
            .map(|vars| vars.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        let mut effective = document_variables.clone();
        for (name, value) in &external_variables {
            if let Some(previous) = effective.insert(name.clone(), value.clone()) {
                debug!("Variable '{}' overridden ('{}' -> '{}')", name, previous, value);
            }
        }

        Self {
            document_variables,
            external_variables,
            effective,
        }
    }

    pub fn document_variables(&self) -> &BTreeMap<String, String> {
        &self.document_variables
    }

    pub fn external_variables(&self) -> &BTreeMap<String, String> {
        &self.external_variables
    }

    /// The merged set substitution runs against.
    pub fn effective(&self) -> &BTreeMap<String, String> {
        &self.effective
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.effective.get(name).map(String::as_str)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.effective.contains_key(name)
    }

    pub fn source(&self, name: &str) -> Option<VariableSource> {
        match (
            self.document_variables.contains_key(name),
            self.external_variables.contains_key(name),
        ) {
            (true, true) => Some(VariableSource::Overridden),
            (true, false) => Some(VariableSource::Document),
            (false, true) => Some(VariableSource::External),
            (false, false) => None,
        }
    }

    /// Write the effective set into the devfile's variables block.
    pub fn apply_to(&self, devfile: &mut Devfile) {
        devfile.variables = self.effective.clone();
    }
}
