//! Variable usage diagnostics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::substitution::{Category, UsageRecord};
use crate::variables::VariableContext;

/// Per-category map from element identity to the undefined variable names
/// it references.
///
/// All four maps are always present; an empty map means no problems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableWarning {
    #[serde(default)]
    pub commands: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub components: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub projects: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub starter_projects: BTreeMap<String, Vec<String>>,
}

impl VariableWarning {
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.category(*c).is_empty())
    }

    pub fn category(&self, category: Category) -> &BTreeMap<String, Vec<String>> {
        match category {
            Category::Commands => &self.commands,
            Category::Components => &self.components,
            Category::Projects => &self.projects,
            Category::StarterProjects => &self.starter_projects,
        }
    }

    pub fn category_mut(&mut self, category: Category) -> &mut BTreeMap<String, Vec<String>> {
        match category {
            Category::Commands => &mut self.commands,
            Category::Components => &mut self.components,
            Category::Projects => &mut self.projects,
            Category::StarterProjects => &mut self.starter_projects,
        }
    }
}

/// Output of [`WarningAggregator::aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableReport {
    pub warning: VariableWarning,
    /// Effective variables referenced nowhere, sorted.
    pub unused: Vec<String>,
}

/// Classifies recorded usage against the effective variables.
pub struct WarningAggregator;

impl WarningAggregator {
    pub fn aggregate(usage: &UsageRecord, context: &VariableContext) -> VariableReport {
        let mut warning = VariableWarning::default();

        for category in Category::ALL {
            for (element, variables) in usage.elements(category) {
                let undefined: Vec<String> = variables
                    .iter()
                    .filter(|name| !context.is_defined(name))
                    .cloned()
                    .collect();

                if undefined.is_empty() {
                    continue;
                }

                warn!(
                    "{} '{}' references undefined variable(s): {}",
                    category,
                    element,
                    undefined.join(", ")
                );
                warning
                    .category_mut(category)
                    .insert(element.to_string(), undefined);
            }
        }

        let unused: Vec<String> = context
            .effective()
            .keys()
            .filter(|name| !usage.is_used(name))
            .cloned()
            .collect();

        if !unused.is_empty() {
            debug!("Unused variable(s): {}", unused.join(", "));
        }

        VariableReport { warning, unused }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn context(document: &[(&str, &str)], external: &[(&str, &str)]) -> VariableContext {
        let document: BTreeMap<String, String> = document
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let external: HashMap<String, String> = external
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        VariableContext::build(Some(&document), Some(&external))
    }

    #[test]
    fn test_all_used_yields_empty_maps() {
        let mut usage = UsageRecord::new();
        usage.record(Category::Commands, "run", "PARAMS");
        usage.record(Category::Components, "deploy", "PARAMS");

        let context = context(&[("PARAMS", "foo")], &[("PARAMS", "bar")]);
        let report = WarningAggregator::aggregate(&usage, &context);
        assert!(report.warning.is_empty());
        assert!(report.unused.is_empty());
    }

    #[test]
    fn test_undefined_references_grouped_by_element() {
        let mut usage = UsageRecord::new();
        usage.record(Category::Commands, "run", "PARAMS");
        usage.record(Category::Commands, "run", "MISSING");
        usage.record(Category::Commands, "build", "ALSO_MISSING");
        usage.record(Category::StarterProjects, "starter", "MISSING");

        let report = WarningAggregator::aggregate(&usage, &context(&[("PARAMS", "foo")], &[]));

        assert_eq!(report.warning.commands.len(), 2);
        assert_eq!(report.warning.commands["run"], vec!["MISSING".to_string()]);
        assert_eq!(report.warning.commands["build"], vec!["ALSO_MISSING".to_string()]);
        assert_eq!(report.warning.starter_projects["starter"], vec!["MISSING".to_string()]);
        assert!(report.warning.components.is_empty());
    }

    #[test]
    fn test_unused_variables_sorted_and_outside_categories() {
        let mut usage = UsageRecord::new();
        usage.record(Category::Commands, "run", "PARAMS");

        let report = WarningAggregator::aggregate(
            &usage,
            &context(&[("PARAMS", "foo")], &[("ZETA", "z"), ("OTHER", "other")]),
        );

        assert_eq!(report.unused, vec!["OTHER".to_string(), "ZETA".to_string()]);
        assert!(report.warning.is_empty());
    }

    #[test]
    fn test_empty_maps_are_serialized() {
        let json = serde_json::to_value(VariableWarning::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "commands": {},
                "components": {},
                "projects": {},
                "starterProjects": {}
            })
        );
    }
}
