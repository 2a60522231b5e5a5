//! `{{ NAME }}` placeholder substitution over a resolved devfile.
//!
//! Only the `{{ NAME }}` form is recognized; `${NAME}` references belong to a
//! later expansion step and pass through untouched. Replacement is a single
//! pass, so substituted values are never re-scanned.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use devfile_spec::{CommandKind, ComponentKind, Devfile, Endpoint, EnvVar, ProjectSource};
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::debug;

/// Placeholder grammar: `{{`, optional whitespace, name, optional whitespace, `}}`.
pub const PLACEHOLDER_PATTERN: &str = r"\{\{\s*([A-Za-z0-9_-]+)\s*\}\}";

/// Document element categories usage is tracked under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Commands,
    Components,
    Projects,
    StarterProjects,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Commands,
        Category::Components,
        Category::Projects,
        Category::StarterProjects,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Commands => "commands",
            Category::Components => "components",
            Category::Projects => "projects",
            Category::StarterProjects => "starterProjects",
        };
        f.write_str(name)
    }
}

/// Variable names referenced per category and element.
///
/// A name is recorded whenever its placeholder is seen, whether or not it
/// resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageRecord {
    usage: BTreeMap<Category, BTreeMap<String, BTreeSet<String>>>,
}

impl UsageRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: Category, element: &str, variable: &str) {
        self.usage
            .entry(category)
            .or_default()
            .entry(element.to_string())
            .or_default()
            .insert(variable.to_string());
    }

    /// Elements of `category` with the names each one referenced.
    pub fn elements(
        &self,
        category: Category,
    ) -> impl Iterator<Item = (&str, &BTreeSet<String>)> + '_ {
        self.usage
            .get(&category)
            .into_iter()
            .flat_map(|elements| elements.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// All names referenced anywhere in `category`.
    pub fn variables_in(&self, category: Category) -> BTreeSet<&str> {
        self.elements(category)
            .flat_map(|(_, vars)| vars.iter().map(String::as_str))
            .collect()
    }

    /// All names referenced anywhere in the document.
    pub fn used_variables(&self) -> BTreeSet<&str> {
        Category::ALL
            .iter()
            .flat_map(|category| self.variables_in(*category))
            .collect()
    }

    pub fn is_used(&self, variable: &str) -> bool {
        self.usage
            .values()
            .flat_map(BTreeMap::values)
            .any(|vars| vars.contains(variable))
    }

    pub fn is_empty(&self) -> bool {
        self.usage.values().all(BTreeMap::is_empty)
    }
}

/// Replaces placeholders throughout a devfile.
pub struct SubstitutionEngine {
    placeholder: Regex,
}

impl Default for SubstitutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SubstitutionEngine {
    pub fn new() -> Self {
        Self {
            placeholder: Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"),
        }
    }

    /// Substitute placeholders in a single string.
    ///
    /// Every name seen is pushed to `used`. Unknown names leave the token as
    /// written.
    pub fn substitute(
        &self,
        input: &str,
        variables: &BTreeMap<String, String>,
        used: &mut BTreeSet<String>,
    ) -> String {
        if !input.contains("{{") {
            return input.to_string();
        }

        self.placeholder
            .replace_all(input, |caps: &Captures<'_>| {
                let name = &caps[1];
                used.insert(name.to_string());
                match variables.get(name) {
                    Some(value) => value.clone(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Substitute every eligible string field of `devfile` in place.
    pub fn apply(
        &self,
        devfile: &mut Devfile,
        variables: &BTreeMap<String, String>,
    ) -> UsageRecord {
        let mut walker = Walker {
            engine: self,
            variables,
            usage: UsageRecord::new(),
        };

        for command in &mut devfile.commands {
            let mut element = walker.element(Category::Commands, &command.id);
            match &mut command.kind {
                CommandKind::Exec(exec) => {
                    element.string(&mut exec.command_line);
                    element.optional(&mut exec.working_dir);
                    element.env(&mut exec.env);
                    element.optional(&mut exec.label);
                }
                CommandKind::Apply(apply) => element.optional(&mut apply.label),
                CommandKind::Composite(composite) => element.optional(&mut composite.label),
            }
            element.finish();
        }

        for component in &mut devfile.components {
            let mut element = walker.element(Category::Components, &component.name);
            match &mut component.kind {
                ComponentKind::Container(container) => {
                    element.string(&mut container.image);
                    element.optional(&mut container.memory_limit);
                    element.optional(&mut container.memory_request);
                    element.optional(&mut container.cpu_limit);
                    element.optional(&mut container.cpu_request);
                    element.optional(&mut container.source_mapping);
                    element.list(&mut container.command);
                    element.list(&mut container.args);
                    element.env(&mut container.env);
                    for mount in &mut container.volume_mounts {
                        element.optional(&mut mount.path);
                    }
                    element.endpoints(&mut container.endpoints);
                }
                ComponentKind::Kubernetes(manifest) | ComponentKind::Openshift(manifest) => {
                    element.optional(&mut manifest.uri);
                    element.optional(&mut manifest.inlined);
                    element.endpoints(&mut manifest.endpoints);
                }
                ComponentKind::Volume(volume) => element.optional(&mut volume.size),
                ComponentKind::Image(image) => {
                    element.string(&mut image.image_name);
                    if let Some(dockerfile) = &mut image.dockerfile {
                        element.optional(&mut dockerfile.uri);
                        element.optional(&mut dockerfile.build_context);
                        element.list(&mut dockerfile.args);
                    }
                }
            }
            element.finish();
        }

        for project in &mut devfile.projects {
            let mut element = walker.element(Category::Projects, &project.name);
            element.optional(&mut project.clone_path);
            element.source(&mut project.source);
            element.finish();
        }

        for starter in &mut devfile.starter_projects {
            let mut element = walker.element(Category::StarterProjects, &starter.name);
            element.optional(&mut starter.description);
            element.optional(&mut starter.sub_dir);
            element.source(&mut starter.source);
            element.finish();
        }

        walker.usage
    }
}

/// Carries the engine and usage record across the walk.
struct Walker<'e> {
    engine: &'e SubstitutionEngine,
    variables: &'e BTreeMap<String, String>,
    usage: UsageRecord,
}

impl<'e> Walker<'e> {
    fn element<'w>(&'w mut self, category: Category, name: &str) -> ElementScope<'w, 'e> {
        ElementScope {
            walker: self,
            category,
            name: name.to_string(),
            used: BTreeSet::new(),
        }
    }
}

/// Substitution within one command, component or project.
struct ElementScope<'w, 'e> {
    walker: &'w mut Walker<'e>,
    category: Category,
    name: String,
    used: BTreeSet<String>,
}

impl ElementScope<'_, '_> {
    fn string(&mut self, value: &mut String) {
        let engine = self.walker.engine;
        *value = engine.substitute(value, self.walker.variables, &mut self.used);
    }

    fn optional(&mut self, value: &mut Option<String>) {
        if let Some(value) = value {
            self.string(value);
        }
    }

    fn list(&mut self, values: &mut [String]) {
        for value in values {
            self.string(value);
        }
    }

    fn env(&mut self, env: &mut [EnvVar]) {
        for var in env {
            self.string(&mut var.value);
        }
    }

    fn endpoints(&mut self, endpoints: &mut [Endpoint]) {
        for endpoint in endpoints {
            self.optional(&mut endpoint.exposure);
            self.optional(&mut endpoint.protocol);
            self.optional(&mut endpoint.path);
        }
    }

    fn source(&mut self, source: &mut ProjectSource) {
        match source {
            ProjectSource::Git(git) => {
                for remote in git.remotes.values_mut() {
                    self.string(remote);
                }
                if let Some(checkout) = &mut git.checkout_from {
                    self.optional(&mut checkout.remote);
                    self.optional(&mut checkout.revision);
                }
            }
            ProjectSource::Zip(zip) => self.string(&mut zip.location),
        }
    }

    fn finish(self) {
        if self.used.is_empty() {
            return;
        }
        debug!(
            "{} '{}' references {:?}",
            self.category, self.name, self.used
        );
        for variable in &self.used {
            self.walker.usage.record(self.category, &self.name, variable);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devfile_spec::DevfileReader;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_whitespace_variants() {
        let engine = SubstitutionEngine::new();
        let variables = vars(&[("PARAMS", "bar")]);
        let mut used = BTreeSet::new();

        assert_eq!(
            engine.substitute("{{PARAMS}} {{ PARAMS }} {{   PARAMS\t}}", &variables, &mut used),
            "bar bar bar"
        );
        assert_eq!(used, BTreeSet::from(["PARAMS".to_string()]));
    }

    #[test]
    fn test_environment_references_untouched() {
        let engine = SubstitutionEngine::new();
        let variables = vars(&[("PROJECT_SOURCE", "/projects")]);
        let mut used = BTreeSet::new();

        let output = engine.substitute("${PROJECT_SOURCE}/bin", &variables, &mut used);
        assert_eq!(output, "${PROJECT_SOURCE}/bin");
        assert!(used.is_empty());
    }

    #[test]
    fn test_unresolved_token_left_verbatim() {
        let engine = SubstitutionEngine::new();
        let mut used = BTreeSet::new();

        let output = engine.substitute("./main {{ MISSING }}", &BTreeMap::new(), &mut used);
        assert_eq!(output, "./main {{ MISSING }}");
        assert!(used.contains("MISSING"));
    }

    #[test]
    fn test_substitution_is_not_recursive() {
        let engine = SubstitutionEngine::new();
        let variables = vars(&[("A", "{{ B }}"), ("B", "b")]);
        let mut used = BTreeSet::new();

        assert_eq!(engine.substitute("{{ A }}", &variables, &mut used), "{{ B }}");
        assert_eq!(used, BTreeSet::from(["A".to_string()]));
    }

    #[test]
    fn test_placeholder_grammar() {
        let engine = SubstitutionEngine::new();
        let variables = vars(&[("a", "1"), ("b-c", "2"), ("e_1", "3")]);
        let mut used = BTreeSet::new();

        let input = "{{ a }}-{{b-c}}-${d}-{{ e_1 }}-{{ not valid! }}";
        assert_eq!(
            engine.substitute(input, &variables, &mut used),
            "1-2-${d}-3-{{ not valid! }}"
        );
        assert_eq!(used.len(), 3);
    }

    #[test]
    fn test_apply_walks_categories() {
        let yaml = r#"
schemaVersion: 2.2.0
commands:
  - id: run
    exec:
      commandLine: ./main {{ PARAMS }}
      component: runtime
      workingDir: ${PROJECT_SOURCE}
components:
  - name: runtime
    container:
      image: golang:{{ TAG }}
      env:
        - name: MODE
          value: "{{ MODE }}"
  - name: deploy
    kubernetes:
      inlined: "image: my-python-image:{{ PARAMS }}"
projects:
  - name: app
    git:
      remotes:
        origin: https://github.com/{{ ORG }}/app.git
      checkoutFrom:
        revision: "{{ BRANCH }}"
starterProjects:
  - name: starter
    zip:
      location: https://example.com/{{ ORG }}.zip
"#;
        let mut devfile = DevfileReader::parse_str(yaml).unwrap();
        let variables = vars(&[("PARAMS", "bar"), ("TAG", "1.21"), ("ORG", "acme")]);

        let usage = SubstitutionEngine::new().apply(&mut devfile, &variables);

        let exec = devfile.command("run").unwrap().exec().unwrap();
        assert_eq!(exec.command_line, "./main bar");
        assert_eq!(exec.working_dir.as_deref(), Some("${PROJECT_SOURCE}"));

        let runtime = devfile.component("runtime").unwrap().container().unwrap();
        assert_eq!(runtime.image, "golang:1.21");
        assert_eq!(runtime.env[0].value, "{{ MODE }}");

        let deploy = devfile.component("deploy").unwrap().manifest().unwrap();
        assert_eq!(deploy.inline_content(), Some("image: my-python-image:bar"));

        assert_eq!(
            usage.variables_in(Category::Components),
            BTreeSet::from(["MODE", "PARAMS", "TAG"])
        );
        assert_eq!(usage.variables_in(Category::Commands), BTreeSet::from(["PARAMS"]));
        assert_eq!(
            usage.variables_in(Category::Projects),
            BTreeSet::from(["BRANCH", "ORG"])
        );
        assert!(usage.is_used("ORG"));
        assert!(!usage.is_used("PROJECT_SOURCE"));

        let starters: Vec<_> = usage.elements(Category::StarterProjects).collect();
        assert_eq!(starters.len(), 1);
        assert_eq!(starters[0].0, "starter");
    }

    #[test]
    fn test_identities_and_attributes_not_substituted() {
        let yaml = r#"
schemaVersion: 2.2.0
components:
  - name: "{{ NAME }}"
    attributes:
      note: "{{ PARAMS }}"
    container:
      image: golang
"#;
        let mut devfile = DevfileReader::parse_str(yaml).unwrap();
        let variables = vars(&[("NAME", "x"), ("PARAMS", "y")]);
        let usage = SubstitutionEngine::new().apply(&mut devfile, &variables);

        assert_eq!(devfile.components[0].name, "{{ NAME }}");
        assert_eq!(
            devfile.components[0].attributes.get_string("note"),
            Some("{{ PARAMS }}")
        );
        assert!(usage.is_empty());
    }

    #[test]
    fn test_apply_is_deterministic() {
        let yaml = r#"
schemaVersion: 2.2.0
commands:
  - id: run
    exec:
      commandLine: '{{ B }} {{ A }} {{ B }}'
      component: c
"#;
        let variables = vars(&[("A", "1"), ("B", "2")]);
        let engine = SubstitutionEngine::new();

        let mut first = DevfileReader::parse_str(yaml).unwrap();
        let mut second = first.clone();
        let first_usage = engine.apply(&mut first, &variables);
        let second_usage = engine.apply(&mut second, &variables);

        assert_eq!(first, second);
        assert_eq!(first_usage, second_usage);
        assert_eq!(first.commands[0].exec().unwrap().command_line, "2 1 2");
    }
}
