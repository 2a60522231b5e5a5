//! Devfile validation.
//!
//! Validation runs in two passes: the embedded JSON schema checks structure,
//! then semantic rules check cross references the schema cannot express
//! (unique identities, command targets, default command groups).

use std::collections::{BTreeMap, HashSet};

use jsonschema::JSONSchema;
use serde_json::Value;
use tracing::debug;

use crate::error::{SpecError, SpecResult};
use crate::models::{CommandKind, ComponentKind, ComponentType, Devfile};
use crate::reader::DevfileReader;

/// Embedded devfile 2.x schema.
pub const DEVFILE_SCHEMA: &str = include_str!("../schema/devfile-2.x.json");

/// Validates a resolved devfile.
///
/// Returns the list of human-readable violations on failure.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, devfile: &Devfile) -> Result<(), Vec<String>>;
}

/// Validation result with details.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn into_result(self) -> Result<(), Vec<String>> {
        if self.valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Default validator: embedded JSON schema plus semantic rules.
pub struct DevfileValidator {
    schema: JSONSchema,
}

impl DevfileValidator {
    /// Compile the embedded schema.
    pub fn new() -> SpecResult<Self> {
        Self::with_schema(DEVFILE_SCHEMA)
    }

    /// Compile a caller-provided schema document.
    pub fn with_schema(schema: &str) -> SpecResult<Self> {
        let schema_json: Value = serde_json::from_str(schema)?;
        let schema =
            JSONSchema::compile(&schema_json).map_err(|e| SpecError::Schema(e.to_string()))?;
        Ok(Self { schema })
    }

    /// Run both validation passes.
    pub fn check(&self, devfile: &Devfile) -> ValidationResult {
        let mut result = ValidationResult::new();

        match DevfileReader::to_value(devfile) {
            Ok(instance) => result.merge(self.check_schema(&instance)),
            Err(e) => result.add_error(format!("devfile cannot be encoded: {}", e)),
        }
        result.merge(Self::check_semantics(devfile));

        debug!(
            "Validation finished: {} errors, {} warnings",
            result.errors.len(),
            result.warnings.len()
        );
        result
    }

    /// Check a JSON tree against the schema.
    pub fn check_schema(&self, instance: &Value) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Err(errors) = self.schema.validate(instance) {
            for error in errors {
                let path = error.instance_path.to_string();
                let path = if path.is_empty() { "/".to_string() } else { path };
                result.add_error(format!("{}: {}", path, error));
            }
        }

        result
    }

    /// Cross-reference rules.
    pub fn check_semantics(devfile: &Devfile) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.merge(Self::check_unique(
            "component",
            devfile.components.iter().map(|c| c.name.as_str()),
        ));
        result.merge(Self::check_unique(
            "command",
            devfile.commands.iter().map(|c| c.id.as_str()),
        ));
        result.merge(Self::check_unique(
            "project",
            devfile.projects.iter().map(|p| p.name.as_str()),
        ));
        result.merge(Self::check_unique(
            "starter project",
            devfile.starter_projects.iter().map(|p| p.name.as_str()),
        ));
        result.merge(Self::check_components(devfile));
        result.merge(Self::check_commands(devfile));
        result.merge(Self::check_events(devfile));

        result
    }

    fn check_unique<'a>(what: &str, names: impl Iterator<Item = &'a str>) -> ValidationResult {
        let mut result = ValidationResult::new();
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();

        for name in names {
            if !seen.insert(name) && reported.insert(name) {
                result.add_error(format!("Duplicate {} name '{}'", what, name));
            }
        }

        result
    }

    fn check_components(devfile: &Devfile) -> ValidationResult {
        let mut result = ValidationResult::new();
        let volumes: HashSet<&str> = devfile
            .components_of(ComponentType::Volume)
            .map(|c| c.name.as_str())
            .collect();

        for component in &devfile.components {
            match &component.kind {
                ComponentKind::Kubernetes(manifest) | ComponentKind::Openshift(manifest) => {
                    if manifest.has_both_locators() {
                        result.add_error(format!(
                            "Component '{}' sets both uri and inlined",
                            component.name
                        ));
                    } else if manifest.locator().is_none() {
                        result.add_error(format!(
                            "Component '{}' must set either uri or inlined",
                            component.name
                        ));
                    }
                }
                ComponentKind::Container(container) => {
                    for mount in &container.volume_mounts {
                        if !volumes.contains(mount.name.as_str()) {
                            result.add_error(format!(
                                "Container '{}' mounts unknown volume '{}'",
                                component.name, mount.name
                            ));
                        }
                    }
                }
                ComponentKind::Volume(_) | ComponentKind::Image(_) => {}
            }
        }

        result
    }

    fn check_commands(devfile: &Devfile) -> ValidationResult {
        let mut result = ValidationResult::new();
        let mut defaults: BTreeMap<_, Vec<&str>> = BTreeMap::new();
        let mut grouped: BTreeMap<_, usize> = BTreeMap::new();

        for command in &devfile.commands {
            match &command.kind {
                CommandKind::Exec(exec) => match devfile.component(&exec.component) {
                    None => result.add_error(format!(
                        "Command '{}' references unknown component '{}'",
                        command.id, exec.component
                    )),
                    Some(target) if target.component_type() != ComponentType::Container => {
                        result.add_error(format!(
                            "Exec command '{}' must reference a container component, \
                             '{}' is a {} component",
                            command.id,
                            exec.component,
                            target.component_type()
                        ))
                    }
                    Some(_) => {}
                },
                CommandKind::Apply(apply) => match devfile.component(&apply.component) {
                    None => result.add_error(format!(
                        "Command '{}' references unknown component '{}'",
                        command.id, apply.component
                    )),
                    Some(target)
                        if matches!(
                            target.component_type(),
                            ComponentType::Container | ComponentType::Volume
                        ) =>
                    {
                        result.add_error(format!(
                            "Apply command '{}' must reference an image, kubernetes or openshift \
                             component, '{}' is a {} component",
                            command.id,
                            apply.component,
                            target.component_type()
                        ))
                    }
                    Some(_) => {}
                },
                CommandKind::Composite(composite) => {
                    for sub in &composite.commands {
                        if sub == &command.id {
                            result.add_error(format!(
                                "Composite command '{}' references itself",
                                command.id
                            ));
                        } else if devfile.command(sub).is_none() {
                            result.add_error(format!(
                                "Composite command '{}' references unknown command '{}'",
                                command.id, sub
                            ));
                        }
                    }
                }
            }

            if let Some(group) = command.group() {
                *grouped.entry(group.kind).or_default() += 1;
                if group.is_default() {
                    defaults.entry(group.kind).or_default().push(&command.id);
                }
            }
        }

        for (kind, ids) in &defaults {
            if ids.len() > 1 {
                result.add_error(format!(
                    "Command group '{}' has more than one default command: {}",
                    kind,
                    ids.join(", ")
                ));
            }
        }

        for (kind, count) in &grouped {
            if *count > 1 && !defaults.contains_key(kind) {
                result.add_warning(format!(
                    "Command group '{}' has {} commands but none is marked default",
                    kind, count
                ));
            }
        }

        result
    }

    fn check_events(devfile: &Devfile) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(events) = &devfile.events {
            for (event, id) in events.bindings() {
                if devfile.command(id).is_none() {
                    result.add_error(format!(
                        "Event '{}' references unknown command '{}'",
                        event, id
                    ));
                }
            }
        }

        result
    }
}

impl SchemaValidator for DevfileValidator {
    fn validate(&self, devfile: &Devfile) -> Result<(), Vec<String>> {
        self.check(devfile).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
schemaVersion: 2.2.0
components:
  - name: runtime
    container:
      image: golang:latest
      volumeMounts:
        - name: cache
          path: /cache
      endpoints:
        - name: http
          targetPort: 8080
  - name: cache
    volume:
      size: 1Gi
  - name: outerloop-deploy
    kubernetes:
      inlined: |
        kind: Deployment
commands:
  - id: build
    exec:
      commandLine: go build
      component: runtime
      group:
        kind: build
        isDefault: true
  - id: deploy
    apply:
      component: outerloop-deploy
  - id: all
    composite:
      commands: [build, deploy]
events:
  postStart: [build]
"#;

    fn parse(yaml: &str) -> Devfile {
        DevfileReader::parse_str(yaml).unwrap()
    }

    #[test]
    fn test_valid_devfile() {
        let validator = DevfileValidator::new().unwrap();
        let result = validator.check(&parse(VALID));
        assert!(result.valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_schema_rejects_bad_schema_version() {
        let validator = DevfileValidator::new().unwrap();
        let mut devfile = parse(VALID);
        devfile.schema_version = "1.0.0".to_string();

        let errors = validator.validate(&devfile).unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("/schemaVersion")), "{:?}", errors);
    }

    #[test]
    fn test_schema_rejects_bad_component_name() {
        let validator = DevfileValidator::new().unwrap();
        let mut devfile = parse(VALID);
        devfile.components[0].name = "Runtime_1".to_string();

        let result = validator.check(&devfile);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.starts_with("/components/0/name")));
    }

    #[test]
    fn test_duplicate_names() {
        let mut devfile = parse(VALID);
        let copy = devfile.components[1].clone();
        devfile.components.push(copy.clone());
        devfile.components.push(copy);

        let result = DevfileValidator::check_semantics(&devfile);
        assert_eq!(result.errors, vec!["Duplicate component name 'cache'".to_string()]);
    }

    #[test]
    fn test_unknown_component_reference() {
        let devfile = parse(
            r#"
schemaVersion: 2.2.0
commands:
  - id: run
    exec:
      commandLine: ./main
      component: missing
"#,
        );
        let result = DevfileValidator::check_semantics(&devfile);
        assert!(!result.valid);
        assert!(result.errors[0].contains("unknown component 'missing'"));
    }

    #[test]
    fn test_exec_must_target_container() {
        let mut devfile = parse(VALID);
        if let CommandKind::Exec(exec) = &mut devfile.commands[0].kind {
            exec.component = "cache".to_string();
        }
        let result = DevfileValidator::check_semantics(&devfile);
        assert!(result.errors.iter().any(|e| e.contains("must reference a container")));
    }

    #[test]
    fn test_manifest_locators() {
        let validator = DevfileValidator::new().unwrap();
        let mut devfile = parse(VALID);
        if let Some(manifest) = devfile.components[2].manifest_mut() {
            manifest.uri = Some("http://example.com/deploy.yaml".to_string());
        }
        let result = validator.check(&devfile);
        assert!(result.errors.iter().any(|e| e.contains("sets both uri and inlined")));

        if let Some(manifest) = devfile.components[2].manifest_mut() {
            manifest.uri = None;
            manifest.inlined = None;
        }
        let result = DevfileValidator::check_semantics(&devfile);
        assert!(result.errors.iter().any(|e| e.contains("either uri or inlined")));
    }

    #[test]
    fn test_multiple_defaults_in_group() {
        let mut devfile = parse(VALID);
        let mut second = devfile.commands[0].clone();
        second.id = "build-again".to_string();
        devfile.commands.push(second);

        let result = DevfileValidator::check_semantics(&devfile);
        assert!(result.errors.iter().any(|e| e.contains("more than one default")));
    }

    #[test]
    fn test_events_reference_commands() {
        let mut devfile = parse(VALID);
        if let Some(events) = devfile.events.as_mut() {
            events.pre_stop.push("cleanup".to_string());
        }
        let result = DevfileValidator::check_semantics(&devfile);
        assert_eq!(
            result.errors,
            vec!["Event 'preStop' references unknown command 'cleanup'".to_string()]
        );
    }
}
