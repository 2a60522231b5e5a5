//! Data models for devfiles.
//!
//! Field names follow the devfile 2.x wire format (camelCase). Empty
//! collections and unset optionals are omitted when a devfile is written back
//! out, so a decode/encode cycle does not grow the document.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attributes::{Attributes, KUBE_COMPONENT_ORIGINAL_URI_KEY};

/// Root devfile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Devfile {
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// Parent reference. Kept verbatim; parent merging is not performed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub starter_projects: Vec<StarterProject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Events>,
}

impl Devfile {
    pub fn new(schema_version: impl Into<String>) -> Self {
        Self {
            schema_version: schema_version.into(),
            metadata: None,
            variables: BTreeMap::new(),
            attributes: Attributes::new(),
            parent: None,
            projects: Vec::new(),
            starter_projects: Vec::new(),
            components: Vec::new(),
            commands: Vec::new(),
            events: None,
        }
    }

    /// Find a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Iterate over the components of one kind, in document order.
    pub fn components_of(&self, kind: ComponentType) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(move |c| c.component_type() == kind)
    }

    /// Find a command by id.
    pub fn command(&self, id: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.id == id)
    }

    /// Components still pointing at an external manifest.
    pub fn unresolved_references(&self) -> impl Iterator<Item = ComponentReference<'_>> {
        self.components
            .iter()
            .filter_map(Component::reference)
            .filter(|r| matches!(r.locator, ManifestLocator::ByUri(_)))
    }
}

/// Devfile metadata block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub architectures: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_memory_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_url: Option<String>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// A named component. Exactly one kind is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub name: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(flatten)]
    pub kind: ComponentKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    Container(ContainerComponent),
    Kubernetes(ManifestComponent),
    Openshift(ManifestComponent),
    Volume(VolumeComponent),
    Image(ImageComponent),
}

/// Discriminant of [`ComponentKind`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Container,
    Kubernetes,
    Openshift,
    Volume,
    Image,
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentType::Container => "container",
            ComponentType::Kubernetes => "kubernetes",
            ComponentType::Openshift => "openshift",
            ComponentType::Volume => "volume",
            ComponentType::Image => "image",
        };
        f.write_str(name)
    }
}

impl Component {
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            kind,
        }
    }

    pub fn component_type(&self) -> ComponentType {
        match self.kind {
            ComponentKind::Container(_) => ComponentType::Container,
            ComponentKind::Kubernetes(_) => ComponentType::Kubernetes,
            ComponentKind::Openshift(_) => ComponentType::Openshift,
            ComponentKind::Volume(_) => ComponentType::Volume,
            ComponentKind::Image(_) => ComponentType::Image,
        }
    }

    /// Manifest block for Kubernetes and OpenShift components.
    pub fn manifest(&self) -> Option<&ManifestComponent> {
        match &self.kind {
            ComponentKind::Kubernetes(m) | ComponentKind::Openshift(m) => Some(m),
            _ => None,
        }
    }

    pub fn manifest_mut(&mut self) -> Option<&mut ManifestComponent> {
        match &mut self.kind {
            ComponentKind::Kubernetes(m) | ComponentKind::Openshift(m) => Some(m),
            _ => None,
        }
    }

    pub fn container(&self) -> Option<&ContainerComponent> {
        match &self.kind {
            ComponentKind::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Reference view of a manifest-bearing component.
    ///
    /// Returns `None` for kinds that cannot be given by reference, and for
    /// manifest components that carry neither a URI nor inline content.
    pub fn reference(&self) -> Option<ComponentReference<'_>> {
        let locator = self.manifest()?.locator()?;
        Some(ComponentReference {
            name: &self.name,
            kind: self.component_type(),
            locator,
        })
    }

    /// URI the inlined manifest was originally fetched from.
    pub fn original_uri(&self) -> Option<&str> {
        self.attributes.get_string(KUBE_COMPONENT_ORIGINAL_URI_KEY)
    }
}

/// `{name, kind, locator}` view of a reference-capable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentReference<'a> {
    pub name: &'a str,
    pub kind: ComponentType,
    pub locator: ManifestLocator<'a>,
}

/// Where a manifest's content lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestLocator<'a> {
    Inline(&'a str),
    ByUri(&'a str),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerComponent {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_sources: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_mapping: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedicated_pod: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<Endpoint>,
}

impl ContainerComponent {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }
}

/// Kubernetes or OpenShift manifest, given inline or by URI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inlined: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_by_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<Endpoint>,
}

impl ManifestComponent {
    pub fn by_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Default::default()
        }
    }

    pub fn inlined(content: impl Into<String>) -> Self {
        Self {
            inlined: Some(content.into()),
            ..Default::default()
        }
    }

    /// Non-empty URI, if any.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref().filter(|u| !u.is_empty())
    }

    /// Non-empty inline content, if any.
    pub fn inline_content(&self) -> Option<&str> {
        self.inlined.as_deref().filter(|c| !c.is_empty())
    }

    /// A URI takes precedence: a component with a URI still needs fetching.
    pub fn locator(&self) -> Option<ManifestLocator<'_>> {
        match (self.uri(), self.inline_content()) {
            (Some(uri), _) => Some(ManifestLocator::ByUri(uri)),
            (None, Some(content)) => Some(ManifestLocator::Inline(content)),
            (None, None) => None,
        }
    }

    pub fn has_both_locators(&self) -> bool {
        self.uri().is_some() && self.inline_content().is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeral: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageComponent {
    pub image_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_build: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<DockerfileImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerfileImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_context: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_required: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub name: String,
    pub target_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub id: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(flatten)]
    pub kind: CommandKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandKind {
    Exec(ExecCommand),
    Apply(ApplyCommand),
    Composite(CompositeCommand),
}

impl Command {
    pub fn new(id: impl Into<String>, kind: CommandKind) -> Self {
        Self {
            id: id.into(),
            attributes: Attributes::new(),
            kind,
        }
    }

    pub fn exec(&self) -> Option<&ExecCommand> {
        match &self.kind {
            CommandKind::Exec(e) => Some(e),
            _ => None,
        }
    }

    pub fn group(&self) -> Option<&CommandGroup> {
        match &self.kind {
            CommandKind::Exec(c) => c.group.as_ref(),
            CommandKind::Apply(c) => c.group.as_ref(),
            CommandKind::Composite(c) => c.group.as_ref(),
        }
    }

    /// Component targeted by exec and apply commands.
    pub fn target_component(&self) -> Option<&str> {
        match &self.kind {
            CommandKind::Exec(c) => Some(&c.component),
            CommandKind::Apply(c) => Some(&c.component),
            CommandKind::Composite(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecCommand {
    pub command_line: String,
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hot_reload_capable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<CommandGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCommand {
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<CommandGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeCommand {
    #[serde(default)]
    pub commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<CommandGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandGroup {
    pub kind: CommandGroupKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl CommandGroup {
    pub fn is_default(&self) -> bool {
        self.is_default.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandGroupKind {
    Build,
    Run,
    Test,
    Debug,
    Deploy,
}

impl fmt::Display for CommandGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandGroupKind::Build => "build",
            CommandGroupKind::Run => "run",
            CommandGroupKind::Test => "test",
            CommandGroupKind::Debug => "debug",
            CommandGroupKind::Deploy => "deploy",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_path: Option<String>,
    #[serde(flatten)]
    pub source: ProjectSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarterProject {
    pub name: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_dir: Option<String>,
    #[serde(flatten)]
    pub source: ProjectSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectSource {
    Git(GitSource),
    Zip(ZipSource),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitSource {
    #[serde(default)]
    pub remotes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_from: Option<CheckoutFrom>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutFrom {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipSource {
    pub location: String,
}

/// Lifecycle event bindings (lists of command ids).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Events {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_start: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_start: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_stop: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_stop: Vec<String>,
}

impl Events {
    /// All referenced command ids with the event they are bound to.
    pub fn bindings(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let pre_start = self.pre_start.iter().map(|c| ("preStart", c.as_str()));
        let post_start = self.post_start.iter().map(|c| ("postStart", c.as_str()));
        let pre_stop = self.pre_stop.iter().map(|c| ("preStop", c.as_str()));
        let post_stop = self.post_stop.iter().map(|c| ("postStop", c.as_str()));
        pre_start.chain(post_start).chain(pre_stop).chain(post_stop)
    }
}
