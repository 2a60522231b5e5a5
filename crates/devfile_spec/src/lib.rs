//! # devfile_spec
//!
//! Data model, decoding and validation for devfile 2.x documents.
//!
//! A devfile describes a cloud-native development environment: the
//! containers and Kubernetes manifests it runs, the commands it offers, and
//! the projects it checks out. This crate provides:
//!
//! - **Models**: typed components, commands, projects and events
//! - **Attributes**: free-form attribute bags with typed getters, including
//!   the provenance key stamped on manifests inlined from a URI
//! - **Reader**: YAML/JSON decoding and encoding
//! - **Validation**: embedded JSON schema plus semantic cross-reference rules
//!
//! ## Example
//!
//! ```rust,no_run
//! use devfile_spec::{DevfileReader, DevfileValidator, SchemaValidator};
//!
//! let devfile = DevfileReader::read_file("devfile.yaml").unwrap();
//! let validator = DevfileValidator::new().unwrap();
//! if let Err(violations) = validator.validate(&devfile) {
//!     for violation in &violations {
//!         eprintln!("Error: {}", violation);
//!     }
//! }
//! ```

pub mod attributes;
pub mod error;
pub mod models;
pub mod reader;
pub mod validator;

pub use attributes::{Attributes, KUBE_COMPONENT_ORIGINAL_URI_KEY};
pub use error::{SpecError, SpecResult};
pub use models::*;
pub use reader::DevfileReader;
pub use validator::{DevfileValidator, SchemaValidator, ValidationResult, DEVFILE_SCHEMA};
