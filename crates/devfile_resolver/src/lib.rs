//! # devfile_resolver
//!
//! Turns a devfile into a self-contained, validated document.
//!
//! - **Reference resolution**: Kubernetes and OpenShift manifests given by
//!   URI are fetched concurrently and inlined, with the original URI kept as
//!   a component attribute
//! - **Variables**: document variables overlaid by caller-supplied ones
//! - **Substitution**: `{{ NAME }}` placeholders replaced across commands,
//!   components and projects, inlined manifests included
//! - **Warnings**: undefined references per element, plus unused variables
//!
//! ## Example
//!
//! ```rust,no_run
//! use devfile_resolver::{parse_devfile_and_validate, ParserArgs};
//!
//! # async fn run() -> devfile_resolver::ResolveResult<()> {
//! let args = ParserArgs::from_path("devfile.yaml").with_variable("PARAMS", "bar");
//! let result = parse_devfile_and_validate(&args).await?;
//! println!("{:?}", result.variable_warning);
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod error;
pub mod parser;
pub mod reference;
pub mod substitution;
pub mod variables;
pub mod warnings;

pub use args::ParserArgs;
pub use error::{ResolveError, ResolveResult};
pub use parser::{parse_devfile_and_validate, DevfileParser, ParsedResult};
pub use reference::ReferenceResolver;
pub use substitution::{Category, SubstitutionEngine, UsageRecord, PLACEHOLDER_PATTERN};
pub use variables::{VariableContext, VariableSource};
pub use warnings::{VariableReport, VariableWarning, WarningAggregator};
