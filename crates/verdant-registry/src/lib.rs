#![forbid(unsafe_code)]
//! Load → Validate → Build pipeline for the entity-type registry.
//!
//! The registry is read at process start from ordered definition files,
//! checked as a whole, compiled into an adjacency graph, and never
//! modified afterwards. Any failure here aborts startup; there is no
//! partially-initialized registry.

mod graph;
mod handle;
mod loader;
mod validate;

pub use graph::{RegistryEdge, RegistryGraph, RegistryStats};
pub use handle::{BootstrapError, Registry, RegistryMetadata};
pub use loader::{LoadError, LoadedFile, LoadedRegistry, RegistryLoader, REGISTRY_FILE_SUFFIX};
pub use validate::{validate_definitions, IssueSeverity, ValidationIssue, ValidationReport};

pub const CRATE_NAME: &str = "verdant-registry";
