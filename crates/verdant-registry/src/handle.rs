use crate::graph::{RegistryGraph, RegistryStats};
use crate::loader::{LoadError, RegistryLoader};
use crate::validate::{validate_definitions, ValidationReport};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{info, warn};
use verdant_model::{EntityClass, EntityTypeDefinition};

#[derive(Debug)]
#[non_exhaustive]
pub enum BootstrapError {
    Load(LoadError),
    Validation(ValidationReport),
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "registry load failed: {err}"),
            Self::Validation(report) => write!(f, "registry validation failed\n{report}"),
        }
    }
}

impl std::error::Error for BootstrapError {}

impl From<LoadError> for BootstrapError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RegistryMetadata {
    pub version: String,
    pub checksum: String,
    #[serde(skip)]
    pub loaded_at: SystemTime,
    pub entity_count: usize,
    pub relation_count: usize,
}

/// The immutable registry handle.
///
/// Constructed exactly once at process start and shared by reference;
/// there is no mutable global and no rebuild path while serving.
#[derive(Debug)]
pub struct Registry {
    graph: RegistryGraph,
    metadata: RegistryMetadata,
}

impl Registry {
    /// Load → Validate → Build. Any load error or validation error fails
    /// the whole bootstrap; warnings are logged and tolerated.
    pub fn bootstrap(roots: Vec<PathBuf>) -> Result<Self, BootstrapError> {
        let loaded = RegistryLoader::new(roots).load()?;
        Self::from_definitions(loaded.definitions, loaded.checksum)
    }

    /// Build a registry from in-memory definitions. Runs the same
    /// validation as [`Registry::bootstrap`]; used by tests and tooling.
    pub fn from_definitions(
        definitions: Vec<EntityTypeDefinition>,
        checksum: String,
    ) -> Result<Self, BootstrapError> {
        let report = validate_definitions(&definitions);
        for warning in &report.warnings {
            warn!(%warning, "registry validation warning");
        }
        if !report.is_valid() {
            return Err(BootstrapError::Validation(report));
        }

        let graph = RegistryGraph::new(definitions);
        let metadata = RegistryMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            checksum,
            loaded_at: SystemTime::now(),
            entity_count: graph.len(),
            relation_count: graph.edge_count(),
        };

        let stats = graph.stats();
        info!(
            entities = metadata.entity_count,
            relations = metadata.relation_count,
            checksum = %metadata.checksum,
            domains = ?graph.domains(),
            by_class = ?stats.by_class,
            "registry bootstrap complete"
        );

        Ok(Self { graph, metadata })
    }

    #[must_use]
    pub fn metadata(&self) -> &RegistryMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn graph(&self) -> &RegistryGraph {
        &self.graph
    }

    #[must_use]
    pub fn definition(&self, entity_type: &str) -> Option<&EntityTypeDefinition> {
        self.graph.definition(entity_type)
    }

    #[must_use]
    pub fn contains(&self, entity_type: &str) -> bool {
        self.graph.contains(entity_type)
    }

    pub fn all(&self) -> impl Iterator<Item = &EntityTypeDefinition> {
        self.graph.all()
    }

    #[must_use]
    pub fn by_domain(&self, domain: &str) -> Vec<&EntityTypeDefinition> {
        self.graph.by_domain(domain)
    }

    #[must_use]
    pub fn by_class(&self, class: EntityClass) -> Vec<&EntityTypeDefinition> {
        self.graph.by_class(class)
    }

    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        self.graph.stats()
    }
}
