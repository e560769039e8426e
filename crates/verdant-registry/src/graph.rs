use std::collections::{BTreeMap, BTreeSet, VecDeque};
use verdant_model::{Cardinality, EntityClass, EntityTypeDefinition, URN_TYPE_PREFIX};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RegistryEdge {
    pub from: String,
    pub to: String,
    pub relation: String,
    pub cardinality: Cardinality,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RegistryStats {
    pub entities: usize,
    pub relations: usize,
    pub by_class: BTreeMap<String, usize>,
    pub by_domain: BTreeMap<String, usize>,
}

/// Adjacency index over validated entity-type definitions.
///
/// Serves tooling queries (dependency listings, domain filters, stats);
/// the hot traversal path reads compiled entity cards instead.
#[derive(Debug, Clone)]
pub struct RegistryGraph {
    nodes: BTreeMap<String, EntityTypeDefinition>,
    /// short type name -> full URN
    short_names: BTreeMap<String, String>,
    outgoing: BTreeMap<String, Vec<RegistryEdge>>,
    incoming: BTreeMap<String, Vec<RegistryEdge>>,
    edge_count: usize,
}

impl RegistryGraph {
    /// Builds the index. Relationships whose target is not among the
    /// definitions produce no edge; the validator has already rejected
    /// such registries before this runs on the bootstrap path.
    #[must_use]
    pub fn new(definitions: Vec<EntityTypeDefinition>) -> Self {
        let mut nodes = BTreeMap::new();
        let mut short_names = BTreeMap::new();
        for def in definitions {
            short_names.insert(def.short_name().to_string(), def.urn.clone());
            nodes.insert(def.urn.clone(), def);
        }

        let mut outgoing: BTreeMap<String, Vec<RegistryEdge>> = BTreeMap::new();
        let mut incoming: BTreeMap<String, Vec<RegistryEdge>> = BTreeMap::new();
        let mut edge_count = 0;
        for def in nodes.values() {
            for rel in &def.schema.relationships {
                if !nodes.contains_key(&rel.target) {
                    continue;
                }
                let edge = RegistryEdge {
                    from: def.urn.clone(),
                    to: rel.target.clone(),
                    relation: rel.name.clone(),
                    cardinality: rel.cardinality,
                    required: rel.required,
                };
                outgoing.entry(def.urn.clone()).or_default().push(edge.clone());
                incoming.entry(rel.target.clone()).or_default().push(edge);
                edge_count += 1;
            }
        }

        Self {
            nodes,
            short_names,
            outgoing,
            incoming,
            edge_count,
        }
    }

    /// Resolve a short type name or full URN to the canonical URN.
    #[must_use]
    pub fn resolve_urn(&self, entity_type: &str) -> Option<&str> {
        if entity_type.starts_with(URN_TYPE_PREFIX) {
            self.nodes.get_key_value(entity_type).map(|(k, _)| k.as_str())
        } else {
            self.short_names.get(entity_type).map(String::as_str)
        }
    }

    #[must_use]
    pub fn definition(&self, entity_type: &str) -> Option<&EntityTypeDefinition> {
        let urn = self.resolve_urn(entity_type)?;
        self.nodes.get(urn)
    }

    #[must_use]
    pub fn contains(&self, entity_type: &str) -> bool {
        self.resolve_urn(entity_type).is_some()
    }

    pub fn all(&self) -> impl Iterator<Item = &EntityTypeDefinition> {
        self.nodes.values()
    }

    #[must_use]
    pub fn by_domain(&self, domain: &str) -> Vec<&EntityTypeDefinition> {
        self.nodes.values().filter(|d| d.domain == domain).collect()
    }

    #[must_use]
    pub fn by_class(&self, class: EntityClass) -> Vec<&EntityTypeDefinition> {
        self.nodes.values().filter(|d| d.class == class).collect()
    }

    #[must_use]
    pub fn outgoing(&self, urn: &str) -> &[RegistryEdge] {
        self.outgoing.get(urn).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn incoming(&self, urn: &str) -> &[RegistryEdge] {
        self.incoming.get(urn).map_or(&[], Vec::as_slice)
    }

    /// Entity types this entity points at.
    #[must_use]
    pub fn dependencies(&self, urn: &str) -> Vec<&str> {
        let mut out: BTreeSet<&str> = BTreeSet::new();
        for edge in self.outgoing(urn) {
            out.insert(edge.to.as_str());
        }
        out.into_iter().collect()
    }

    /// Entity types pointing at this entity.
    #[must_use]
    pub fn dependents(&self, urn: &str) -> Vec<&str> {
        let mut out: BTreeSet<&str> = BTreeSet::new();
        for edge in self.incoming(urn) {
            out.insert(edge.from.as_str());
        }
        out.into_iter().collect()
    }

    /// Every entity type reachable by following incoming edges, i.e. the
    /// transitive blast radius of changing this type's definition.
    #[must_use]
    pub fn transitive_dependents(&self, urn: &str) -> Vec<String> {
        let mut reached: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(urn.to_string());
        while let Some(current) = queue.pop_front() {
            for dependent in self.dependents(&current) {
                if dependent != urn && reached.insert(dependent.to_string()) {
                    queue.push_back(dependent.to_string());
                }
            }
        }
        reached.into_iter().collect()
    }

    #[must_use]
    pub fn domains(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.nodes.values().map(|d| d.domain.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let mut by_class: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_domain: BTreeMap<String, usize> = BTreeMap::new();
        for def in self.nodes.values() {
            *by_class.entry(def.class.as_str().to_string()).or_default() += 1;
            *by_domain.entry(def.domain.clone()).or_default() += 1;
        }
        RegistryStats {
            entities: self.nodes.len(),
            relations: self.edge_count,
            by_class,
            by_domain,
        }
    }
}
