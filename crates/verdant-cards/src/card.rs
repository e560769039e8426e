use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use verdant_model::{
    AttributeKind, Cardinality, EntityClass, EnumOption, ImpactAnnotation, RelationKind, View,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAttribute {
    pub name: String,
    pub kind: AttributeKind,
    pub required: bool,
    /// Set for conventional audit fields; never writable through any
    /// mutation path.
    pub readonly: bool,
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_options: Vec<EnumOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRelation {
    pub name: String,
    /// Target entity-type URN.
    pub target: String,
    /// Target short type name, the key traversal works with.
    pub target_type: String,
    /// Target display name.
    pub target_name: String,
    pub cardinality: Cardinality,
    pub kind: RelationKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<ImpactAnnotation>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardState {
    pub code: String,
    pub label: String,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLifecycle {
    pub initial_state: String,
    pub states: Vec<CardState>,
    pub transitions: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPermissions {
    pub create: Vec<String>,
    pub read: Vec<String>,
    pub update: Vec<String>,
    pub delete: Vec<String>,
    pub archive: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMetadata {
    pub domain: String,
    pub class: EntityClass,
    pub description: String,
}

/// Compiled projection of one entity type. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCard {
    /// Short type name, e.g. `role`.
    pub entity_type: String,
    pub urn: String,
    pub name: String,
    pub attributes: Vec<CardAttribute>,
    pub relations: Vec<CardRelation>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub views: BTreeMap<String, View>,
    pub lifecycle: CardLifecycle,
    pub permissions: CardPermissions,
    pub metadata: CardMetadata,
    /// Structural-shape hash; changes whenever the definition's schema
    /// changes, which is what downstream caches key on.
    pub fingerprint: String,
}

impl EntityCard {
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&CardRelation> {
        self.relations.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&CardAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    #[must_use]
    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.get(name)
    }
}
