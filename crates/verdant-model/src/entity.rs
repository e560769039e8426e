use crate::attribute::AttributeDefinition;
use crate::relation::RelationshipDefinition;
use crate::view::View;
use crate::{ValidationError, MAX_TYPE_NAME_LEN, URN_TYPE_PREFIX};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum EntityClass {
    Core,
    Reference,
    Relation,
    Meta,
}

impl EntityClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Reference => "reference",
            Self::Relation => "relation",
            Self::Meta => "meta",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntitySchema {
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityTypeDefinition {
    pub urn: String,
    pub name: String,
    pub domain: String,
    pub class: EntityClass,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_fsm_urn: Option<String>,
    pub schema: EntitySchema,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub views: BTreeMap<String, View>,
}

impl EntityTypeDefinition {
    /// Short type name derived from the URN.
    #[must_use]
    pub fn short_name(&self) -> &str {
        crate::short_type_name(&self.urn)
    }

    /// Structural checks a single file must pass before it joins the
    /// registry. Cross-entity and field-level rules are the registry
    /// validator's job, which collects every violation in one pass.
    pub fn validate_structure(&self) -> Result<(), ValidationError> {
        if self.urn.trim().is_empty() {
            return Err(ValidationError("entity urn must not be empty".to_string()));
        }
        if !self.urn.starts_with(URN_TYPE_PREFIX) {
            return Err(ValidationError(format!(
                "entity urn {:?} must start with {URN_TYPE_PREFIX:?}",
                self.urn
            )));
        }
        let short = self.short_name();
        if short.is_empty() || short.len() > MAX_TYPE_NAME_LEN {
            return Err(ValidationError(format!(
                "entity type name {short:?} must be 1..={MAX_TYPE_NAME_LEN} chars"
            )));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError(format!(
                "entity {} has an empty display name",
                self.urn
            )));
        }
        if self.domain.trim().is_empty() {
            return Err(ValidationError(format!(
                "entity {} has an empty domain",
                self.urn
            )));
        }
        Ok(())
    }
}

/// One registry definition file: `{ "entity_type": { … } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityTypeFile {
    pub entity_type: EntityTypeDefinition,
}
