#![forbid(unsafe_code)]
//! Registry data model SSOT: everything the loader parses and the card
//! builder consumes lives here.

use std::fmt::{Display, Formatter};

mod attribute;
mod entity;
mod relation;
mod view;

pub use attribute::{AttributeDefinition, AttributeKind, EnumOption};
pub use entity::{EntityClass, EntitySchema, EntityTypeDefinition, EntityTypeFile};
pub use relation::{
    Cardinality, ImpactAnnotation, ImpactKind, RelationKind, RelationshipDefinition, Severity,
};
pub use view::{GraphViewDef, ImpactViewDef, View};

pub const CRATE_NAME: &str = "verdant-model";

/// URN scheme for entity-type identifiers, e.g. `urn:verdant:type:role`.
pub const URN_TYPE_PREFIX: &str = "urn:verdant:type:";
/// URN scheme for entity instances, e.g. `urn:verdant:entity:role:admin`.
pub const URN_ENTITY_PREFIX: &str = "urn:verdant:entity:";
/// URN scheme for lifecycle state machines.
pub const URN_FSM_PREFIX: &str = "urn:verdant:fsm:";

pub const MAX_TYPE_NAME_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Last `:`-separated segment of a type or instance URN.
#[must_use]
pub fn short_type_name(urn: &str) -> &str {
    urn.rsplit(':').next().unwrap_or(urn)
}

/// Instance URN for a `(entity_type, id)` pair.
#[must_use]
pub fn instance_urn(entity_type: &str, id: &str) -> String {
    format!("{URN_ENTITY_PREFIX}{entity_type}:{id}")
}
