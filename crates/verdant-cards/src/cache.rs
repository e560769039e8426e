use crate::builder::build_card;
use crate::card::EntityCard;
use crate::guard::check_card;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use tracing::info;
use verdant_model::{short_type_name, URN_TYPE_PREFIX};
use verdant_registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardError {
    NotFound(String),
    Invalid {
        entity_type: String,
        message: String,
    },
}

impl Display for CardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(entity_type) => {
                write!(f, "no entity card for type {entity_type:?}")
            }
            Self::Invalid {
                entity_type,
                message,
            } => write!(f, "invalid entity card {entity_type:?}: {message}"),
        }
    }
}

impl std::error::Error for CardError {}

/// All entity cards, built once at startup, immutable afterwards.
///
/// Shared read-only across requests; lookups are by short type name or
/// full type URN.
#[derive(Debug)]
pub struct CardCache {
    cards: BTreeMap<String, EntityCard>,
}

impl CardCache {
    /// Compile and guard one card per registry definition. A single
    /// malformed card fails the whole build, which keeps the process
    /// from ever serving a partial card set.
    pub fn build(registry: &Registry) -> Result<Self, CardError> {
        let mut cards = BTreeMap::new();
        for definition in registry.all() {
            let card = build_card(definition, registry)?;
            check_card(&card)?;
            cards.insert(card.entity_type.clone(), card);
        }
        info!(cards = cards.len(), "entity card cache built");
        Ok(Self { cards })
    }

    pub fn get(&self, entity_type: &str) -> Result<&EntityCard, CardError> {
        let key = if entity_type.starts_with(URN_TYPE_PREFIX) {
            short_type_name(entity_type)
        } else {
            entity_type
        };
        self.cards
            .get(key)
            .ok_or_else(|| CardError::NotFound(entity_type.to_string()))
    }

    #[must_use]
    pub fn contains(&self, entity_type: &str) -> bool {
        self.get(entity_type).is_ok()
    }

    /// Ordered snapshot of every card.
    #[must_use]
    pub fn all(&self) -> Vec<&EntityCard> {
        self.cards.values().collect()
    }

    /// Every known short type name, ordered.
    #[must_use]
    pub fn entity_types(&self) -> Vec<&str> {
        self.cards.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
