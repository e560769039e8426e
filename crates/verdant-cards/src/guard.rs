use crate::cache::CardError;
use crate::card::EntityCard;
use std::collections::BTreeSet;
use verdant_model::{AttributeKind, URN_TYPE_PREFIX};

/// Defensive validation of a freshly built card.
///
/// The registry validator has already vetted the definitions; this guard
/// exists so a builder regression can never leak a malformed card into
/// the cache. Runs once per card at startup, never per request.
pub fn check_card(card: &EntityCard) -> Result<(), CardError> {
    let fail = |message: String| CardError::Invalid {
        entity_type: card.entity_type.clone(),
        message,
    };

    if card.entity_type.trim().is_empty() {
        return Err(fail("empty entity_type".to_string()));
    }
    if !card.urn.starts_with(URN_TYPE_PREFIX) {
        return Err(fail(format!("urn {:?} lacks type scheme", card.urn)));
    }
    if card.name.trim().is_empty() {
        return Err(fail("empty display name".to_string()));
    }
    if card.fingerprint.len() != 16 || !card.fingerprint.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(fail(format!(
            "fingerprint {:?} is not 16 hex chars",
            card.fingerprint
        )));
    }

    let mut attr_names = BTreeSet::new();
    for attr in &card.attributes {
        if !attr_names.insert(attr.name.as_str()) {
            return Err(fail(format!("duplicate attribute {:?}", attr.name)));
        }
        if attr.label.trim().is_empty() {
            return Err(fail(format!("attribute {:?} has empty label", attr.name)));
        }
        if attr.kind == AttributeKind::Enum && attr.enum_options.is_empty() {
            return Err(fail(format!(
                "enum attribute {:?} lost its options",
                attr.name
            )));
        }
    }

    let mut rel_names = BTreeSet::new();
    for rel in &card.relations {
        if !rel_names.insert(rel.name.as_str()) {
            return Err(fail(format!("duplicate relation {:?}", rel.name)));
        }
        if !rel.target.starts_with(URN_TYPE_PREFIX) {
            return Err(fail(format!(
                "relation {:?} target {:?} lacks type scheme",
                rel.name, rel.target
            )));
        }
        if rel.target_type.trim().is_empty() {
            return Err(fail(format!("relation {:?} has empty target type", rel.name)));
        }
    }

    if card.lifecycle.states.is_empty() {
        return Err(fail("lifecycle without states".to_string()));
    }
    if !card
        .lifecycle
        .states
        .iter()
        .any(|s| s.code == card.lifecycle.initial_state)
    {
        return Err(fail(format!(
            "initial lifecycle state {:?} is not a declared state",
            card.lifecycle.initial_state
        )));
    }

    Ok(())
}
