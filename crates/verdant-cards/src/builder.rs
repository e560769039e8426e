use crate::cache::CardError;
use crate::card::{
    CardAttribute, CardLifecycle, CardMetadata, CardPermissions, CardRelation, CardState,
    EntityCard,
};
use serde::Serialize;
use std::collections::BTreeMap;
use verdant_core::canonical;
use verdant_model::{short_type_name, EntitySchema, EntityTypeDefinition};
use verdant_registry::Registry;

/// Audit fields are write-once by convention across the platform.
const READONLY_ATTRIBUTES: &[&str] = &["created_at", "updated_at", "created_by"];

/// `snake_case` → `Title Case` display label.
fn to_label(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Serialize)]
struct StructuralShape<'a> {
    urn: &'a str,
    domain: &'a str,
    class: &'a str,
    schema: &'a EntitySchema,
}

/// Compile one entity card from its definition and the registry graph.
///
/// Pure: same definition and registry always produce the same card.
pub fn build_card(
    definition: &EntityTypeDefinition,
    registry: &Registry,
) -> Result<EntityCard, CardError> {
    let entity_type = definition.short_name().to_string();

    let attributes = definition
        .schema
        .attributes
        .iter()
        .map(|attr| CardAttribute {
            name: attr.name.clone(),
            kind: attr.kind,
            required: attr.required,
            readonly: READONLY_ATTRIBUTES.contains(&attr.name.as_str()),
            unique: attr.unique,
            enum_options: attr.enum_options.clone(),
            default_value: attr.default_value.clone(),
            label: to_label(&attr.name),
        })
        .collect();

    let relations = definition
        .schema
        .relationships
        .iter()
        .map(|rel| {
            let target_name = registry
                .definition(&rel.target)
                .map_or_else(|| short_type_name(&rel.target).to_string(), |d| d.name.clone());
            CardRelation {
                name: rel.name.clone(),
                target: rel.target.clone(),
                target_type: short_type_name(&rel.target).to_string(),
                target_name,
                cardinality: rel.cardinality,
                kind: rel.cardinality.kind(),
                required: rel.required,
                impact: rel.impact.clone(),
                label: to_label(&rel.name),
            }
        })
        .collect();

    let shape = StructuralShape {
        urn: &definition.urn,
        domain: &definition.domain,
        class: definition.class.as_str(),
        schema: &definition.schema,
    };
    let fingerprint = canonical::short_fingerprint(&shape).map_err(|e| CardError::Invalid {
        entity_type: entity_type.clone(),
        message: format!("cannot fingerprint structural shape: {e}"),
    })?;

    Ok(EntityCard {
        urn: definition.urn.clone(),
        name: definition.name.clone(),
        attributes,
        relations,
        views: definition.views.clone(),
        lifecycle: default_lifecycle(),
        permissions: permissions_for(&definition.domain, &entity_type),
        metadata: CardMetadata {
            domain: definition.domain.clone(),
            class: definition.class,
            description: definition.description.clone(),
        },
        fingerprint,
        entity_type,
    })
}

/// Platform-default lifecycle until per-type state machines are resolved
/// from their own registry definitions.
fn default_lifecycle() -> CardLifecycle {
    let states = vec![
        CardState {
            code: "draft".to_string(),
            label: "Draft".to_string(),
            is_final: false,
        },
        CardState {
            code: "active".to_string(),
            label: "Active".to_string(),
            is_final: false,
        },
        CardState {
            code: "archived".to_string(),
            label: "Archived".to_string(),
            is_final: true,
        },
    ];
    let mut transitions = BTreeMap::new();
    transitions.insert("draft".to_string(), vec!["active".to_string()]);
    transitions.insert("active".to_string(), vec!["archived".to_string()]);
    transitions.insert("archived".to_string(), vec![]);
    CardLifecycle {
        initial_state: "draft".to_string(),
        states,
        transitions,
    }
}

fn permissions_for(domain: &str, entity_type: &str) -> CardPermissions {
    let op = |action: &str| {
        vec![
            format!("{domain}:{entity_type}:{action}"),
            format!("{domain}:admin"),
        ]
    };
    CardPermissions {
        create: op("create"),
        read: op("read"),
        update: op("update"),
        delete: op("delete"),
        archive: op("archive"),
    }
}

#[cfg(test)]
mod tests {
    use super::to_label;

    #[test]
    fn labels_title_case_snake_names() {
        assert_eq!(to_label("user_account"), "User Account");
        assert_eq!(to_label("roles"), "Roles");
        assert_eq!(to_label("start__date"), "Start Date");
    }
}
