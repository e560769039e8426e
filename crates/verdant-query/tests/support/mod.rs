#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use verdant_cards::CardCache;
use verdant_model::{
    Cardinality, EntityClass, EntitySchema, EntityTypeDefinition, GraphViewDef, ImpactAnnotation,
    ImpactKind, ImpactViewDef, RelationshipDefinition, Severity, View,
};
use verdant_query::{FixtureSource, GraphService, ImpactService};
use verdant_registry::Registry;

pub fn relation(
    name: &str,
    target_short: &str,
    impact: Option<(ImpactKind, Severity)>,
) -> RelationshipDefinition {
    RelationshipDefinition {
        name: name.to_string(),
        target: format!("urn:verdant:type:{target_short}"),
        cardinality: Cardinality::ManyToMany,
        required: false,
        description: None,
        impact: impact.map(|(kind, severity)| ImpactAnnotation {
            kind,
            severity,
            description: None,
        }),
    }
}

fn entity(
    short: &str,
    relationships: Vec<RelationshipDefinition>,
    views: BTreeMap<String, View>,
) -> EntityTypeDefinition {
    EntityTypeDefinition {
        urn: format!("urn:verdant:type:{short}"),
        name: short.to_string(),
        domain: "access".to_string(),
        class: EntityClass::Core,
        description: String::new(),
        lifecycle_fsm_urn: None,
        schema: EntitySchema {
            attributes: vec![],
            relationships,
        },
        views,
    }
}

fn graph_view(root: &str, nodes: &[&str], edges: &[&str], depth: Option<u32>) -> View {
    View::Graph(GraphViewDef {
        root: root.to_string(),
        nodes: nodes.iter().map(|s| (*s).to_string()).collect(),
        edges: edges.iter().map(|s| (*s).to_string()).collect(),
        depth,
    })
}

fn impact_view(
    root: &str,
    edges: &[&str],
    nodes: Option<&[&str]>,
    max_depth: Option<u32>,
    include: Option<Vec<ImpactKind>>,
) -> View {
    View::Impact(ImpactViewDef {
        root: root.to_string(),
        edges: edges.iter().map(|s| (*s).to_string()).collect(),
        nodes: nodes.map(|ns| ns.iter().map(|s| (*s).to_string()).collect()),
        max_depth,
        include,
    })
}

/// The access-control scenario: users hold roles (no impact annotation),
/// roles grant permissions (blocking/high), roles list their members.
pub fn access_registry() -> Registry {
    let mut user_views = BTreeMap::new();
    user_views.insert(
        "graph.roles".to_string(),
        graph_view("user_account", &["role"], &["roles"], Some(1)),
    );
    user_views.insert(
        "graph.roles_deep".to_string(),
        graph_view(
            "user_account",
            &["role", "permission"],
            &["roles", "permissions"],
            Some(2),
        ),
    );
    user_views.insert(
        "graph.roles_only_deep".to_string(),
        graph_view("user_account", &["role"], &["roles", "permissions"], Some(2)),
    );
    user_views.insert(
        "graph.cycle".to_string(),
        graph_view(
            "user_account",
            &["role", "user_account"],
            &["roles", "members"],
            Some(5),
        ),
    );
    user_views.insert(
        "graph.wrong_root".to_string(),
        graph_view("role", &["role"], &["roles"], Some(1)),
    );
    user_views.insert(
        "impact.access".to_string(),
        impact_view("user_account", &["roles", "permissions"], None, Some(2), None),
    );
    user_views.insert(
        "impact.blocking_only".to_string(),
        impact_view(
            "user_account",
            &["roles", "permissions"],
            None,
            Some(2),
            Some(vec![ImpactKind::Blocking]),
        ),
    );
    user_views.insert(
        "impact.dependent_only".to_string(),
        impact_view(
            "user_account",
            &["roles", "permissions"],
            None,
            Some(2),
            Some(vec![ImpactKind::Dependent]),
        ),
    );
    user_views.insert(
        "impact.scoped".to_string(),
        impact_view(
            "user_account",
            &["roles", "permissions"],
            Some(&["role"]),
            Some(2),
            None,
        ),
    );
    user_views.insert(
        "impact.at_ceiling".to_string(),
        impact_view("user_account", &["roles", "permissions"], None, Some(5), None),
    );
    user_views.insert(
        "impact.too_deep".to_string(),
        impact_view("user_account", &["roles", "permissions"], None, Some(6), None),
    );

    let user = entity(
        "user_account",
        vec![relation("roles", "role", None)],
        user_views,
    );
    let role = entity(
        "role",
        vec![
            relation(
                "permissions",
                "permission",
                Some((ImpactKind::Blocking, Severity::High)),
            ),
            relation("members", "user_account", None),
        ],
        BTreeMap::new(),
    );
    let permission = entity("permission", vec![], BTreeMap::new());

    Registry::from_definitions(vec![user, role, permission], "cafebabecafebabe".to_string())
        .expect("valid registry")
}

/// Instances backing the scenario: u1 holds admin and editor; admin
/// grants all/sudo, editor grants read/write; admin lists u1 back as a
/// member, closing a cycle.
pub fn access_fixtures() -> FixtureSource {
    FixtureSource::new()
        .with_instance("user_account", "u1", Some("Avery"))
        .with_related("user_account", "u1", "roles", "role", &["admin", "editor"])
        .with_related("role", "admin", "permissions", "permission", &["all", "sudo"])
        .with_related(
            "role",
            "editor",
            "permissions",
            "permission",
            &["read", "write"],
        )
        .with_related("role", "admin", "members", "user_account", &["u1"])
}

pub fn services() -> (GraphService, ImpactService) {
    let registry = access_registry();
    let cards = Arc::new(CardCache::build(&registry).expect("cards"));
    let source = Arc::new(access_fixtures());
    let graph = GraphService::new(Arc::clone(&cards), source);
    let impact = ImpactService::new(cards, graph.clone());
    (graph, impact)
}
