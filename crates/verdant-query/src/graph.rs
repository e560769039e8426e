// SPDX-License-Identifier: Apache-2.0

use crate::error::{TraversalError, TraversalErrorCode};
use crate::guard::GraphGuard;
use crate::source::InstanceSource;
use crate::spec::TraversalSpec;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;
use verdant_api::{GraphEdgeDto, GraphNodeDto, GraphResponseDto};
use verdant_cards::{CardCache, EntityCard};
use verdant_model::instance_urn;

/// Bounded, whitelist-respecting breadth-first traversal over entity
/// instances.
#[derive(Clone)]
pub struct GraphService {
    cards: Arc<CardCache>,
    source: Arc<dyn InstanceSource + Send + Sync>,
}

fn node_key(entity_type: &str, id: &str) -> String {
    format!("{entity_type}:{id}")
}

fn node_dto(entity_type: &str, id: &str, label: Option<&str>) -> GraphNodeDto {
    GraphNodeDto {
        id: node_key(entity_type, id),
        entity_type: entity_type.to_string(),
        label: label.map_or_else(|| format!("{entity_type} {id}"), str::to_string),
        urn: instance_urn(entity_type, id),
    }
}

impl GraphService {
    #[must_use]
    pub fn new(cards: Arc<CardCache>, source: Arc<dyn InstanceSource + Send + Sync>) -> Self {
        Self { cards, source }
    }

    fn card(&self, entity_type: &str) -> Result<&EntityCard, TraversalError> {
        Ok(self.cards.get(entity_type)?)
    }

    /// View-validated traversal: the public entry point.
    pub fn graph(
        &self,
        entity_type: &str,
        id: &str,
        view_name: &str,
    ) -> Result<GraphResponseDto, TraversalError> {
        let card = self.card(entity_type)?;
        let view = GraphGuard::traversal_view(card, view_name)?;
        let spec = TraversalSpec::from_graph_view(view);
        // Canonical short name, so URN-addressed requests traverse the
        // same keys as name-addressed ones.
        let root_type = card.entity_type.clone();
        self.graph_by_spec(&root_type, id, &spec)
    }

    /// Guard-free traversal against an already-resolved spec. The impact
    /// engine reuses this instead of re-implementing BFS.
    ///
    /// All traversal state is local to the call. Output order is
    /// discovery order and deliberately not canonical; callers that hash
    /// or snapshot results must sort by id first.
    pub fn graph_by_spec(
        &self,
        entity_type: &str,
        id: &str,
        spec: &TraversalSpec,
    ) -> Result<GraphResponseDto, TraversalError> {
        let root_card = self.card(entity_type)?;
        let root = self
            .source
            .fetch_instance(&root_card.entity_type, id)?
            .ok_or_else(|| {
                TraversalError::new(
                    TraversalErrorCode::UnknownInstance,
                    format!("no instance {:?} of type {:?}", id, root_card.entity_type),
                )
            })?;

        let mut nodes: Vec<GraphNodeDto> = Vec::new();
        let mut edges: Vec<GraphEdgeDto> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(String, String, u32)> = VecDeque::new();

        let root_key = node_key(&root_card.entity_type, id);
        seen.insert(root_key.clone());
        visited.insert(root_key);
        nodes.push(node_dto(&root_card.entity_type, id, root.label.as_deref()));
        queue.push_back((root_card.entity_type.clone(), id.to_string(), 0));

        while let Some((current_type, current_id, depth)) = queue.pop_front() {
            if depth >= spec.depth {
                continue;
            }
            let card = self.card(&current_type)?;
            let source_key = node_key(&current_type, &current_id);

            for relation in &card.relations {
                if !GraphGuard::edge_permitted(spec, &relation.name, &relation.target_type) {
                    continue;
                }
                let related =
                    self.source
                        .fetch_related(&current_type, &current_id, &relation.name)?;
                for item in related {
                    let target_key = node_key(&relation.target_type, &item.id);
                    if seen.insert(target_key.clone()) {
                        nodes.push(node_dto(
                            &relation.target_type,
                            &item.id,
                            item.label.as_deref(),
                        ));
                    }
                    if !visited.contains(&target_key) {
                        visited.insert(target_key.clone());
                        queue.push_back((relation.target_type.clone(), item.id, depth + 1));
                    }
                    // The edge is always recorded, target already known or
                    // not: the output keeps every permitted relation, not
                    // just a spanning tree.
                    edges.push(GraphEdgeDto {
                        id: format!("{source_key}-{}-{target_key}", relation.name),
                        source: source_key.clone(),
                        target: target_key,
                        label: relation.label.clone(),
                        relation: relation.name.clone(),
                    });
                }
            }
        }

        debug!(
            entity_type,
            id,
            nodes = nodes.len(),
            edges = edges.len(),
            depth = spec.depth,
            "traversal complete"
        );

        Ok(GraphResponseDto { nodes, edges })
    }
}
