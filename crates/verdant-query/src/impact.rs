// SPDX-License-Identifier: Apache-2.0

use crate::error::TraversalError;
use crate::graph::GraphService;
use crate::guard::ImpactGuard;
use crate::spec::TraversalSpec;
use std::sync::Arc;
use tracing::debug;
use verdant_api::{ImpactItemDto, ImpactReportDto, ImpactRootDto, ImpactSummaryDto};
use verdant_cards::CardCache;

/// Impact analysis over the same traversal the graph surface uses.
///
/// The service derives a transient traversal spec from the impact view,
/// delegates to [`GraphService::graph_by_spec`], and classifies the
/// returned edges by their declared impact annotations. Edges whose
/// relation carries no annotation stay topological: traversed, reported
/// nowhere.
#[derive(Clone)]
pub struct ImpactService {
    cards: Arc<CardCache>,
    graph: GraphService,
}

impl ImpactService {
    #[must_use]
    pub fn new(cards: Arc<CardCache>, graph: GraphService) -> Self {
        Self { cards, graph }
    }

    pub fn impact_report(
        &self,
        entity_type: &str,
        id: &str,
        view_name: &str,
    ) -> Result<ImpactReportDto, TraversalError> {
        let card = self.cards.get(entity_type).map_err(TraversalError::from)?;
        let view = ImpactGuard::impact_view(card, view_name)?;
        let root_type = card.entity_type.clone();

        let spec = TraversalSpec::from_impact_view(view);
        let graph = self.graph.graph_by_spec(&root_type, id, &spec)?;

        let mut summary = ImpactSummaryDto::default();
        let mut impacts: Vec<ImpactItemDto> = Vec::new();

        for edge in &graph.edges {
            let source_type = edge.source.split(':').next().unwrap_or_default();
            let source_card = self.cards.get(source_type).map_err(TraversalError::from)?;
            let Some(relation) = source_card.relation(&edge.relation) else {
                continue;
            };
            let Some(impact) = &relation.impact else {
                continue;
            };
            if let Some(include) = &view.include {
                if !include.contains(&impact.kind) {
                    continue;
                }
            }

            let target_node = graph.nodes.iter().find(|n| n.id == edge.target);
            summary.bump(impact.severity);
            impacts.push(ImpactItemDto {
                entity_type: target_node
                    .map_or_else(|| "unknown".to_string(), |n| n.entity_type.clone()),
                id: edge
                    .target
                    .split_once(':')
                    .map_or_else(|| edge.target.clone(), |(_, id)| id.to_string()),
                label: target_node
                    .map_or_else(|| edge.target.clone(), |n| n.label.clone()),
                relation: edge.relation.clone(),
                impact_kind: impact.kind,
                severity: impact.severity,
                path: vec![
                    edge.source.clone(),
                    edge.relation.clone(),
                    edge.target.clone(),
                ],
            });
        }

        let root_key = format!("{root_type}:{id}");
        let root_label = graph
            .nodes
            .iter()
            .find(|n| n.id == root_key)
            .map_or_else(|| id.to_string(), |n| n.label.clone());

        debug!(
            entity_type,
            id,
            impacts = impacts.len(),
            "impact report assembled"
        );

        Ok(ImpactReportDto {
            root: ImpactRootDto {
                entity_type: root_type,
                id: id.to_string(),
                label: root_label,
            },
            summary,
            impacts,
        })
    }
}
