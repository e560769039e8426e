// SPDX-License-Identifier: Apache-2.0

use verdant_model::{GraphViewDef, ImpactViewDef};

/// Depth a graph view gets when it declares none: root plus immediate
/// neighbors.
pub const GRAPH_DEFAULT_DEPTH: u32 = 1;
/// Depth an impact view gets when it declares none.
pub const IMPACT_DEFAULT_DEPTH: u32 = 3;
/// Hard ceiling on declared impact depth, independent of what the view
/// author intended; bounds worst-case traversal cost.
pub const IMPACT_DEPTH_CEILING: u32 = 5;

/// Target-type admission policy for one traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeFilter {
    /// Only the listed entity types may appear.
    Whitelist(Vec<String>),
    /// Every registered entity type may appear. Only impact views without
    /// an explicit node whitelist use this analytical default.
    AllKnown,
}

impl NodeFilter {
    #[must_use]
    pub fn permits(&self, entity_type: &str) -> bool {
        match self {
            Self::Whitelist(types) => types.iter().any(|t| t == entity_type),
            Self::AllKnown => true,
        }
    }
}

/// Resolved traversal policy: what a single BFS run may follow and how
/// far. Built from a validated view, consumed immediately, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalSpec {
    pub edges: Vec<String>,
    pub nodes: NodeFilter,
    pub depth: u32,
}

impl TraversalSpec {
    #[must_use]
    pub fn from_graph_view(view: &GraphViewDef) -> Self {
        Self {
            edges: view.edges.clone(),
            nodes: NodeFilter::Whitelist(view.nodes.clone()),
            depth: view.depth.unwrap_or(GRAPH_DEFAULT_DEPTH),
        }
    }

    #[must_use]
    pub fn from_impact_view(view: &ImpactViewDef) -> Self {
        Self {
            edges: view.edges.clone(),
            nodes: view
                .nodes
                .clone()
                .map_or(NodeFilter::AllKnown, NodeFilter::Whitelist),
            depth: view.max_depth.unwrap_or(IMPACT_DEFAULT_DEPTH),
        }
    }

    #[must_use]
    pub fn permits_edge(&self, relation: &str, target_type: &str) -> bool {
        self.edges.iter().any(|e| e == relation) && self.nodes.permits(target_type)
    }
}
