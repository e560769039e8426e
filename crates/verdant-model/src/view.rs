use crate::relation::ImpactKind;
use serde::{Deserialize, Serialize};

/// Named traversal policy scoped to one root entity type.
///
/// A view whitelists what a traversal may see; anything absent from a
/// whitelist is invisible under that view, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum View {
    Graph(GraphViewDef),
    Impact(ImpactViewDef),
}

impl View {
    #[must_use]
    pub const fn kind_str(&self) -> &'static str {
        match self {
            Self::Graph(_) => "graph",
            Self::Impact(_) => "impact",
        }
    }

    /// Declared root entity type, independent of the view kind.
    #[must_use]
    pub fn root(&self) -> &str {
        match self {
            Self::Graph(def) => &def.root,
            Self::Impact(def) => &def.root,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphViewDef {
    /// Must equal the entity type the view is declared on; checked per
    /// request because views are always evaluated against a caller root.
    pub root: String,
    /// Entity types the traversal may surface.
    pub nodes: Vec<String>,
    /// Relation names the traversal may follow.
    pub edges: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactViewDef {
    pub root: String,
    /// Relation names the analysis may follow; mandatory and strict.
    pub edges: Vec<String>,
    /// Optional node whitelist; absent means every known entity type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    /// Impact kinds to report; absent means all annotated kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<ImpactKind>>,
}
