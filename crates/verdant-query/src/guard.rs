// SPDX-License-Identifier: Apache-2.0

use crate::error::{TraversalError, TraversalErrorCode};
use crate::spec::{TraversalSpec, IMPACT_DEFAULT_DEPTH, IMPACT_DEPTH_CEILING};
use tracing::warn;
use verdant_cards::EntityCard;
use verdant_model::{GraphViewDef, ImpactViewDef, View};

/// Structural checks between a graph request and the view it names.
///
/// The three checks run in order and each failure is distinct: a view
/// evaluated against the wrong root is a security violation, not a
/// generic bad request.
pub struct GraphGuard;

impl GraphGuard {
    pub fn traversal_view<'a>(
        card: &'a EntityCard,
        view_name: &str,
    ) -> Result<&'a GraphViewDef, TraversalError> {
        let view = view_exists(card, view_name)?;
        let def = match view {
            View::Graph(def) => def,
            View::Impact(_) => return Err(kind_mismatch(card, view_name, "graph", view)),
        };
        check_root(card, view_name, &def.root)?;
        Ok(def)
    }

    /// Pure whitelist predicate for one traversal step. A relation or
    /// target type outside the whitelist is invisible under this view:
    /// excluded from output, never an error.
    #[must_use]
    pub fn edge_permitted(spec: &TraversalSpec, relation: &str, target_type: &str) -> bool {
        spec.permits_edge(relation, target_type)
    }
}

/// Same structural checks against the impact variant, plus the hard
/// depth ceiling.
pub struct ImpactGuard;

impl ImpactGuard {
    pub fn impact_view<'a>(
        card: &'a EntityCard,
        view_name: &str,
    ) -> Result<&'a ImpactViewDef, TraversalError> {
        let view = view_exists(card, view_name)?;
        let def = match view {
            View::Impact(def) => def,
            View::Graph(_) => return Err(kind_mismatch(card, view_name, "impact", view)),
        };
        check_root(card, view_name, &def.root)?;

        let declared = def.max_depth.unwrap_or(IMPACT_DEFAULT_DEPTH);
        if declared > IMPACT_DEPTH_CEILING {
            warn!(
                entity_type = %card.entity_type,
                view = view_name,
                declared,
                ceiling = IMPACT_DEPTH_CEILING,
                "impact view exceeds depth ceiling"
            );
            return Err(TraversalError::new(
                TraversalErrorCode::DepthCeilingExceeded,
                format!(
                    "view {view_name:?} declares max_depth {declared}, ceiling is {IMPACT_DEPTH_CEILING}"
                ),
            ));
        }
        Ok(def)
    }
}

fn view_exists<'a>(card: &'a EntityCard, view_name: &str) -> Result<&'a View, TraversalError> {
    card.view(view_name).ok_or_else(|| {
        warn!(
            entity_type = %card.entity_type,
            view = view_name,
            "requested view does not exist"
        );
        TraversalError::new(
            TraversalErrorCode::ViewNotFound,
            format!(
                "view {view_name:?} does not exist on entity type {:?}",
                card.entity_type
            ),
        )
    })
}

fn kind_mismatch(
    card: &EntityCard,
    view_name: &str,
    wanted: &str,
    got: &View,
) -> TraversalError {
    warn!(
        entity_type = %card.entity_type,
        view = view_name,
        wanted,
        got = got.kind_str(),
        "view kind mismatch"
    );
    TraversalError::new(
        TraversalErrorCode::ViewKindMismatch,
        format!(
            "view {view_name:?} is a {} view, expected {wanted}",
            got.kind_str()
        ),
    )
}

fn check_root(card: &EntityCard, view_name: &str, root: &str) -> Result<(), TraversalError> {
    if root == card.entity_type {
        return Ok(());
    }
    warn!(
        entity_type = %card.entity_type,
        view = view_name,
        declared_root = root,
        "view root does not match requested entity type"
    );
    Err(TraversalError::new(
        TraversalErrorCode::RootMismatch,
        format!(
            "view {view_name:?} is rooted at {root:?}, not {:?}",
            card.entity_type
        ),
    ))
}
