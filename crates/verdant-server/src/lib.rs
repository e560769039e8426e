#![forbid(unsafe_code)]
//! HTTP surface over the registry, card cache, and traversal services.
//!
//! GET-only. The registry and cards are bootstrapped before the router
//! exists, so every handler works against immutable shared state.

use axum::routing::get;
use axum::Router;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use verdant_cards::CardCache;
use verdant_query::{GraphService, ImpactService, InstanceSource};
use verdant_registry::Registry;

mod config;
mod handlers;

pub use config::ServerConfig;

pub const CRATE_NAME: &str = "verdant-server";

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub cards: Arc<CardCache>,
    pub graph: GraphService,
    pub impact: ImpactService,
    request_seq: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(
        registry: Arc<Registry>,
        cards: Arc<CardCache>,
        source: Arc<dyn InstanceSource + Send + Sync>,
    ) -> Self {
        let graph = GraphService::new(Arc::clone(&cards), source);
        let impact = ImpactService::new(Arc::clone(&cards), graph.clone());
        Self {
            registry,
            cards,
            graph,
            impact,
            request_seq: Arc::new(AtomicU64::new(1)),
        }
    }

    pub(crate) fn next_request_id(&self) -> String {
        format!("req-{}", self.request_seq.fetch_add(1, Ordering::Relaxed))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route("/readyz", get(handlers::readyz_handler))
        .route("/v1/version", get(handlers::version_handler))
        .route("/v1/registry/stats", get(handlers::registry_stats_handler))
        .route("/v1/cards", get(handlers::cards_handler))
        .route("/v1/cards/:entity_type", get(handlers::card_handler))
        .route("/v1/graph/:entity_type/:id", get(handlers::graph_handler))
        .route("/v1/impact/:entity_type/:id", get(handlers::impact_handler))
        .with_state(state)
}
