use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use verdant_api::{
    ApiError, ApiErrorCode, CardListResponseDto, CardResponseDto, RegistryStatsDto, VersionDto,
};
use verdant_query::{TraversalError, TraversalErrorCode};

#[derive(Debug, Deserialize)]
pub(crate) struct ViewQuery {
    view: Option<String>,
}

pub(crate) async fn healthz_handler() -> Response {
    (StatusCode::OK, "ok").into_response()
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> Response {
    // Bootstrap is crash-only: a running process always has its cards.
    let body = json!({
        "ready": true,
        "entities": state.cards.len(),
    });
    (StatusCode::OK, Json(body)).into_response()
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> Response {
    let dto = VersionDto {
        version: env!("CARGO_PKG_VERSION").to_string(),
        registry_checksum: state.registry.metadata().checksum.clone(),
    };
    (StatusCode::OK, Json(dto)).into_response()
}

pub(crate) async fn registry_stats_handler(State(state): State<AppState>) -> Response {
    let stats = state.registry.stats();
    let dto = RegistryStatsDto {
        entities: stats.entities,
        relations: stats.relations,
        domains: state.registry.graph().domains(),
        by_class: stats.by_class,
    };
    (StatusCode::OK, Json(dto)).into_response()
}

pub(crate) async fn cards_handler(State(state): State<AppState>) -> Response {
    let cards: Vec<_> = state.cards.all().into_iter().cloned().collect();
    let total = cards.len();
    (StatusCode::OK, Json(CardListResponseDto { cards, total })).into_response()
}

pub(crate) async fn card_handler(
    State(state): State<AppState>,
    Path(entity_type): Path<String>,
) -> Response {
    let request_id = state.next_request_id();
    match state.cards.get(&entity_type) {
        Ok(card) => {
            let dto = CardResponseDto {
                entity_type: card.entity_type.clone(),
                card: card.clone(),
            };
            (StatusCode::OK, Json(dto)).into_response()
        }
        Err(err) => {
            let body = ApiError::new(
                ApiErrorCode::EntityNotFound,
                err.to_string(),
                json!({"entity_type": entity_type}),
                &request_id,
            );
            (StatusCode::NOT_FOUND, Json(body)).into_response()
        }
    }
}

pub(crate) async fn graph_handler(
    State(state): State<AppState>,
    Path((entity_type, id)): Path<(String, String)>,
    Query(params): Query<ViewQuery>,
) -> Response {
    let request_id = state.next_request_id();
    info!(
        request_id = %request_id,
        route = "/v1/graph",
        entity_type = %entity_type,
        id = %id,
        "request start"
    );
    let Some(view) = params.view else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError::missing_view(&request_id)),
        )
            .into_response();
    };
    match state.graph.graph(&entity_type, &id, &view) {
        Ok(dto) => (StatusCode::OK, Json(dto)).into_response(),
        Err(err) => traversal_error_response(&err, &view, &request_id),
    }
}

pub(crate) async fn impact_handler(
    State(state): State<AppState>,
    Path((entity_type, id)): Path<(String, String)>,
    Query(params): Query<ViewQuery>,
) -> Response {
    let request_id = state.next_request_id();
    info!(
        request_id = %request_id,
        route = "/v1/impact",
        entity_type = %entity_type,
        id = %id,
        "request start"
    );
    let Some(view) = params.view else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError::missing_view(&request_id)),
        )
            .into_response();
    };
    match state.impact.impact_report(&entity_type, &id, &view) {
        Ok(dto) => (StatusCode::OK, Json(dto)).into_response(),
        Err(err) => traversal_error_response(&err, &view, &request_id),
    }
}

fn traversal_error_response(err: &TraversalError, view: &str, request_id: &str) -> Response {
    let code = match err.code {
        TraversalErrorCode::UnknownEntity => ApiErrorCode::EntityNotFound,
        TraversalErrorCode::UnknownInstance => ApiErrorCode::InstanceNotFound,
        TraversalErrorCode::ViewNotFound
        | TraversalErrorCode::ViewKindMismatch
        | TraversalErrorCode::RootMismatch
        | TraversalErrorCode::DepthCeilingExceeded => ApiErrorCode::SecurityViolation,
        _ => ApiErrorCode::Internal,
    };
    if err.is_security_violation() {
        warn!(
            request_id = %request_id,
            view,
            code = %code,
            error = %err,
            "security violation rejected"
        );
    }
    let status =
        StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ApiError::new(code, err.to_string(), json!({"view": view}), request_id);
    (status, Json(body)).into_response()
}
