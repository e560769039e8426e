use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use verdant_cards::CardCache;
use verdant_query::{FixtureData, FixtureSource};
use verdant_registry::Registry;
use verdant_server::{build_router, AppState};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(std::path::Path::parent)
        .expect("workspace root")
        .to_path_buf()
}

fn app() -> Router {
    let root = workspace_root();
    let registry = Arc::new(
        Registry::bootstrap(vec![root.join("fixtures/registry")]).expect("bootstrap fixtures"),
    );
    let cards = Arc::new(CardCache::build(&registry).expect("build cards"));
    let raw =
        std::fs::read_to_string(root.join("fixtures/instances.json")).expect("read instances");
    let data: FixtureData = serde_json::from_str(&raw).expect("parse instances");
    let source = Arc::new(FixtureSource::from_data(data));
    build_router(AppState::new(registry, cards, source))
}

async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::String(
            String::from_utf8_lossy(&bytes).to_string(),
        ))
    };
    (status, value)
}

#[tokio::test]
async fn healthz_and_readyz_respond() {
    let (status, _) = get(app(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(app(), "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], serde_json::json!(true));
    assert_eq!(body["entities"], serde_json::json!(3));
}

#[tokio::test]
async fn version_reports_registry_checksum() {
    let (status, body) = get(app(), "/v1/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["registry_checksum"].as_str().map(str::len),
        Some(16)
    );
}

#[tokio::test]
async fn registry_stats_summarize_the_fixture_set() {
    let (status, body) = get(app(), "/v1/registry/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entities"], serde_json::json!(3));
    assert_eq!(body["relations"], serde_json::json!(3));
    assert_eq!(body["domains"], serde_json::json!(["access"]));
}

#[tokio::test]
async fn cards_snapshot_covers_every_type() {
    let (status, body) = get(app(), "/v1/cards").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], serde_json::json!(3));

    let (status, body) = get(app(), "/v1/cards/role").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity_type"], serde_json::json!("role"));
    assert_eq!(body["card"]["urn"], serde_json::json!("urn:verdant:type:role"));

    let (status, body) = get(app(), "/v1/cards/tractor").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], serde_json::json!("entity_not_found"));
}

#[tokio::test]
async fn graph_endpoint_traverses_the_declared_view() {
    let (status, body) = get(app(), "/v1/graph/user_account/u1?view=graph.roles").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["edges"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["nodes"][0]["id"], serde_json::json!("user_account:u1"));
    assert_eq!(body["nodes"][0]["label"], serde_json::json!("Avery"));
}

#[tokio::test]
async fn graph_without_view_parameter_is_bad_request() {
    let (status, body) = get(app(), "/v1/graph/user_account/u1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], serde_json::json!("missing_view_parameter"));
}

#[tokio::test]
async fn graph_view_on_wrong_type_is_forbidden() {
    // "graph.roles" exists on user_account only; asking role for it is a
    // structural violation, not a 404.
    let (status, body) = get(app(), "/v1/graph/role/admin?view=graph.roles").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], serde_json::json!("security_violation"));
}

#[tokio::test]
async fn graph_unknowns_map_to_not_found() {
    let (status, body) = get(app(), "/v1/graph/tractor/t1?view=graph.roles").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], serde_json::json!("entity_not_found"));

    let (status, body) = get(app(), "/v1/graph/user_account/u999?view=graph.roles").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], serde_json::json!("instance_not_found"));
}

#[tokio::test]
async fn impact_endpoint_buckets_by_severity() {
    let (status, body) = get(app(), "/v1/impact/user_account/u1?view=impact.access").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["high"], serde_json::json!(4));
    assert_eq!(body["summary"]["critical"], serde_json::json!(0));
    assert_eq!(body["impacts"].as_array().map(Vec::len), Some(4));
    assert_eq!(body["root"]["label"], serde_json::json!("Avery"));
}

#[tokio::test]
async fn impact_without_view_parameter_is_bad_request() {
    let (status, body) = get(app(), "/v1/impact/user_account/u1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], serde_json::json!("missing_view_parameter"));
}
