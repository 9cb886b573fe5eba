//! API Integration Tests

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use namegraph_api::{create_router, state::AppState};
use namegraph_core::{AppConfig, NameTables};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const SAMPLE: &str = "Jack talked to Carl Solomon. Later, Ginsberg wrote to Carl Solomon.\n\n\
                      Jack read Walt Whitman aloud to Neal Cassady and Carl Solomon.\n";

fn sample_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.names = NameTables::new()
        .with_alias("Jack", "Jack Kerouac")
        .with_alias("Ginsberg", "Allen Ginsberg")
        .with_highlight("Walt Whitman");
    config
}

fn create_router_for_testing() -> Router {
    let state = AppState::from_text(sample_config(), SAMPLE).unwrap();
    create_router(Arc::new(state))
}

/// Helper to create a test request
fn create_json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    match body {
        Some(json_body) => builder
            .body(Body::from(serde_json::to_string(&json_body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn find_edge<'a>(graph: &'a Value, a: &str, b: &str) -> Option<&'a Value> {
    graph["elements"]["edges"].as_array()?.iter().find(|edge| {
        let data = &edge["data"];
        (data["source"] == a && data["target"] == b) || (data["source"] == b && data["target"] == a)
    })
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let (status, json) = send(
        create_router_for_testing(),
        create_json_request("GET", "/health", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

// =============================================================================
// Dashboard Tests
// =============================================================================

#[tokio::test]
async fn test_dashboard_page() {
    let response = create_router_for_testing()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("<h1>Name Co-Occurrence Network</h1>"));
    assert!(html.contains("cytoscape-sentence-network"));
    assert!(html.contains("cytoscape-paragraph-network"));
}

// =============================================================================
// Graph Tests
// =============================================================================

#[tokio::test]
async fn test_sentence_graph() {
    let (status, graph) = send(
        create_router_for_testing(),
        create_json_request("GET", "/api/v1/graphs/sentence", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(graph["level"], "sentence");
    assert_eq!(graph["label"], "Sentence Level");
    assert_eq!(graph["elements"]["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(graph["elements"]["edges"].as_array().unwrap().len(), 7);

    assert_eq!(find_edge(&graph, "Jack Kerouac", "Carl Solomon").unwrap()["data"]["weight"], 2);
    assert!(find_edge(&graph, "Jack Kerouac", "Allen Ginsberg").is_none());

    let stylesheet = graph["stylesheet"].as_array().unwrap();
    assert_eq!(stylesheet[0]["selector"], "node");
    assert!(stylesheet.iter().any(|rule| {
        rule["selector"] == "node[id = \"Walt Whitman\"]" && rule["style"]["background-color"] == "#ff9999"
    }));
    let edge_rule = stylesheet.last().unwrap();
    assert_eq!(edge_rule["selector"], "edge");
    assert_eq!(edge_rule["style"]["width"], "mapData(weight, 1, 2, 1, 12)");
    assert_eq!(graph["stats"]["max_weight"], 2);
}

#[tokio::test]
async fn test_paragraph_graph() {
    let (status, graph) = send(
        create_router_for_testing(),
        create_json_request("GET", "/api/v1/graphs/paragraph", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(graph["label"], "Paragraph Level");
    assert_eq!(find_edge(&graph, "Carl Solomon", "Jack Kerouac").unwrap()["data"]["weight"], 2);
    assert_eq!(find_edge(&graph, "Allen Ginsberg", "Jack Kerouac").unwrap()["data"]["weight"], 1);
    assert!(find_edge(&graph, "Allen Ginsberg", "Walt Whitman").is_none());
}

#[tokio::test]
async fn test_unknown_graph_level() {
    let (status, json) = send(
        create_router_for_testing(),
        create_json_request("GET", "/api/v1/graphs/chapter", None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_subjects_ranked() {
    let (status, json) = send(
        create_router_for_testing(),
        create_json_request("GET", "/api/v1/subjects", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["top_n"], 27);
    assert_eq!(json["total_mentions"], 8);

    let subjects = json["subjects"].as_array().unwrap();
    let names: Vec<&str> = subjects.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["Carl Solomon", "Jack Kerouac", "Allen Ginsberg", "Neal Cassady", "Walt Whitman"]
    );
    assert_eq!(subjects[0]["rank"], 1);
    assert_eq!(subjects[0]["count"], 3);
    assert_eq!(subjects[4]["highlighted"], true);
    assert_eq!(subjects[0]["highlighted"], false);
}

// =============================================================================
// Hover Tests
// =============================================================================

#[tokio::test]
async fn test_hover_placeholders() {
    let (status, readout) = send(
        create_router_for_testing(),
        create_json_request("GET", "/api/v1/hover", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(readout["node_info"], "Hover over a node to see details.");
    assert_eq!(readout["edge_info"], "Hover over an edge to see co-occurrence weight.");
}

#[tokio::test]
async fn test_hover_formats_page_state() {
    let (status, reply) = send(
        create_router_for_testing(),
        create_json_request(
            "POST",
            "/api/v1/hover",
            Some(json!({
                "seq": 7,
                "events": [
                    {"kind": "node", "level": "paragraph", "label": "Neal Cassady"},
                    {
                        "kind": "edge",
                        "level": "sentence",
                        "source": "Carl Solomon",
                        "target": "Jack Kerouac",
                        "weight": 2
                    }
                ]
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["seq"], 7);
    assert_eq!(reply["readout"]["node_info"], "[Paragraph Level] Name: Neal Cassady");
    assert_eq!(
        reply["readout"]["edge_info"],
        "[Sentence Level] Carl Solomon ↔ Jack Kerouac (Weight: 2)"
    );
}

#[tokio::test]
async fn test_hover_replies_depend_only_on_their_request() {
    let app = create_router_for_testing();

    // the page moved onto a node, then off it; the replies are handled in reverse
    let leave = json!({"seq": 2, "events": [{"kind": "leave", "element": "node"}]});
    let enter = json!({
        "seq": 1,
        "events": [{"kind": "node", "level": "sentence", "label": "Carl Solomon"}]
    });

    let (_, late) = send(app.clone(), create_json_request("POST", "/api/v1/hover", Some(leave))).await;
    let (_, early) = send(app.clone(), create_json_request("POST", "/api/v1/hover", Some(enter))).await;
    assert_eq!(late["seq"], 2);
    assert_eq!(late["readout"]["node_info"], "Hover over a node to see details.");
    assert_eq!(early["seq"], 1);
    assert_eq!(early["readout"]["node_info"], "[Sentence Level] Name: Carl Solomon");

    // another page starts from the placeholders
    let (_, other) = send(
        app,
        create_json_request("POST", "/api/v1/hover", Some(json!({"seq": 1}))),
    )
    .await;
    assert_eq!(other["readout"]["node_info"], "Hover over a node to see details.");
    assert_eq!(other["readout"]["edge_info"], "Hover over an edge to see co-occurrence weight.");
}

#[tokio::test]
async fn test_hover_rejects_malformed_event() {
    let (status, json) = send(
        create_router_for_testing(),
        create_json_request(
            "POST",
            "/api/v1/hover",
            Some(json!({"seq": 1, "events": [{"kind": "wave"}]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

// =============================================================================
// Asset Tests
// =============================================================================

#[tokio::test]
async fn test_assets_served_from_configured_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cytoscape.min.js"), "window.cytoscape = function () {};").unwrap();

    let mut config = sample_config();
    config.dashboard.assets_dir = Some(dir.path().to_path_buf());
    config.dashboard.script_src = "/assets/cytoscape.min.js".to_string();
    let app = create_router(Arc::new(AppState::from_text(config, SAMPLE).unwrap()));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/assets/cytoscape.min.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.starts_with(b"window.cytoscape"));

    let page = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = axum::body::to_bytes(page.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("<script src=\"/assets/cytoscape.min.js\">"));
}

#[tokio::test]
async fn test_assets_absent_without_dir() {
    let response = create_router_for_testing()
        .oneshot(Request::builder().uri("/assets/cytoscape.min.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Startup Tests
// =============================================================================

#[test]
fn test_prepare_reads_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.txt");
    std::fs::write(&path, format!("Contents\n{SAMPLE}")).unwrap();

    let mut config = sample_config();
    config.input.text_path = path;
    config.analysis.start_line = 1;
    config.analysis.top_n = 2;

    let state = AppState::prepare(config).unwrap();
    assert_eq!(state.analysis.subjects, vec!["Carl Solomon", "Jack Kerouac"]);
    assert_eq!(state.analysis.sentence_graph.weight("Carl Solomon", "Jack Kerouac"), Some(2));
}

#[test]
fn test_prepare_reports_missing_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = sample_config();
    config.input.text_path = dir.path().join("book.txt");

    let err = AppState::prepare(config.clone()).err().unwrap();
    assert_eq!(err.kind(), "input-not-found");

    config.input.epub_path = Some(dir.path().join("book.epub"));
    let err = AppState::prepare(config).err().unwrap();
    assert_eq!(err.kind(), "input-not-found");
}
