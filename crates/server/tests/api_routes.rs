//! Route tests for the analysis API, driven through the full router.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use plagio::{Document, Engine, ExternalMatch, MatchSource, SourceError};
use serde_json::{json, Value};
use server::{build_router, ServerConfig, ServerState};
use tower::ServiceExt;

const GATO: &str = "El gato corre rápido por el jardín verde todos los días.";
const PERRO: &str = "Cada mañana, el perro corre rápido por el jardín verde todos los días.";
const BALLENAS: &str = "Las ballenas migran miles de kilómetros cada año en busca de alimento.";

struct Unavailable;

#[async_trait]
impl MatchSource for Unavailable {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn propose_matches(&self, _documents: &[Document]) -> Result<Vec<ExternalMatch>, SourceError> {
        Err(SourceError::Status {
            status: 503,
            body: "overloaded".into(),
        })
    }
}

fn app() -> Router {
    let state = ServerState::new(ServerConfig::default()).unwrap();
    build_router(Arc::new(state))
}

fn app_with_source() -> Router {
    let engine = Engine::with_defaults()
        .unwrap()
        .with_source(Arc::new(Unavailable));
    build_router(Arc::new(ServerState::with_engine(
        ServerConfig::default(),
        engine,
    )))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_reports_service() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "plagio-server");
    assert!(body["server"].get("remote_source").is_none());
}

#[tokio::test]
async fn health_names_the_remote_source() {
    let response = app_with_source()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["server"]["remote_source"], "unavailable");
}

#[tokio::test]
async fn api_info_lists_endpoints() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["api_version"], "v1");
    assert!(body["endpoints"]
        .as_array()
        .unwrap()
        .contains(&json!("/api/v1/analyze")));
}

#[tokio::test]
async fn analyze_returns_camel_case_result() {
    let request = post_json(
        "/api/v1/analyze",
        json!({
            "documents": [
                { "name": "a.txt", "content": GATO },
                { "name": "b.txt", "content": PERRO }
            ]
        }),
    );
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["documentA"], "a.txt");
    assert_eq!(body["documentB"], "b.txt");
    assert_eq!(body["status"], "completed");
    assert_eq!(body["totalMatches"], 1);
    let similarity = body["similarity"].as_u64().unwrap();
    assert!((60..=90).contains(&similarity), "similarity {similarity}");
    assert_eq!(
        body["matches"][0]["originalText"],
        "corre rápido por el jardín verde todos los días"
    );
}

#[tokio::test]
async fn analyze_honours_policy_override() {
    let request = post_json(
        "/api/v1/analyze",
        json!({
            "documents": [
                { "name": "a.txt", "content": GATO },
                { "name": "b.txt", "content": PERRO },
                { "name": "c.txt", "content": BALLENAS }
            ],
            "policy": "exhaustive"
        }),
    );
    let body = body_json(app().oneshot(request).await.unwrap()).await;
    assert_eq!(body["pairs"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn failing_remote_source_degrades_to_local() {
    let request = post_json(
        "/api/v1/compare",
        json!({
            "document_a": { "name": "a.txt", "content": GATO },
            "document_b": { "name": "b.txt", "content": GATO }
        }),
    );
    let response = app_with_source().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["similarity"], 100);
}

#[tokio::test]
async fn single_document_is_a_bad_request() {
    let request = post_json(
        "/api/v1/analyze",
        json!({ "documents": [{ "name": "a.txt", "content": GATO }] }),
    );
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INSUFFICIENT_INPUT");
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"documents\": ["))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn report_is_plain_text() {
    let request = post_json(
        "/api/v1/report",
        json!({
            "documents": [
                { "name": "a.txt", "content": GATO },
                { "name": "b.txt", "content": PERRO }
            ]
        }),
    );
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    let text = body_text(response).await;
    assert!(text.starts_with("REPORTE DE ANÁLISIS DE PLAGIO"));
    assert!(text.contains("Documento A: a.txt"));
}

#[tokio::test]
async fn report_reflects_strategy_override() {
    let request = post_json(
        "/api/v1/report",
        json!({
            "documents": [
                { "name": "a.txt", "content": GATO },
                { "name": "b.txt", "content": GATO }
            ],
            "strategy": "sentence"
        }),
    );
    let text = body_text(app().oneshot(request).await.unwrap()).await;
    assert!(text.contains("Algoritmo: comparación de oraciones"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = app()
        .oneshot(Request::builder().uri("/api/v1/index").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn request_id_is_echoed() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");

    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
