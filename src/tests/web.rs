use super::{QueryFailingProvider, SAMPLE_CSV};
use crate::{
    app::AppService,
    config::Config,
    directory::Directory,
    semantic::{EmbeddingProvider, HashEmbedder, MatchParams, SearchService},
    web::router,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(provider: Arc<dyn EmbeddingProvider>) -> Router {
    let directory = Directory::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
    let search =
        SearchService::new(provider, Arc::new(directory), MatchParams::default()).unwrap();

    router(Arc::new(AppService::new(Config::default(), search)))
}

fn app() -> Router {
    app_with(Arc::new(HashEmbedder::default()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn search_request(payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/search")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_returns_matches() {
    let (status, body) = send(app(), search_request(json!({"query": "Electrician"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "matches");

    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["rank"], 1);
    assert_eq!(matches[0]["index"], 0);
    assert_eq!(matches[0]["professional"]["name"], "Ada Obi");
    assert_eq!(matches[1]["professional"]["name"], "Efe Ugo");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_honors_limit() {
    let (status, body) = send(
        app(),
        search_request(json!({"query": "Electrician", "limit": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matches"].as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_no_matches() {
    let (status, body) = send(
        app(),
        search_request(json!({"query": "Xyzzyplugh123", "threshold": 0.9})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "empty"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_invalid_threshold() {
    let (status, body) = send(
        app(),
        search_request(json!({"query": "Driver", "threshold": 1.5})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("threshold"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_negative_limit() {
    let (status, body) = send(
        app(),
        search_request(json!({"query": "Driver", "limit": -1})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_embedding_failure() {
    let app = app_with(Arc::new(QueryFailingProvider));
    let (status, body) = send(app, search_request(json!({"query": "Electrician"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("model unloaded"));
    assert!(body.get("status").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_requires_query() {
    let (status, _) = send(app(), search_request(json!({"threshold": 0.5}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_total() {
    let request = Request::builder()
        .uri("/api/professionals/total")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"total": 5}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config() {
    let request = Request::builder()
        .uri("/api/config")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "hash");
    assert_eq!(body["threshold"], 0.5);
    assert_eq!(body["max_results"], 10);
}
