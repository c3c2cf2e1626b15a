//! HTTP API tests driven through the router with `tower::ServiceExt::oneshot`

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use kwscout::api::create_api_router;
use kwscout::clock::ManualClock;
use kwscout::config::{GovernorConfig, StoreConfig};
use kwscout::storage::MemoryStore;
use kwscout::{KeywordService, ServiceSettings};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn create_app(default_quota: u32) -> Router {
    let settings = ServiceSettings {
        governor: GovernorConfig {
            min_spacing: Duration::ZERO,
            ..GovernorConfig::default()
        },
        stores: StoreConfig {
            default_quota,
            ..StoreConfig::default()
        },
        ..ServiceSettings::default()
    };
    let service = KeywordService::new(
        Arc::new(MemoryStore::new()),
        ManualClock::new(1_700_000_000_000),
        settings,
    );
    create_api_router(Arc::new(service))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_app(5);
    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "OK");
}

#[tokio::test]
async fn test_analyze_returns_full_analysis() {
    let app = create_app(5);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/analyze", json!({ "keyword": "SEO Tools" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let analysis = body_json(response).await;
    assert_eq!(analysis["metrics"]["keyword"], "SEO Tools");
    assert_eq!(analysis["metrics"]["trend"].as_array().unwrap().len(), 12);
    assert_eq!(analysis["serp"].as_array().unwrap().len(), 6);
    assert_eq!(analysis["provider"], "Mock SERP + Trends");

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/history"))
        .await
        .unwrap();
    let history = body_json(response).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    let response = app
        .oneshot(empty_request("GET", "/api/quota"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["searchesRemaining"], 4);
}

#[tokio::test]
async fn test_empty_keyword_is_bad_request() {
    let app = create_app(5);
    let response = app
        .oneshot(json_request("POST", "/api/analyze", json!({ "keyword": "  " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Please enter a keyword to analyze."
    );
}

#[tokio::test]
async fn test_export_flow() {
    let app = create_app(5);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/export?format=csv"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/current"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.clone()
        .oneshot(json_request("POST", "/api/analyze", json!({ "keyword": "local seo" })))
        .await
        .unwrap();

    let response = app
        .oneshot(empty_request("GET", "/api/export?format=csv"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("keyword,"));
    assert!(csv.lines().nth(1).unwrap().starts_with("local seo,"));
}

#[tokio::test]
async fn test_quota_exhaustion_is_too_many_requests() {
    let app = create_app(1);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/analyze", json!({ "keyword": "seo" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/analyze", json!({ "keyword": "backlinks" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let response = app
        .oneshot(empty_request("POST", "/api/quota/replenish"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["searchesRemaining"], 1);
}

#[tokio::test]
async fn test_provider_selection() {
    let app = create_app(5);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/providers"))
        .await
        .unwrap();
    let providers = body_json(response).await;
    assert_eq!(providers["selected"], "mock");
    assert_eq!(providers["providers"].as_array().unwrap().len(), 5);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/providers/selected",
            json!({ "provider": "semrush" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/providers/selected",
            json!({ "provider": "google-trends" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request("POST", "/api/analyze", json!({ "keyword": "seo" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_favorite_toggle_round_trip() {
    let app = create_app(5);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/analyze", json!({ "keyword": "site speed" })))
        .await
        .unwrap();
    let analysis = body_json(response).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/favorites/toggle", analysis.clone()))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = app
        .oneshot(json_request("POST", "/api/favorites/toggle", analysis))
        .await
        .unwrap();
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_ai_keywords_endpoint() {
    let app = create_app(5);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/ai-keywords?keyword=seo&count=3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!(["seo optimization", "seo strategy", "seo techniques"])
    );

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/ai-keywords?keyword=seo"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 10);

    let response = app
        .oneshot(empty_request("GET", "/api/ai-keywords?keyword=%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_export_endpoint() {
    let app = create_app(5);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/history/export"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "No data to export");

    for keyword in ["seo", "backlinks"] {
        app.clone()
            .oneshot(json_request("POST", "/api/analyze", json!({ "keyword": keyword })))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(empty_request("GET", "/api/history/export"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().nth(1).unwrap().starts_with("backlinks,"));
}
