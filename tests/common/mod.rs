#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use utilization::common::clock::FixedClock;
use utilization::config::AppState;
use utilization::db::MemoryStore;
use utilization::models::project::UtilizationRule;
use utilization::router;
use utilization::services::ProjectDeleteMode;

/// Router over an empty in-memory store, with "today" pinned to 2025-02-10.
pub fn build_test_app() -> Router {
    build_test_app_with(ProjectDeleteMode::Soft, UtilizationRule::RequireResources)
}

pub fn build_test_app_with(delete_mode: ProjectDeleteMode, rule: UtilizationRule) -> Router {
    let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());
    let state = AppState::with_store(
        Arc::new(MemoryStore::new()),
        Arc::new(clock),
        delete_mode,
        rule,
    );
    router::app(state)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
