//! Integration tests for the dashboard, health and docs endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json};
use serde_json::json;

#[tokio::test]
async fn health_is_ok() {
    let response = get(build_test_app(), "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let response = get(build_test_app(), "/api/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let response = get(build_test_app(), "/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["paths"]["/api/projects"].is_object());
}

#[tokio::test]
async fn summary_on_empty_store() {
    let response = get(build_test_app(), "/api/dashboard/summary").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["resourceCount"], 0);
    assert_eq!(json["activeProjectCount"], 0);
    assert_eq!(json["averageUtilization"], 0.0);
}

#[tokio::test]
async fn summary_aggregates_records() {
    let app = build_test_app();
    let alice = body_json(
        post_json(
            app.clone(),
            "/api/resources",
            json!({ "name": "Alice", "year": 2025, "month": 2, "presentDay": 10 }),
        )
        .await,
    )
    .await;
    post_json(
        app.clone(),
        "/api/resources",
        json!({ "name": "Bob", "year": 2025, "month": 3, "presentDay": 5 }),
    )
    .await;
    post_json(
        app.clone(),
        "/api/projects",
        json!({ "name": "Website", "billableDays": 11, "resourceIds": [alice["id"]] }),
    )
    .await;

    let json = body_json(get(app.clone(), "/api/dashboard/summary").await).await;
    assert_eq!(json["resourceCount"], 2);
    assert_eq!(json["activeProjectCount"], 1);
    assert_eq!(json["totalPresentHours"], 120.0);
    assert_eq!(json["totalBillableHours"], 88.0);
    assert_eq!(json["averageUtilization"], 50.0);
    assert_eq!(json["projects"][0]["projectName"], "Website");

    let json = body_json(get(app, "/api/dashboard/summary?year=2025&month=2").await).await;
    assert_eq!(json["resourceCount"], 1);
    assert_eq!(json["totalPresentDays"], 10.0);
}

#[tokio::test]
async fn period_options() {
    let json = body_json(get(build_test_app(), "/api/dashboard/periods").await).await;
    assert_eq!(json["years"].as_array().unwrap().len(), 11);
    assert_eq!(json["months"][0]["name"], "January");
    assert_eq!(json["months"][11]["number"], 12);
    assert_eq!(json["currentYear"], 2025);
}
