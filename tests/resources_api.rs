//! Integration tests for the resource and calendar endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, post_json, put_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Create: derived hours and working days
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_resource_fills_derived_fields() {
    let app = build_test_app();
    let response = post_json(
        app.clone(),
        "/api/resources",
        json!({ "name": "Alice", "year": 2025, "month": 2, "presentDay": 10 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["resourceName"], "Alice");
    assert_eq!(json["presentHours"], 80.0);
    assert_eq!(json["workingDays"], 21.0);

    let id = json["id"].as_str().unwrap();
    let response = get(app, &format!("/api/resources/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["presentDay"], 10.0);
}

#[tokio::test]
async fn explicit_hours_are_kept() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/api/resources",
        json!({ "name": "Bob", "presentDay": 10, "presentHours": 75, "workingDays": 20 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["presentHours"], 75.0);
    assert_eq!(json["workingDays"], 20.0);
    // Period defaults to the pinned "today".
    assert_eq!(json["year"], 2025);
    assert_eq!(json["month"], 2);
}

// ---------------------------------------------------------------------------
// Validation and uniqueness
// ---------------------------------------------------------------------------

#[tokio::test]
async fn negative_days_are_a_bad_request() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/api/resources",
        json!({ "name": "Alice", "presentDay": -1 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["details"]["presentDay"].is_array());
}

#[tokio::test]
async fn out_of_range_month_is_a_bad_request() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/api/resources",
        json!({ "name": "Alice", "year": 2025, "month": 13 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_period_is_a_conflict() {
    let app = build_test_app();
    let body = json!({ "name": "Alice", "year": 2025, "month": 2, "presentDay": 1 });

    let first = post_json(app.clone(), "/api/resources", body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app, "/api/resources", body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Update, list and delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_recomputes_and_delete_removes() {
    let app = build_test_app();
    let created = body_json(
        post_json(
            app.clone(),
            "/api/resources",
            json!({ "name": "Alice", "year": 2025, "month": 2, "presentDay": 10 }),
        )
        .await,
    )
    .await;
    let uri = format!("/api/resources/{}", created["id"].as_str().unwrap());

    let response = put_json(
        app.clone(),
        &uri,
        json!({ "name": "Alice", "year": 2025, "month": 3, "presentDay": 12 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["presentHours"], 96.0);
    assert_eq!(json["workingDays"], 22.0);

    assert_eq!(delete(app.clone(), &uri).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(get(app.clone(), &uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete(app, &uri).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_month_and_name() {
    let app = build_test_app();
    for (name, month) in [("Alice", 2), ("Bob", 2), ("Alice", 3)] {
        let response = post_json(
            app.clone(),
            "/api/resources",
            json!({ "name": name, "year": 2025, "month": month }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let all = body_json(get(app.clone(), "/api/resources").await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let feb = body_json(get(app.clone(), "/api/resources?year=2025&month=2").await).await;
    assert_eq!(feb.as_array().unwrap().len(), 2);

    let alice = body_json(get(app, "/api/resources?search=ali").await).await;
    assert_eq!(alice.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_resource_is_not_found() {
    let app = build_test_app();
    let response = get(app, "/api/resources/00000000-0000-0000-0000-000000000000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[tokio::test]
async fn working_days_hint_defaults_to_current_month() {
    let app = build_test_app();
    let response = get(app.clone(), "/api/calendar/working-days").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["workingDays"], 21);
    assert_eq!(json["display"], "21 days (February 2025)");

    let json = body_json(get(app.clone(), "/api/calendar/working-days?year=2024&month=2").await).await;
    assert_eq!(json["workingDays"], 22);

    let response = get(app, "/api/calendar/working-days?year=2025&month=13").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
