// src/handlers/resources.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        dashboard::{WorkingDaysHint, WorkingDaysQuery},
        resource::{Resource, ResourceFilter, ResourceInput},
    },
};

// GET /api/resources
#[utoipa::path(
    get,
    path = "/api/resources",
    tag = "Resources",
    params(ResourceFilter),
    responses(
        (status = 200, description = "Monthly attendance records, by name", body = Vec<Resource>)
    )
)]
pub async fn list_resources(
    State(app_state): State<AppState>,
    Query(filter): Query<ResourceFilter>,
) -> Result<impl IntoResponse, AppError> {
    let resources = app_state.resource_service.list(&filter).await?;
    Ok((StatusCode::OK, Json(resources)))
}

// POST /api/resources
#[utoipa::path(
    post,
    path = "/api/resources",
    tag = "Resources",
    request_body = ResourceInput,
    responses(
        (status = 201, description = "Record created", body = Resource),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Person already has a record for this month")
    )
)]
pub async fn create_resource(
    State(app_state): State<AppState>,
    Json(payload): Json<ResourceInput>,
) -> Result<impl IntoResponse, AppError> {
    let resource = app_state.resource_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

// GET /api/resources/{id}
#[utoipa::path(
    get,
    path = "/api/resources/{id}",
    tag = "Resources",
    params(("id" = Uuid, Path, description = "Resource id")),
    responses(
        (status = 200, description = "The record", body = Resource),
        (status = 404, description = "No such record")
    )
)]
pub async fn get_resource(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let resource = app_state.resource_service.get(id).await?;
    Ok((StatusCode::OK, Json(resource)))
}

// PUT /api/resources/{id}
#[utoipa::path(
    put,
    path = "/api/resources/{id}",
    tag = "Resources",
    params(("id" = Uuid, Path, description = "Resource id")),
    request_body = ResourceInput,
    responses(
        (status = 200, description = "Record updated", body = Resource),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "No such record"),
        (status = 409, description = "Person already has a record for this month")
    )
)]
pub async fn update_resource(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResourceInput>,
) -> Result<impl IntoResponse, AppError> {
    let resource = app_state.resource_service.update(id, payload).await?;
    Ok((StatusCode::OK, Json(resource)))
}

// DELETE /api/resources/{id}
#[utoipa::path(
    delete,
    path = "/api/resources/{id}",
    tag = "Resources",
    params(("id" = Uuid, Path, description = "Resource id")),
    responses(
        (status = 204, description = "Record deleted; its allocations are kept"),
        (status = 404, description = "No such record")
    )
)]
pub async fn delete_resource(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.resource_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/calendar/working-days
#[utoipa::path(
    get,
    path = "/api/calendar/working-days",
    tag = "Resources",
    params(WorkingDaysQuery),
    responses(
        (status = 200, description = "Working days of the month (current month by default)", body = WorkingDaysHint),
        (status = 400, description = "Month outside 1..=12")
    )
)]
pub async fn working_days(
    State(app_state): State<AppState>,
    Query(query): Query<WorkingDaysQuery>,
) -> Result<impl IntoResponse, AppError> {
    let hint = app_state
        .resource_service
        .working_days_hint(query.year, query.month)?;
    Ok((StatusCode::OK, Json(hint)))
}
