// src/handlers/projects.rs

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
        allocation::{Allocation, AllocationInput, ResourceUtilization},
        project::{ProjectDetail, ProjectFilter, ProjectInput},
    },
};

// ---
// Projects
// ---

// GET /api/projects
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    params(ProjectFilter),
    responses(
        (status = 200, description = "Projects with metrics, most recently updated first", body = Vec<ProjectDetail>)
    )
)]
pub async fn list_projects(
    State(app_state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> Result<impl IntoResponse, AppError> {
    let projects = app_state.project_service.list(&filter).await?;
    Ok((StatusCode::OK, Json(projects)))
}

// POST /api/projects
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = ProjectInput,
    responses(
        (status = 201, description = "Project created", body = ProjectDetail),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "A listed resource does not exist"),
        (status = 409, description = "Project already exists for this period")
    )
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    Json(payload): Json<ProjectInput>,
) -> Result<impl IntoResponse, AppError> {
    let project = app_state.project_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

// GET /api/projects/{id}
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project, metrics and allocations", body = ProjectDetail),
        (status = 404, description = "No such project")
    )
)]
pub async fn get_project(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let project = app_state.project_service.get(id).await?;
    Ok((StatusCode::OK, Json(project)))
}

// PUT /api/projects/{id}
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body = ProjectInput,
    responses(
        (status = 200, description = "Project updated", body = ProjectDetail),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "No such project or resource"),
        (status = 409, description = "Project already exists for this period")
    )
)]
pub async fn update_project(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectInput>,
) -> Result<impl IntoResponse, AppError> {
    let project = app_state.project_service.update(id, payload).await?;
    Ok((StatusCode::OK, Json(project)))
}

// DELETE /api/projects/{id}
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 204, description = "Project deactivated or removed, depending on PROJECT_DELETE_MODE"),
        (status = 404, description = "No such project")
    )
)]
pub async fn delete_project(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.project_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Allocations
// ---

// GET /api/projects/{id}/allocations
#[utoipa::path(
    get,
    path = "/api/projects/{id}/allocations",
    tag = "Allocations",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Allocations of the project, newest first", body = Vec<Allocation>),
        (status = 404, description = "No such project")
    )
)]
pub async fn list_allocations(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let allocations = app_state.project_service.list_allocations(id).await?;
    Ok((StatusCode::OK, Json(allocations)))
}

// POST /api/projects/{id}/allocations
#[utoipa::path(
    post,
    path = "/api/projects/{id}/allocations",
    tag = "Allocations",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body = AllocationInput,
    responses(
        (status = 201, description = "Allocation added", body = Allocation),
        (status = 400, description = "Invalid input or days exceed present days"),
        (status = 404, description = "No such project or resource"),
        (status = 409, description = "Resource is already allocated to the project")
    )
)]
pub async fn add_allocation(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AllocationInput>,
) -> Result<impl IntoResponse, AppError> {
    let allocation = app_state.project_service.add_allocation(id, payload).await?;
    Ok((StatusCode::CREATED, Json(allocation)))
}

// PUT /api/allocations/{id}
#[utoipa::path(
    put,
    path = "/api/allocations/{id}",
    tag = "Allocations",
    params(("id" = Uuid, Path, description = "Allocation id")),
    request_body = AllocationInput,
    responses(
        (status = 200, description = "Allocation updated", body = Allocation),
        (status = 400, description = "Invalid input or days exceed present days"),
        (status = 404, description = "No such allocation or resource"),
        (status = 409, description = "Resource is already allocated to the project")
    )
)]
pub async fn update_allocation(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AllocationInput>,
) -> Result<impl IntoResponse, AppError> {
    let allocation = app_state.project_service.update_allocation(id, payload).await?;
    Ok((StatusCode::OK, Json(allocation)))
}

// DELETE /api/allocations/{id}
#[utoipa::path(
    delete,
    path = "/api/allocations/{id}",
    tag = "Allocations",
    params(("id" = Uuid, Path, description = "Allocation id")),
    responses(
        (status = 204, description = "Allocation removed"),
        (status = 404, description = "No such allocation")
    )
)]
pub async fn remove_allocation(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.project_service.remove_allocation(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/projects/{id}/resources/{resource_id}/utilization
#[utoipa::path(
    get,
    path = "/api/projects/{id}/resources/{resource_id}/utilization",
    tag = "Allocations",
    params(
        ("id" = Uuid, Path, description = "Project id"),
        ("resource_id" = Uuid, Path, description = "Resource id")
    ),
    responses(
        (status = 200, description = "Days and hours the resource contributes", body = ResourceUtilization),
        (status = 404, description = "Resource is not allocated to the project")
    )
)]
pub async fn resource_utilization(
    State(app_state): State<AppState>,
    Path((id, resource_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state
        .project_service
        .resource_utilization(id, resource_id)
        .await?
        .ok_or_else(|| AppError::not_found("Allocation for this resource"))?;
    Ok((StatusCode::OK, Json(summary)))
}
