// src/handlers/health.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{common::error::AppError, config::AppState};

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and storage are reachable", body = String),
        (status = 500, description = "Storage is unreachable")
    )
)]
pub async fn health(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    app_state.store.ping().await?;
    Ok((StatusCode::OK, "OK"))
}
