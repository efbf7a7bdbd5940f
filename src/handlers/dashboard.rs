// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::{DashboardFilter, DashboardSummary, PeriodOptions},
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    params(DashboardFilter),
    responses(
        (status = 200, description = "Totals and per-project utilization", body = DashboardSummary)
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    Query(filter): Query<DashboardFilter>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.summary(&filter).await?;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/periods
#[utoipa::path(
    get,
    path = "/api/dashboard/periods",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Years and months offered by the pickers", body = PeriodOptions)
    )
)]
pub async fn get_periods(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.dashboard_service.period_options())
}
