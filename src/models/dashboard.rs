// src/models/dashboard.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::project::ProjectMetrics;

// 1. Top cards + per-project utilization
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub resource_count: usize,
    pub active_project_count: usize,
    pub total_present_days: f64,
    pub total_present_hours: f64,
    pub total_billable_hours: f64,
    pub total_non_billable_hours: f64,
    /// Mean of the per-project percentages; 0 without projects.
    pub average_utilization: f64,
    pub projects: Vec<ProjectMetrics>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DashboardFilter {
    /// Restricts the resource totals to one period.
    pub year: Option<i32>,
    pub month: Option<i32>,
}

// 2. Pickers on the home page
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthChoice {
    pub number: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodOptions {
    pub years: Vec<i32>,
    pub months: Vec<MonthChoice>,
    pub current_year: i32,
}

// 3. Help text for the working-days field
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkingDaysHint {
    pub year: i32,
    pub month: u32,
    pub working_days: u32,
    #[schema(example = "21 days (February 2025)")]
    pub display: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct WorkingDaysQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}
