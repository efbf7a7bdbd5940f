// src/models/project.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::validation::{check_days_within_present, validate_not_blank, validate_not_negative};
use crate::models::{days_to_hours, STANDARD_MONTHLY_HOURS};
use crate::models::allocation::Allocation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "project_type", rename_all = "SCREAMING_SNAKE_CASE")] // DB
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum ProjectType {
    #[default]
    Regular,   // "REGULAR"
    FixedCost, // "FIXED_COST"
}

/// How `utilization_percentage` treats a project without linked resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationRule {
    /// 0% until at least one resource is linked.
    #[default]
    RequireResources,
    /// Always computed from the project's own hours.
    HoursOnly,
}

impl FromStr for UtilizationRule {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "require_resources" => Ok(Self::RequireResources),
            "hours_only" => Ok(Self::HoursOnly),
            other => anyhow::bail!("unknown utilization rule '{other}'"),
        }
    }
}

// ---
// Project
// ---
// Month-agnostic when `year`/`month` are empty; otherwise one row per
// (name, year, month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,

    #[schema(example = "Website")]
    pub project_name: String,

    pub project_type: ProjectType,

    pub year: Option<i32>,
    pub month: Option<i32>,

    /// Optional ceiling for billable + non-billable days.
    pub present_day: Option<f64>,

    #[schema(example = 11.0)]
    pub billable_days: f64,

    #[schema(example = 0.0)]
    pub non_billable_days: f64,

    /// Always billable_days × 8.
    #[schema(example = 88.0)]
    pub billable_hours: f64,

    /// Always non_billable_days × 8.
    #[schema(example = 0.0)]
    pub non_billable_hours: f64,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "The name cannot exceed 100 characters.")
    )]
    #[schema(example = "Website")]
    pub name: String,

    #[serde(default)]
    pub project_type: ProjectType,

    #[validate(range(min = 2000, max = 2100, message = "The year must be between 2000 and 2100."))]
    pub year: Option<i32>,

    #[validate(range(min = 1, max = 12, message = "The month must be between 1 and 12."))]
    pub month: Option<i32>,

    #[validate(
        custom(function = "validate_not_negative"),
        range(max = 366.0, message = "At most 366 days can be booked on a project.")
    )]
    pub present_day: Option<f64>,

    #[validate(
        custom(function = "validate_not_negative"),
        range(max = 366.0, message = "At most 366 days can be booked on a project.")
    )]
    #[serde(default)]
    pub billable_days: f64,

    #[validate(
        custom(function = "validate_not_negative"),
        range(max = 366.0, message = "At most 366 days can be booked on a project.")
    )]
    #[serde(default)]
    pub non_billable_days: f64,

    /// Resources assigned to the project. When given, allocations are
    /// added or removed to match; when absent they are left alone.
    pub resource_ids: Option<Vec<Uuid>>,
}

impl ProjectInput {
    /// Cross-field rules `validate()` cannot express.
    pub fn validate_consistency(&self) -> Result<(), (&'static str, ValidationError)> {
        if self.year.is_some() != self.month.is_some() {
            let mut err = ValidationError::new("period");
            err.message = Some("Year and month must be given together.".into());
            return Err(("month", err));
        }

        if let Some(present) = self.present_day {
            check_days_within_present(present, self.billable_days, self.non_billable_days)
                .map_err(|e| ("billable_days", e))?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProjectFilter {
    pub project_type: Option<ProjectType>,
    /// Soft-deleted projects are hidden unless this is set.
    #[serde(default)]
    pub include_inactive: bool,
    pub search: Option<String>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        if !self.include_inactive && !project.is_active {
            return false;
        }
        if self.project_type.is_some_and(|t| t != project.project_type) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => project
                .project_name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        }
    }
}

/// Derived figures shown next to a project in lists and the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetrics {
    pub project_id: Uuid,
    pub project_name: String,
    pub project_type: ProjectType,
    pub is_active: bool,
    pub billable_hours: f64,
    pub non_billable_hours: f64,
    pub total_hours: f64,
    pub resource_count: usize,
    pub utilization_percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub metrics: ProjectMetrics,
    pub allocations: Vec<Allocation>,
}

impl Project {
    pub fn new(id: Uuid, input: &ProjectInput, now: DateTime<Utc>) -> Self {
        let mut project = Self {
            id,
            project_name: String::new(),
            project_type: ProjectType::Regular,
            year: None,
            month: None,
            present_day: None,
            billable_days: 0.0,
            non_billable_days: 0.0,
            billable_hours: 0.0,
            non_billable_hours: 0.0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        project.apply(input, now);
        project
    }

    pub fn apply(&mut self, input: &ProjectInput, now: DateTime<Utc>) {
        self.project_name = input.name.trim().to_string();
        self.project_type = input.project_type;
        self.year = input.year;
        self.month = input.month;
        self.present_day = input.present_day;
        self.billable_days = input.billable_days;
        self.non_billable_days = input.non_billable_days;
        self.updated_at = now;
        self.recompute();
    }

    /// Hours are overwritten unconditionally on every write.
    pub fn recompute(&mut self) {
        self.billable_hours = days_to_hours(self.billable_days);
        self.non_billable_hours = days_to_hours(self.non_billable_days);
    }

    pub fn total_hours(&self) -> f64 {
        self.billable_hours + self.non_billable_hours
    }

    pub fn utilization_percentage(&self, resource_count: usize, rule: UtilizationRule) -> f64 {
        if rule == UtilizationRule::RequireResources && resource_count == 0 {
            return 0.0;
        }
        (self.total_hours() / STANDARD_MONTHLY_HOURS * 100.0).min(100.0)
    }

    pub fn metrics(&self, resource_count: usize, rule: UtilizationRule) -> ProjectMetrics {
        ProjectMetrics {
            project_id: self.id,
            project_name: self.project_name.clone(),
            project_type: self.project_type,
            is_active: self.is_active,
            billable_hours: self.billable_hours,
            non_billable_hours: self.non_billable_hours,
            total_hours: self.total_hours(),
            resource_count,
            utilization_percentage: self.utilization_percentage(resource_count, rule),
        }
    }

    /// Only monthly projects carry an identity beyond their id.
    pub fn same_key(&self, other: &Project) -> bool {
        self.id != other.id
            && self.year.is_some()
            && self.month.is_some()
            && self.project_name == other.project_name
            && self.year == other.year
            && self.month == other.month
    }
}
