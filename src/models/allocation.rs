// src/models/allocation.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::validation::{check_days_within_present, validate_not_negative};
use crate::models::days_to_hours;

// ---
// Allocation (project <-> resource, with the days booked on it)
// ---
// Either side becomes NULL when its record is hard-deleted; the row stays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub id: Uuid,
    pub project_id: Option<Uuid>,
    pub resource_id: Option<Uuid>,

    #[schema(example = 5.0)]
    pub present_day: f64,

    #[schema(example = 3.0)]
    pub billable_days: f64,

    #[schema(example = 24.0)]
    pub billable_hours: f64,

    #[schema(example = 2.0)]
    pub non_billable_days: f64,

    #[schema(example = 16.0)]
    pub non_billable_hours: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllocationInput {
    pub resource_id: Uuid,

    #[validate(
        custom(function = "validate_not_negative"),
        range(max = 31.0, message = "At most 31 days fit in a month.")
    )]
    #[serde(default)]
    pub present_day: f64,

    #[validate(
        custom(function = "validate_not_negative"),
        range(max = 31.0, message = "At most 31 days fit in a month.")
    )]
    #[serde(default)]
    pub billable_days: f64,

    #[validate(
        custom(function = "validate_not_negative"),
        range(max = 31.0, message = "At most 31 days fit in a month.")
    )]
    #[serde(default)]
    pub non_billable_days: f64,
}

impl AllocationInput {
    /// An empty allocation, used when a resource is added through the
    /// project's resource set.
    pub fn empty(resource_id: Uuid) -> Self {
        Self {
            resource_id,
            present_day: 0.0,
            billable_days: 0.0,
            non_billable_days: 0.0,
        }
    }

    pub fn validate_consistency(&self) -> Result<(), (&'static str, ValidationError)> {
        check_days_within_present(self.present_day, self.billable_days, self.non_billable_days)
            .map_err(|e| ("billable_days", e))
    }
}

/// One resource's contribution to a project.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUtilization {
    pub present_days: f64,
    pub billable_days: f64,
    pub billable_hours: f64,
    pub non_billable_days: f64,
    pub non_billable_hours: f64,
    pub total_hours: f64,
}

impl Allocation {
    pub fn new(id: Uuid, project_id: Uuid, input: &AllocationInput, now: DateTime<Utc>) -> Self {
        let mut allocation = Self {
            id,
            project_id: Some(project_id),
            resource_id: Some(input.resource_id),
            present_day: 0.0,
            billable_days: 0.0,
            billable_hours: 0.0,
            non_billable_days: 0.0,
            non_billable_hours: 0.0,
            created_at: now,
            updated_at: now,
        };
        allocation.apply(input, now);
        allocation
    }

    pub fn apply(&mut self, input: &AllocationInput, now: DateTime<Utc>) {
        self.resource_id = Some(input.resource_id);
        self.present_day = input.present_day;
        self.billable_days = input.billable_days;
        self.non_billable_days = input.non_billable_days;
        self.updated_at = now;
        self.recompute();
    }

    pub fn recompute(&mut self) {
        self.billable_hours = days_to_hours(self.billable_days);
        self.non_billable_hours = days_to_hours(self.non_billable_days);
    }

    pub fn total_hours(&self) -> f64 {
        self.billable_hours + self.non_billable_hours
    }

    pub fn utilization(&self) -> ResourceUtilization {
        ResourceUtilization {
            present_days: self.present_day,
            billable_days: self.billable_days,
            billable_hours: self.billable_hours,
            non_billable_days: self.non_billable_days,
            non_billable_hours: self.non_billable_hours,
            total_hours: self.total_hours(),
        }
    }

    /// (project, resource) is unique while both sides are set.
    pub fn same_key(&self, other: &Allocation) -> bool {
        self.id != other.id
            && self.project_id.is_some()
            && self.resource_id.is_some()
            && self.project_id == other.project_id
            && self.resource_id == other.resource_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(present: f64, billable: f64, non_billable: f64) -> AllocationInput {
        AllocationInput {
            resource_id: Uuid::new_v4(),
            present_day: present,
            billable_days: billable,
            non_billable_days: non_billable,
        }
    }

    #[test]
    fn overbooked_allocation_is_rejected() {
        assert!(input(5.0, 3.0, 3.0).validate_consistency().is_err());
    }

    #[test]
    fn booking_exactly_the_present_days_is_accepted() {
        assert!(input(5.0, 3.0, 2.0).validate_consistency().is_ok());
        assert!(input(5.0, 3.0, 2.0).validate().is_ok());
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(input(-1.0, 0.0, 0.0).validate().is_err());
        assert!(input(1.0, -1.0, 0.0).validate().is_err());
        assert!(input(1.0, 0.0, -1.0).validate().is_err());
    }

    #[test]
    fn days_beyond_one_month_are_rejected() {
        assert!(input(31.0, 31.0, 0.0).validate().is_ok());
        assert!(input(1e308, 1e308, 0.0).validate().is_err());
        assert!(input(f64::INFINITY, 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn hours_are_derived_from_days() {
        let a = Allocation::new(Uuid::new_v4(), Uuid::new_v4(), &input(5.0, 3.0, 1.5), Utc::now());
        assert_eq!(a.billable_hours, 24.0);
        assert_eq!(a.non_billable_hours, 12.0);

        let summary = a.utilization();
        assert_eq!(summary.present_days, 5.0);
        assert_eq!(summary.total_hours, 36.0);
    }

    #[test]
    fn dangling_allocations_never_collide() {
        let now = Utc::now();
        let shared = input(1.0, 1.0, 0.0);
        let project = Uuid::new_v4();
        let mut a = Allocation::new(Uuid::new_v4(), project, &shared, now);
        let mut b = Allocation::new(Uuid::new_v4(), project, &shared, now);
        assert!(a.same_key(&b));

        a.project_id = None;
        b.project_id = None;
        assert!(!a.same_key(&b));
    }
}
