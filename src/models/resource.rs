// src/models/resource.rs

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::calendar;
use crate::common::validation::{validate_not_blank, validate_not_negative};
use crate::models::days_to_hours;

// ---
// Resource (a person tracked for attendance)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,

    #[schema(example = "Alice")]
    pub resource_name: String,

    #[schema(example = 2025)]
    pub year: i32,

    #[schema(example = 2)]
    pub month: i32,

    /// Mon-Fri + first Saturday when left blank.
    #[schema(example = 21.0)]
    pub working_days: Option<f64>,

    #[schema(example = 10.0)]
    pub present_day: f64,

    /// present_day × 8 unless it was entered by hand.
    #[schema(example = 80.0)]
    pub present_hours: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInput {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "The name cannot exceed 100 characters.")
    )]
    #[schema(example = "Alice")]
    pub name: String,

    /// Defaults to the current year.
    #[validate(range(min = 2000, max = 2100, message = "The year must be between 2000 and 2100."))]
    pub year: Option<i32>,

    /// Defaults to the current month.
    #[validate(range(min = 1, max = 12, message = "The month must be between 1 and 12."))]
    pub month: Option<i32>,

    #[validate(
        custom(function = "validate_not_negative"),
        range(max = 31.0, message = "At most 31 days fit in a month.")
    )]
    pub working_days: Option<f64>,

    #[validate(
        custom(function = "validate_not_negative"),
        range(max = 31.0, message = "At most 31 days fit in a month.")
    )]
    #[serde(default)]
    pub present_day: f64,

    #[validate(
        custom(function = "validate_not_negative"),
        range(max = 744.0, message = "At most 744 hours fit in a month.")
    )]
    pub present_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ResourceFilter {
    pub year: Option<i32>,
    pub month: Option<i32>,
    /// Case-insensitive match on the resource name.
    pub search: Option<String>,
}

impl ResourceFilter {
    pub fn matches(&self, resource: &Resource) -> bool {
        if self.year.is_some_and(|y| y != resource.year) {
            return false;
        }
        if self.month.is_some_and(|m| m != resource.month) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => resource
                .resource_name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        }
    }
}

impl Resource {
    /// Builds a new record. Missing year/month come from `today`.
    pub fn new(id: Uuid, input: ResourceInput, today: NaiveDate, now: DateTime<Utc>) -> Self {
        let mut resource = Self {
            id,
            resource_name: input.name.trim().to_string(),
            year: input.year.unwrap_or_else(|| today.year()),
            month: input.month.unwrap_or(today.month() as i32),
            working_days: input.working_days,
            present_day: input.present_day,
            present_hours: input.present_hours.unwrap_or(0.0),
            created_at: now,
            updated_at: now,
        };
        resource.recompute();
        resource
    }

    /// Replaces the editable fields. Year and month are kept when absent.
    pub fn apply(&mut self, input: ResourceInput, now: DateTime<Utc>) {
        self.resource_name = input.name.trim().to_string();
        if let Some(year) = input.year {
            self.year = year;
        }
        if let Some(month) = input.month {
            self.month = month;
        }
        self.working_days = input.working_days;
        self.present_day = input.present_day;
        self.present_hours = input.present_hours.unwrap_or(0.0);
        self.updated_at = now;
        self.recompute();
    }

    /// Fills the derived fields. Must run before every write.
    ///
    /// Hours are only derived when `present_day` is non-zero and no hours
    /// were entered; an explicit hour figure always wins.
    pub fn recompute(&mut self) {
        if self.working_days.is_none_or(|wd| wd == 0.0) {
            self.working_days = Some(self.auto_working_days() as f64);
        }

        if self.present_day != 0.0 && self.present_hours == 0.0 {
            self.present_hours = days_to_hours(self.present_day);
        }
    }

    pub fn auto_working_days(&self) -> u32 {
        calendar::working_days(self.year, self.month_number())
    }

    /// `"21 days (February 2025)"`
    pub fn display_working_days(&self) -> String {
        calendar::describe_working_days(self.year, self.month_number())
    }

    pub fn month_number(&self) -> u32 {
        u32::try_from(self.month).unwrap_or(0)
    }

    pub fn same_key(&self, other: &Resource) -> bool {
        self.id != other.id
            && self.resource_name == other.resource_name
            && self.year == other.year
            && self.month == other.month
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn input(name: &str, year: i32, month: i32, present_day: f64) -> ResourceInput {
        ResourceInput {
            name: name.to_string(),
            year: Some(year),
            month: Some(month),
            present_day,
            ..Default::default()
        }
    }

    #[test]
    fn alice_in_february_2025() {
        let r = Resource::new(Uuid::new_v4(), input("Alice", 2025, 2, 10.0), today(), Utc::now());
        assert_eq!(r.present_hours, 80.0);
        assert_eq!(r.working_days, Some(21.0));
        assert_eq!(r.display_working_days(), "21 days (February 2025)");
    }

    #[test]
    fn present_hours_follow_present_days_when_not_set() {
        for days in [0.0, 0.5, 1.0, 7.5, 22.0] {
            let r = Resource::new(Uuid::new_v4(), input("Bob", 2025, 3, days), today(), Utc::now());
            assert_eq!(r.present_hours, days * 8.0);
        }
    }

    #[test]
    fn explicit_hours_are_kept() {
        let mut i = input("Carol", 2025, 3, 10.0);
        i.present_hours = Some(75.0);
        let r = Resource::new(Uuid::new_v4(), i, today(), Utc::now());
        assert_eq!(r.present_hours, 75.0);
    }

    #[test]
    fn hours_without_present_days_are_not_touched() {
        let mut i = input("Dan", 2025, 3, 0.0);
        i.present_hours = Some(12.0);
        let r = Resource::new(Uuid::new_v4(), i, today(), Utc::now());
        assert_eq!(r.present_day, 0.0);
        assert_eq!(r.present_hours, 12.0);
    }

    #[test]
    fn manual_working_days_are_kept_and_zero_means_auto() {
        let mut i = input("Eve", 2025, 2, 1.0);
        i.working_days = Some(18.5);
        let r = Resource::new(Uuid::new_v4(), i, today(), Utc::now());
        assert_eq!(r.working_days, Some(18.5));

        let mut i = input("Eve", 2025, 2, 1.0);
        i.working_days = Some(0.0);
        let r = Resource::new(Uuid::new_v4(), i, today(), Utc::now());
        assert_eq!(r.working_days, Some(21.0));
    }

    #[test]
    fn missing_period_defaults_to_today() {
        let i = ResourceInput {
            name: "Frank".into(),
            present_day: 2.0,
            ..Default::default()
        };
        let r = Resource::new(Uuid::new_v4(), i, today(), Utc::now());
        assert_eq!((r.year, r.month), (2025, 6));
    }

    #[test]
    fn update_recomputes_hours_from_new_days() {
        let mut r = Resource::new(Uuid::new_v4(), input("Gus", 2025, 2, 10.0), today(), Utc::now());
        let mut change = input("Gus", 2025, 2, 12.0);
        change.year = None;
        change.month = None;
        r.apply(change, Utc::now());
        assert_eq!(r.present_hours, 96.0);
        assert_eq!((r.year, r.month), (2025, 2));
    }

    #[test]
    fn input_validation_rejects_bad_fields() {
        assert!(input("Alice", 2025, 2, 1.0).validate().is_ok());
        assert!(input("", 2025, 2, 1.0).validate().is_err());
        assert!(input("Alice", 2025, 13, 1.0).validate().is_err());
        assert!(input("Alice", 2025, 2, -1.0).validate().is_err());

        let mut i = input("Alice", 2025, 2, 1.0);
        i.working_days = Some(-3.0);
        assert!(i.validate().is_err());
    }

    #[test]
    fn huge_or_infinite_days_are_rejected() {
        assert!(input("Alice", 2025, 2, 31.0).validate().is_ok());
        assert!(input("Alice", 2025, 2, 32.0).validate().is_err());
        assert!(input("Alice", 2025, 2, 1e308).validate().is_err());
        assert!(input("Alice", 2025, 2, f64::INFINITY).validate().is_err());

        let mut i = input("Alice", 2025, 2, 1.0);
        i.present_hours = Some(1e308);
        assert!(i.validate().is_err());
    }

    #[test]
    fn filter_matches_period_and_name() {
        let r = Resource::new(Uuid::new_v4(), input("Alice Smith", 2025, 2, 1.0), today(), Utc::now());
        assert!(ResourceFilter::default().matches(&r));
        assert!(ResourceFilter { search: Some("smith".into()), ..Default::default() }.matches(&r));
        assert!(!ResourceFilter { month: Some(3), ..Default::default() }.matches(&r));
        assert!(!ResourceFilter { year: Some(2024), ..Default::default() }.matches(&r));
    }
}
