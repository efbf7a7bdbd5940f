pub mod allocation;
pub mod dashboard;
pub mod project;
pub mod resource;

/// Hours booked per tracked day.
pub const HOURS_PER_DAY: f64 = 8.0;

/// Working days in the standard month used as the utilization baseline.
pub const STANDARD_MONTHLY_DAYS: f64 = 22.0;

/// 8 × 22 = 176 hours. Fixed policy, not configurable.
pub const STANDARD_MONTHLY_HOURS: f64 = HOURS_PER_DAY * STANDARD_MONTHLY_DAYS;

pub fn days_to_hours(days: f64) -> f64 {
    days * HOURS_PER_DAY
}
