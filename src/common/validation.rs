// src/common/validation.rs

use validator::{ValidationError, ValidationErrors};

use crate::common::error::AppError;

// Upper bounds live on the fields: 31 days and 744 hours for one month,
// 366 days for a project.
pub fn validate_not_negative(val: f64) -> Result<(), ValidationError> {
    if !val.is_finite() {
        let mut err = ValidationError::new("finite");
        err.message = Some("The value must be a finite number.".into());
        return Err(err);
    }
    if val < 0.0 {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("Days cannot be negative.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("The name is required.".into());
        return Err(err);
    }
    Ok(())
}

/// `billable + non_billable <= present`
pub fn check_days_within_present(
    present_day: f64,
    billable_days: f64,
    non_billable_days: f64,
) -> Result<(), ValidationError> {
    if billable_days + non_billable_days > present_day {
        let mut err = ValidationError::new("days_exceed_present");
        err.add_param("present".into(), &present_day);
        err.add_param("booked".into(), &(billable_days + non_billable_days));
        err.message = Some(
            "Billable and non-billable days together cannot be more than present days.".into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Wraps a cross-field rule failure into the same shape `validate()` returns.
pub fn rule_violation(field: &'static str, error: ValidationError) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    AppError::ValidationError(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_values_are_rejected() {
        assert!(validate_not_negative(0.0).is_ok());
        assert!(validate_not_negative(2.5).is_ok());
        assert!(validate_not_negative(-0.5).is_err());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(validate_not_negative(f64::NAN).is_err());
        assert!(validate_not_negative(f64::INFINITY).is_err());
        assert!(validate_not_negative(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(validate_not_blank("Alice").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn booked_days_may_equal_but_not_exceed_present() {
        assert!(check_days_within_present(5.0, 3.0, 2.0).is_ok());
        assert!(check_days_within_present(5.0, 3.0, 3.0).is_err());
        assert!(check_days_within_present(0.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn rule_violation_is_reported_under_its_field() {
        let err = rule_violation("billable_days", check_days_within_present(1.0, 2.0, 0.0).unwrap_err());
        match err {
            AppError::ValidationError(errors) => {
                assert!(errors.field_errors().contains_key("billable_days"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
