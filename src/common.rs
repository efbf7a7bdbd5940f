pub mod calendar;
pub mod clock;
pub mod error;
pub mod validation;
