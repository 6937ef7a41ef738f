pub mod appointment;
pub mod auth;
pub mod availability;
pub mod doctor;
pub mod medicine;
pub mod patient;

use chrono::NaiveDate;
use hospital_core::errors::HospitalError;

/// Maps a repository failure, turning unique-constraint violations into conflicts.
pub(crate) fn db_error(err: eyre::Report, what: &str) -> HospitalError {
    let duplicate = err
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation());

    if duplicate {
        HospitalError::Conflict(format!("{} already exists", what))
    } else {
        HospitalError::Database(err)
    }
}

/// Parses a `YYYY-MM-DD` calendar date from a query parameter.
pub fn parse_date(value: &str) -> Result<NaiveDate, HospitalError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| HospitalError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value)))
}
