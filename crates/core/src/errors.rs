use thiserror::Error;

use crate::availability::ParseTimeError;

#[derive(Error, Debug)]
pub enum HospitalError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<ParseTimeError> for HospitalError {
    fn from(err: ParseTimeError) -> Self {
        HospitalError::Validation(err.to_string())
    }
}

pub type HospitalResult<T> = Result<T, HospitalError>;
