//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! handler reports failures the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hospital_core::errors::HospitalError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps a [`HospitalError`] and implements `IntoResponse`, so
/// handlers can return `Result<Json<T>, AppError>` and use `?` on domain
/// results.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use hospital_api::middleware::error_handling::AppError;
/// use hospital_core::errors::HospitalError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(HospitalError::NotFound("Doctor not found".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub HospitalError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            HospitalError::NotFound(_) => StatusCode::NOT_FOUND,
            HospitalError::Validation(_) => StatusCode::BAD_REQUEST,
            HospitalError::Authentication(_) => StatusCode::UNAUTHORIZED,
            HospitalError::Authorization(_) => StatusCode::FORBIDDEN,
            HospitalError::Conflict(_) => StatusCode::CONFLICT,
            HospitalError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HospitalError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures are logged in full and hidden from the client
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

/// Allows `?` on `HospitalResult` inside handlers.
impl From<HospitalError> for AppError {
    fn from(err: HospitalError) -> Self {
        AppError(err)
    }
}

/// Allows `?` on eyre results such as password hashing; wraps the report as a database error.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(HospitalError::Database(err))
    }
}
