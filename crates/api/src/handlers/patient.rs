use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use hospital_core::{
    errors::{HospitalError, HospitalResult},
    models::{
        patient::{CreatePatientRequest, Patient, UpdatePatientRequest},
        user::Role,
    },
};
use hospital_db::models::DbPatient;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    handlers::db_error,
    middleware::{auth::AuthUser, error_handling::AppError},
    ApiState,
};

const CLINICAL_ROLES: [Role; 3] = [Role::Admin, Role::Staff, Role::Doctor];

/// Clinical roles see every record; a patient sees only their own.
pub fn ensure_can_view(user: &AuthUser, patient: &DbPatient) -> HospitalResult<()> {
    if CLINICAL_ROLES.contains(&user.role) {
        return Ok(());
    }
    if user.is(Role::Patient) && patient.user_id == Some(user.user_id) {
        return Ok(());
    }
    Err(HospitalError::Authorization(
        "You do not have access to this patient record".to_string(),
    ))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Json(payload): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>), AppError> {
    user.require(&[Role::Admin, Role::Staff])?;
    payload.validate(Utc::now().date_naive())?;

    let row = hospital_db::repositories::patient::create_patient(&state.db_pool, &payload)
        .await
        .map_err(|e| db_error(e, "A patient linked to this user"))?;

    info!("Registered patient {}", row.id);
    Ok((StatusCode::CREATED, Json(row.into())))
}

#[derive(Debug, Deserialize)]
pub struct PatientQuery {
    pub search: Option<String>,
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Query(query): Query<PatientQuery>,
) -> Result<Json<Vec<Patient>>, AppError> {
    user.require(&CLINICAL_ROLES)?;

    let search = query.search.as_deref().filter(|s| !s.trim().is_empty());
    let rows = hospital_db::repositories::patient::list_patients(&state.db_pool, search)
        .await
        .map_err(HospitalError::Database)?;

    Ok(Json(rows.into_iter().map(Patient::from).collect()))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Patient>, AppError> {
    let row = hospital_db::repositories::patient::get_patient_by_id(&state.db_pool, id)
        .await
        .map_err(HospitalError::Database)?
        .ok_or_else(|| HospitalError::NotFound(format!("Patient with ID {} not found", id)))?;

    ensure_can_view(&user, &row)?;
    Ok(Json(row.into()))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePatientRequest>,
) -> Result<Json<Patient>, AppError> {
    user.require(&[Role::Admin, Role::Staff])?;
    payload.validate(Utc::now().date_naive())?;

    let row = hospital_db::repositories::patient::update_patient(&state.db_pool, id, &payload)
        .await
        .map_err(HospitalError::Database)?
        .ok_or_else(|| HospitalError::NotFound(format!("Patient with ID {} not found", id)))?;

    Ok(Json(row.into()))
}
