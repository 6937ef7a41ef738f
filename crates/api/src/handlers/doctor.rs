use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use hospital_core::{
    errors::{HospitalError, HospitalResult},
    models::{
        doctor::{CreateDoctorRequest, Doctor, DoctorResponse, SetWorkingHoursRequest, WorkingHoursEntry},
        user::Role,
    },
};
use hospital_db::models::DbDoctor;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    handlers::db_error,
    middleware::{auth::AuthUser, error_handling::AppError},
    ApiState,
};

/// Admin and staff manage every schedule; a doctor only their own.
pub fn ensure_can_edit_hours(user: &AuthUser, doctor: &DbDoctor) -> HospitalResult<()> {
    match user.role {
        Role::Admin | Role::Staff => Ok(()),
        Role::Doctor if doctor.user_id == Some(user.user_id) => Ok(()),
        _ => Err(HospitalError::Authorization(
            "You may not change this doctor's working hours".to_string(),
        )),
    }
}

/// Maps a refused deletion onto a conflict.
pub fn ensure_deleted(id: Uuid, deleted: bool) -> HospitalResult<()> {
    if deleted {
        Ok(())
    } else {
        Err(HospitalError::Conflict(format!(
            "Doctor {} has appointments on record and cannot be deleted",
            id
        )))
    }
}

async fn find_doctor(state: &ApiState, id: Uuid) -> HospitalResult<DbDoctor> {
    hospital_db::repositories::doctor::get_doctor_by_id(&state.db_pool, id)
        .await
        .map_err(HospitalError::Database)?
        .ok_or_else(|| HospitalError::NotFound(format!("Doctor with ID {} not found", id)))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Json(payload): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Doctor>), AppError> {
    user.require(&[Role::Admin])?;
    payload.validate()?;

    // A linked login must exist and carry the DOCTOR role
    if let Some(user_id) = payload.user_id {
        let linked = hospital_db::repositories::user::get_user_by_id(&state.db_pool, user_id)
            .await
            .map_err(HospitalError::Database)?
            .ok_or_else(|| HospitalError::NotFound(format!("User with ID {} not found", user_id)))?;
        if linked.role != Role::Doctor.as_str() {
            return Err(HospitalError::Validation(
                "Linked user must have the DOCTOR role".to_string(),
            )
            .into());
        }
    }

    let row = hospital_db::repositories::doctor::create_doctor(
        &state.db_pool,
        &payload.name,
        payload.specialization.as_deref(),
        &payload.email,
        payload.phone.as_deref(),
        payload.user_id,
    )
    .await
    .map_err(|e| db_error(e, "A doctor with this email or user"))?;

    info!("Created doctor {} ({})", row.id, row.name);
    Ok((StatusCode::CREATED, Json(row.into())))
}

#[derive(Debug, Deserialize)]
pub struct DoctorQuery {
    pub specialization: Option<String>,
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<ApiState>>,
    _user: AuthUser,
    Query(query): Query<DoctorQuery>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    let specialization = query
        .specialization
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let rows = hospital_db::repositories::doctor::list_doctors(&state.db_pool, specialization)
        .await
        .map_err(HospitalError::Database)?;

    Ok(Json(rows.into_iter().map(Doctor::from).collect()))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<ApiState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DoctorResponse>, AppError> {
    let doctor = find_doctor(&state, id).await?;

    let hours = hospital_db::repositories::doctor::get_working_hours(&state.db_pool, id)
        .await
        .map_err(HospitalError::Database)?;

    Ok(Json(DoctorResponse {
        doctor: doctor.into(),
        working_hours: hours.into_iter().map(WorkingHoursEntry::from).collect(),
    }))
}

#[axum::debug_handler]
pub async fn set_working_hours(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetWorkingHoursRequest>,
) -> Result<Json<Vec<WorkingHoursEntry>>, AppError> {
    let doctor = find_doctor(&state, id).await?;
    ensure_can_edit_hours(&user, &doctor)?;

    let days = payload.validate()?;

    let saved = hospital_db::repositories::doctor::replace_working_hours(&state.db_pool, id, &days)
        .await
        .map_err(HospitalError::Database)?;

    info!("Replaced working hours for doctor {} ({} days)", id, saved.len());
    Ok(Json(saved.into_iter().map(WorkingHoursEntry::from).collect()))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require(&[Role::Admin])?;
    find_doctor(&state, id).await?;

    let deleted = hospital_db::repositories::doctor::delete_doctor(&state.db_pool, id)
        .await
        .map_err(HospitalError::Database)?;

    ensure_deleted(id, deleted)?;

    info!("Deleted doctor {}", id);
    Ok(StatusCode::NO_CONTENT)
}
