use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use hospital_core::{
    availability::TimeOfDay,
    errors::{HospitalError, HospitalResult},
    models::{
        appointment::{
            Appointment, AppointmentStatus, CreateAppointmentRequest,
            UpdateAppointmentStatusRequest,
        },
        user::Role,
    },
};
use hospital_db::{
    models::{DbAppointment, DbPatient, DbWorkingHours},
    repositories::appointment::AppointmentFilter,
    DbPool,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    handlers::availability::day_of_week,
    middleware::{auth::AuthUser, error_handling::AppError},
    ApiState,
};

/// Which appointments a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentScope {
    All,
    Doctor(Uuid),
    Patient(Uuid),
}

impl AppointmentScope {
    /// Narrows a listing filter to the caller's own records.
    pub fn restrict(self, mut filter: AppointmentFilter) -> AppointmentFilter {
        match self {
            AppointmentScope::All => {}
            AppointmentScope::Doctor(id) => filter.doctor_id = Some(id),
            AppointmentScope::Patient(id) => filter.patient_id = Some(id),
        }
        filter
    }

    pub fn permits(self, appointment: &DbAppointment) -> bool {
        match self {
            AppointmentScope::All => true,
            AppointmentScope::Doctor(id) => appointment.doctor_id == id,
            AppointmentScope::Patient(id) => appointment.patient_id == id,
        }
    }
}

/// Resolves the caller's scope, linking DOCTOR and PATIENT users to their records.
pub async fn resolve_scope(pool: &DbPool, user: &AuthUser) -> HospitalResult<AppointmentScope> {
    match user.role {
        Role::Admin | Role::Staff => Ok(AppointmentScope::All),
        Role::Doctor => hospital_db::repositories::doctor::get_doctor_by_user_id(pool, user.user_id)
            .await
            .map_err(HospitalError::Database)?
            .map(|doctor| AppointmentScope::Doctor(doctor.id))
            .ok_or_else(|| {
                HospitalError::Authorization("No doctor profile is linked to this account".to_string())
            }),
        Role::Patient => hospital_db::repositories::patient::get_patient_by_user_id(pool, user.user_id)
            .await
            .map_err(HospitalError::Database)?
            .map(|patient| AppointmentScope::Patient(patient.id))
            .ok_or_else(|| {
                HospitalError::Authorization("No patient record is linked to this account".to_string())
            }),
    }
}

/// Staff may book for anyone; a patient only for their own record.
pub fn ensure_can_book(user: &AuthUser, patient: &DbPatient) -> HospitalResult<()> {
    match user.role {
        Role::Admin | Role::Staff => Ok(()),
        Role::Patient if patient.user_id == Some(user.user_id) => Ok(()),
        Role::Patient => Err(HospitalError::Authorization(
            "Patients may only book appointments for themselves".to_string(),
        )),
        Role::Doctor => Err(HospitalError::Authorization(
            "Doctors cannot book appointments".to_string(),
        )),
    }
}

/// Checks a requested start time against the doctor's hours and existing bookings.
///
/// Only the start instant is tested, the same way free slots are listed.
pub fn check_booking(
    hours: Option<&DbWorkingHours>,
    bookings: &[DbAppointment],
    start: TimeOfDay,
) -> HospitalResult<()> {
    let window = hours
        .and_then(DbWorkingHours::window)
        .filter(|window| !window.is_empty())
        .ok_or_else(|| {
            HospitalError::Validation("The doctor does not work on this day".to_string())
        })?;

    if !window.contains(start) {
        return Err(HospitalError::Validation(format!(
            "{} is outside working hours {}-{}",
            start, window.open, window.close
        )));
    }

    if bookings
        .iter()
        .filter_map(DbAppointment::interval)
        .any(|interval| interval.contains(start))
    {
        return Err(HospitalError::Conflict(format!(
            "The doctor already has an appointment at {}",
            start
        )));
    }

    Ok(())
}

/// Fails with a conflict when the conditional status update matched no row.
pub fn ensure_transition_applied(
    id: Uuid,
    expected: AppointmentStatus,
    updated: Option<DbAppointment>,
) -> HospitalResult<DbAppointment> {
    updated.ok_or_else(|| {
        HospitalError::Conflict(format!(
            "Appointment {} is no longer {}; reload and try again",
            id, expected
        ))
    })
}

fn to_response(row: DbAppointment) -> HospitalResult<Appointment> {
    Appointment::try_from(row).map_err(HospitalError::Database)
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    user.require(&[Role::Admin, Role::Staff, Role::Patient])?;
    let booking = payload.validate()?;

    let patient = hospital_db::repositories::patient::get_patient_by_id(&state.db_pool, booking.patient_id)
        .await
        .map_err(HospitalError::Database)?
        .ok_or_else(|| {
            HospitalError::NotFound(format!("Patient with ID {} not found", booking.patient_id))
        })?;
    ensure_can_book(&user, &patient)?;

    hospital_db::repositories::doctor::get_doctor_by_id(&state.db_pool, booking.doctor_id)
        .await
        .map_err(HospitalError::Database)?
        .ok_or_else(|| {
            HospitalError::NotFound(format!("Doctor with ID {} not found", booking.doctor_id))
        })?;

    let hours = hospital_db::repositories::doctor::get_working_hours_for_day(
        &state.db_pool,
        booking.doctor_id,
        day_of_week(booking.date),
    )
    .await
    .map_err(HospitalError::Database)?;

    let existing = hospital_db::repositories::appointment::get_active_appointments_for_doctor(
        &state.db_pool,
        booking.doctor_id,
        booking.date,
    )
    .await
    .map_err(HospitalError::Database)?;

    check_booking(hours.as_ref(), &existing, booking.start)?;

    let row = hospital_db::repositories::appointment::create_appointment(&state.db_pool, &booking)
        .await
        .map_err(HospitalError::Database)?;

    info!(
        "Booked appointment {} with doctor {} on {} at {}",
        row.id, row.doctor_id, row.appointment_date, booking.start
    );

    Ok((StatusCode::CREATED, Json(to_response(row)?)))
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentQuery {
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
}

impl From<AppointmentQuery> for AppointmentFilter {
    fn from(query: AppointmentQuery) -> Self {
        AppointmentFilter {
            doctor_id: query.doctor_id,
            patient_id: query.patient_id,
            date: query.date,
            status: query.status,
        }
    }
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let scope = resolve_scope(&state.db_pool, &user).await?;
    let filter = scope.restrict(query.into());

    let rows = hospital_db::repositories::appointment::list_appointments(&state.db_pool, &filter)
        .await
        .map_err(HospitalError::Database)?;

    let appointments = rows
        .into_iter()
        .map(to_response)
        .collect::<HospitalResult<Vec<_>>>()?;

    Ok(Json(appointments))
}

async fn load_visible(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
) -> HospitalResult<DbAppointment> {
    let scope = resolve_scope(pool, user).await?;

    let row = hospital_db::repositories::appointment::get_appointment_by_id(pool, id)
        .await
        .map_err(HospitalError::Database)?
        .ok_or_else(|| HospitalError::NotFound(format!("Appointment with ID {} not found", id)))?;

    if !scope.permits(&row) {
        return Err(HospitalError::Authorization(
            "You do not have access to this appointment".to_string(),
        ));
    }

    Ok(row)
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let row = load_visible(&state.db_pool, &user, id).await?;
    Ok(Json(to_response(row)?))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    user.require(&[Role::Admin, Role::Staff, Role::Doctor])?;

    let row = load_visible(&state.db_pool, &user, id).await?;
    let current = row.status().map_err(HospitalError::Database)?;
    let next = current.transition_to(payload.status)?;

    let notes = payload
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|notes| !notes.is_empty());

    let updated = hospital_db::repositories::appointment::update_appointment_status(
        &state.db_pool,
        id,
        current,
        next,
        notes,
    )
    .await
    .map_err(HospitalError::Database)?;
    let updated = ensure_transition_applied(id, current, updated)?;

    info!("Appointment {} changed from {} to {}", id, current, next);
    Ok(Json(to_response(updated)?))
}
