use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Datelike, NaiveDate};
use hospital_core::{
    availability::{compute_available_slots, Interval},
    errors::HospitalError,
    models::appointment::AvailableSlotsResponse,
};
use hospital_db::models::{DbAppointment, DbWorkingHours};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{
    handlers::parse_date,
    middleware::{auth::AuthUser, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    pub date: String,
}

/// Weekday index as stored in `working_hours`, counting from Sunday = 0.
pub fn day_of_week(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

/// Assembles the free-slot listing from a doctor's hours and active bookings.
///
/// Bookings without a parseable start time are ignored rather than
/// failing the whole listing.
pub fn build_available_slots(
    doctor_id: Uuid,
    date: NaiveDate,
    hours: Option<DbWorkingHours>,
    bookings: &[DbAppointment],
    slot_length_minutes: u32,
) -> AvailableSlotsResponse {
    let occupied: Vec<Interval> = bookings
        .iter()
        .filter_map(|booking| {
            let interval = booking.interval();
            if interval.is_none() {
                debug!("Skipping appointment {} with unusable time", booking.id);
            }
            interval
        })
        .collect();

    let slots = match hours.as_ref().map(|h| (h, h.window())) {
        Some((_, Some(window))) => compute_available_slots(&window, &occupied, slot_length_minutes),
        Some((h, None)) => {
            debug!(
                "Ignoring malformed working hours {}-{} for doctor {}",
                h.start_time, h.end_time, doctor_id
            );
            Vec::new()
        }
        None => Vec::new(),
    };

    AvailableSlotsResponse {
        doctor_id,
        date,
        working_hours: hours.map(Into::into),
        slot_length_minutes,
        slots,
    }
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<ApiState>>,
    _user: AuthUser,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let date = parse_date(&query.date)?;

    hospital_db::repositories::doctor::get_doctor_by_id(&state.db_pool, doctor_id)
        .await
        .map_err(HospitalError::Database)?
        .ok_or_else(|| HospitalError::NotFound(format!("Doctor with ID {} not found", doctor_id)))?;

    let hours = hospital_db::repositories::doctor::get_working_hours_for_day(
        &state.db_pool,
        doctor_id,
        day_of_week(date),
    )
    .await
    .map_err(HospitalError::Database)?;

    let bookings = hospital_db::repositories::appointment::get_active_appointments_for_doctor(
        &state.db_pool,
        doctor_id,
        date,
    )
    .await
    .map_err(HospitalError::Database)?;

    Ok(Json(build_available_slots(
        doctor_id,
        date,
        hours,
        &bookings,
        state.slot_length_minutes,
    )))
}
