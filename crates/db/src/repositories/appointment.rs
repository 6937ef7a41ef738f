use crate::models::DbAppointment;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use hospital_core::models::appointment::{AppointmentStatus, NewAppointment};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const APPOINTMENT_COLUMNS: &str = "id, patient_id, doctor_id, appointment_date, appointment_time, \
     duration_minutes, status, reason, notes, created_at, updated_at";

/// Status strings that still occupy a doctor's time, for `= ANY($n)` filters.
pub(crate) fn active_statuses() -> Vec<String> {
    AppointmentStatus::ACTIVE
        .iter()
        .map(|status| status.as_str().to_string())
        .collect()
}

/// Optional filters for listing appointments; `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
}

pub async fn create_appointment(
    pool: &Pool<Postgres>,
    booking: &NewAppointment,
) -> Result<DbAppointment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: id={}, doctor={}, date={}, time={}",
        id, booking.doctor_id, booking.date, booking.start
    );

    let query = format!(
        r#"
        INSERT INTO appointments
            (id, patient_id, doctor_id, appointment_date, appointment_time,
             duration_minutes, status, reason, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING {}
        "#,
        APPOINTMENT_COLUMNS
    );

    let appointment = sqlx::query_as::<_, DbAppointment>(&query)
        .bind(id)
        .bind(booking.patient_id)
        .bind(booking.doctor_id)
        .bind(booking.date)
        .bind(booking.start.to_string())
        .bind(booking.duration_minutes as i32)
        .bind(AppointmentStatus::Scheduled.as_str())
        .bind(booking.reason.as_deref())
        .bind(now)
        .fetch_one(pool)
        .await?;

    Ok(appointment)
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let query = format!("SELECT {} FROM appointments WHERE id = $1", APPOINTMENT_COLUMNS);

    let appointment = sqlx::query_as::<_, DbAppointment>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(appointment)
}

/// Bookings that occupy the doctor's time on `date`.
///
/// Served by the `(doctor_id, appointment_date)` index.
pub async fn get_active_appointments_for_doctor(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<DbAppointment>> {
    let query = format!(
        r#"
        SELECT {}
        FROM appointments
        WHERE doctor_id = $1 AND appointment_date = $2 AND status = ANY($3)
        ORDER BY appointment_time ASC NULLS LAST
        "#,
        APPOINTMENT_COLUMNS
    );

    let appointments = sqlx::query_as::<_, DbAppointment>(&query)
        .bind(doctor_id)
        .bind(date)
        .bind(active_statuses())
        .fetch_all(pool)
        .await?;

    Ok(appointments)
}

pub async fn list_appointments(
    pool: &Pool<Postgres>,
    filter: &AppointmentFilter,
) -> Result<Vec<DbAppointment>> {
    let query = format!(
        r#"
        SELECT {}
        FROM appointments
        WHERE ($1::UUID IS NULL OR doctor_id = $1)
          AND ($2::UUID IS NULL OR patient_id = $2)
          AND ($3::DATE IS NULL OR appointment_date = $3)
          AND ($4::TEXT IS NULL OR status = $4)
        ORDER BY appointment_date ASC, appointment_time ASC NULLS LAST
        "#,
        APPOINTMENT_COLUMNS
    );

    let appointments = sqlx::query_as::<_, DbAppointment>(&query)
        .bind(filter.doctor_id)
        .bind(filter.patient_id)
        .bind(filter.date)
        .bind(filter.status.map(AppointmentStatus::as_str))
        .fetch_all(pool)
        .await?;

    Ok(appointments)
}

/// Moves an appointment from `current` to `next`.
///
/// Returns `None` when the stored status is no longer `current`, so a
/// concurrent change is never overwritten.
pub async fn update_appointment_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    current: AppointmentStatus,
    next: AppointmentStatus,
    notes: Option<&str>,
) -> Result<Option<DbAppointment>> {
    let query = format!(
        r#"
        UPDATE appointments
        SET status = $3, notes = COALESCE($4, notes), updated_at = $5
        WHERE id = $1 AND status = $2
        RETURNING {}
        "#,
        APPOINTMENT_COLUMNS
    );

    let appointment = sqlx::query_as::<_, DbAppointment>(&query)
        .bind(id)
        .bind(current.as_str())
        .bind(next.as_str())
        .bind(notes)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

    match &appointment {
        Some(_) => tracing::debug!("Appointment {} moved from {} to {}", id, current, next),
        None => tracing::debug!("Appointment {} was no longer {}", id, current),
    }
    Ok(appointment)
}
