use crate::models::{DbDoctor, DbWorkingHours};
use chrono::Utc;
use eyre::Result;
use hospital_core::models::doctor::WorkingDay;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// Doctor Repository

pub async fn create_doctor(
    pool: &Pool<Postgres>,
    name: &str,
    specialization: Option<&str>,
    email: &str,
    phone: Option<&str>,
    user_id: Option<Uuid>,
) -> Result<DbDoctor> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating doctor: id={}, name={}", id, name);

    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        INSERT INTO doctors (id, user_id, name, specialization, email, phone, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, name, specialization, email, phone, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(name.trim())
    .bind(specialization)
    .bind(email.trim())
    .bind(phone)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(doctor)
}

pub async fn get_doctor_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbDoctor>> {
    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, user_id, name, specialization, email, phone, created_at
        FROM doctors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(doctor)
}

pub async fn get_doctor_by_user_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Option<DbDoctor>> {
    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, user_id, name, specialization, email, phone, created_at
        FROM doctors
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(doctor)
}

pub async fn list_doctors(
    pool: &Pool<Postgres>,
    specialization: Option<&str>,
) -> Result<Vec<DbDoctor>> {
    let doctors = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, user_id, name, specialization, email, phone, created_at
        FROM doctors
        WHERE $1::TEXT IS NULL OR LOWER(specialization) = LOWER($1)
        ORDER BY name ASC
        "#,
    )
    .bind(specialization)
    .fetch_all(pool)
    .await?;

    Ok(doctors)
}

/// Deletes a doctor who has never had an appointment.
///
/// Returns `false`, and deletes nothing, when any appointment references the
/// doctor; past visits stay part of the patient's history.
pub async fn delete_doctor(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let referenced = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM appointments
            WHERE doctor_id = $1
        )
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if referenced {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query("DELETE FROM doctors WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

// Working Hours Repository

pub async fn get_working_hours(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
) -> Result<Vec<DbWorkingHours>> {
    let hours = sqlx::query_as::<_, DbWorkingHours>(
        r#"
        SELECT doctor_id, day_of_week, start_time, end_time
        FROM working_hours
        WHERE doctor_id = $1
        ORDER BY day_of_week ASC
        "#,
    )
    .bind(doctor_id)
    .fetch_all(pool)
    .await?;

    Ok(hours)
}

pub async fn get_working_hours_for_day(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    day_of_week: i16,
) -> Result<Option<DbWorkingHours>> {
    let hours = sqlx::query_as::<_, DbWorkingHours>(
        r#"
        SELECT doctor_id, day_of_week, start_time, end_time
        FROM working_hours
        WHERE doctor_id = $1 AND day_of_week = $2
        "#,
    )
    .bind(doctor_id)
    .bind(day_of_week)
    .fetch_optional(pool)
    .await?;

    Ok(hours)
}

/// Replaces a doctor's whole weekly schedule in one transaction.
pub async fn replace_working_hours(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    days: &[WorkingDay],
) -> Result<Vec<DbWorkingHours>> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM working_hours WHERE doctor_id = $1")
        .bind(doctor_id)
        .execute(&mut *tx)
        .await?;

    let mut saved = Vec::with_capacity(days.len());
    for day in days {
        let row = sqlx::query_as::<_, DbWorkingHours>(
            r#"
            INSERT INTO working_hours (doctor_id, day_of_week, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            RETURNING doctor_id, day_of_week, start_time, end_time
            "#,
        )
        .bind(doctor_id)
        .bind(day.day_of_week)
        .bind(day.window.open.to_string())
        .bind(day.window.close.to_string())
        .fetch_one(&mut *tx)
        .await?;
        saved.push(row);
    }

    tx.commit().await?;

    tracing::debug!("Replaced working hours for doctor {}: {} days", doctor_id, saved.len());
    saved.sort_by_key(|h| h.day_of_week);
    Ok(saved)
}
