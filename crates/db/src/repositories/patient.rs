use crate::models::DbPatient;
use chrono::Utc;
use eyre::Result;
use hospital_core::models::patient::{CreatePatientRequest, UpdatePatientRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_patient(
    pool: &Pool<Postgres>,
    patient: &CreatePatientRequest,
) -> Result<DbPatient> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating patient: id={}", id);

    let patient = sqlx::query_as::<_, DbPatient>(
        r#"
        INSERT INTO patients
            (id, user_id, name, date_of_birth, gender, phone, email, address, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, user_id, name, date_of_birth, gender, phone, email, address, created_at
        "#,
    )
    .bind(id)
    .bind(patient.user_id)
    .bind(patient.name.trim())
    .bind(patient.date_of_birth)
    .bind(patient.gender.as_deref())
    .bind(patient.phone.as_deref())
    .bind(patient.email.as_deref())
    .bind(patient.address.as_deref())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(patient)
}

pub async fn get_patient_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbPatient>> {
    let patient = sqlx::query_as::<_, DbPatient>(
        r#"
        SELECT id, user_id, name, date_of_birth, gender, phone, email, address, created_at
        FROM patients
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(patient)
}

pub async fn get_patient_by_user_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Option<DbPatient>> {
    let patient = sqlx::query_as::<_, DbPatient>(
        r#"
        SELECT id, user_id, name, date_of_birth, gender, phone, email, address, created_at
        FROM patients
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(patient)
}

/// Lists patients, optionally filtered by a case-insensitive name fragment.
pub async fn list_patients(pool: &Pool<Postgres>, search: Option<&str>) -> Result<Vec<DbPatient>> {
    let pattern = search.map(|s| format!("%{}%", s.trim().to_lowercase()));

    let patients = sqlx::query_as::<_, DbPatient>(
        r#"
        SELECT id, user_id, name, date_of_birth, gender, phone, email, address, created_at
        FROM patients
        WHERE $1::TEXT IS NULL OR LOWER(name) LIKE $1
        ORDER BY name ASC
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(patients)
}

/// Applies a partial update; fields left as `None` keep their stored value.
pub async fn update_patient(
    pool: &Pool<Postgres>,
    id: Uuid,
    changes: &UpdatePatientRequest,
) -> Result<Option<DbPatient>> {
    let patient = sqlx::query_as::<_, DbPatient>(
        r#"
        UPDATE patients
        SET name = COALESCE($2, name),
            date_of_birth = COALESCE($3, date_of_birth),
            gender = COALESCE($4, gender),
            phone = COALESCE($5, phone),
            email = COALESCE($6, email),
            address = COALESCE($7, address)
        WHERE id = $1
        RETURNING id, user_id, name, date_of_birth, gender, phone, email, address, created_at
        "#,
    )
    .bind(id)
    .bind(changes.name.as_deref().map(str::trim))
    .bind(changes.date_of_birth)
    .bind(changes.gender.as_deref())
    .bind(changes.phone.as_deref())
    .bind(changes.email.as_deref())
    .bind(changes.address.as_deref())
    .fetch_optional(pool)
    .await?;

    Ok(patient)
}
