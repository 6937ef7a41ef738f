use crate::models::{DbSession, DbSessionUser, DbUser};
use argon2::{Argon2, PasswordVerifier};
use chrono::{Duration, Utc};
use eyre::{eyre, Result};
use hospital_core::models::user::Role;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// User Repository

pub async fn create_user(
    pool: &Pool<Postgres>,
    email: &str,
    password_hash: &str,
    full_name: &str,
    role: Role,
) -> Result<DbUser> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating user: id={}, email={}, role={}", id, email, role);

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, email, password_hash, full_name, role, created_at)
        VALUES ($1, LOWER($2), $3, $4, $5, $6)
        RETURNING id, email, password_hash, full_name, role, created_at
        "#,
    )
    .bind(id)
    .bind(email.trim())
    .bind(password_hash)
    .bind(full_name)
    .bind(role.as_str())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, email, password_hash, full_name, role, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, email, password_hash, full_name, role, created_at
        FROM users
        WHERE email = LOWER($1)
        "#,
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Checks an email/password pair, returning the user when both match.
pub async fn verify_credentials(
    pool: &Pool<Postgres>,
    email: &str,
    password: &str,
) -> Result<Option<DbUser>> {
    let Some(user) = get_user_by_email(pool, email).await? else {
        tracing::debug!("Login attempt for unknown email");
        return Ok(None);
    };

    let parsed_hash = argon2::PasswordHash::new(&user.password_hash)
        .map_err(|e| eyre!("Invalid password hash: {}", e))?;
    let is_valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();

    Ok(is_valid.then_some(user))
}

// Session Repository

pub async fn create_session(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    ttl: Duration,
) -> Result<DbSession> {
    let token = Uuid::new_v4();
    let now = Utc::now();

    let session = sqlx::query_as::<_, DbSession>(
        r#"
        INSERT INTO sessions (token, user_id, created_at, expires_at)
        VALUES ($1, $2, $3, $4)
        RETURNING token, user_id, created_at, expires_at
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(now)
    .bind(now + ttl)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Session created for user {}", user_id);
    Ok(session)
}

/// Looks up an unexpired session together with its user's role.
pub async fn get_active_session(
    pool: &Pool<Postgres>,
    token: Uuid,
) -> Result<Option<DbSessionUser>> {
    let session = sqlx::query_as::<_, DbSessionUser>(
        r#"
        SELECT s.token, s.user_id, u.role, s.expires_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = $1 AND s.expires_at > NOW()
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

pub async fn delete_session(pool: &Pool<Postgres>, token: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE token = $1
        "#,
    )
    .bind(token)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_expired_sessions(pool: &Pool<Postgres>) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE expires_at <= NOW()
        "#,
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
