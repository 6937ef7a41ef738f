//! # Authentication Module
//!
//! Password hashing, bearer-session extraction, and role checks.
//!
//! Passwords are hashed with Argon2 and stored as PHC strings. A successful
//! login issues an opaque session token; protected handlers take an
//! [`AuthUser`] argument, which resolves the `Authorization: Bearer <token>`
//! header to a live session with a single joined lookup.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use eyre::Result;
use hospital_core::{
    errors::{HospitalError, HospitalResult},
    models::user::Role,
};
use hospital_db::models::DbSessionUser;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{config::BootstrapAdmin, middleware::error_handling::AppError, ApiState};

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated for every call, and the result is a PHC
/// string carrying the algorithm, parameters, salt and hash.
///
/// # Example
///
/// ```
/// let hashed = hospital_api::middleware::auth::hash_password("correct horse").unwrap();
/// assert!(hashed.starts_with("$argon2"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
    pub token: Uuid,
}

impl AuthUser {
    pub fn from_session(session: &DbSessionUser) -> HospitalResult<Self> {
        let role = session.role().map_err(HospitalError::Database)?;
        Ok(Self {
            user_id: session.user_id,
            role,
            token: session.token,
        })
    }

    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }

    /// Fails with an authorization error unless the caller holds one of `allowed`.
    pub fn require(&self, allowed: &[Role]) -> HospitalResult<()> {
        ensure_role(self.role, allowed)
    }
}

/// Linear membership check of `role` in `allowed`.
pub fn ensure_role(role: Role, allowed: &[Role]) -> HospitalResult<()> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(HospitalError::Authorization(format!(
            "Role {} is not permitted to perform this action",
            role
        )))
    }
}

/// Pulls the session token out of an `Authorization: Bearer <uuid>` header.
pub fn bearer_token(headers: &HeaderMap) -> HospitalResult<Uuid> {
    let missing = || HospitalError::Authentication("Missing bearer token".to_string());

    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(missing)?
        .to_str()
        .map_err(|_| HospitalError::Authentication("Malformed authorization header".to_string()))?;

    let (scheme, token) = value.trim().split_once(' ').ok_or_else(missing)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(HospitalError::Authentication(
            "Authorization scheme must be Bearer".to_string(),
        ));
    }

    Uuid::parse_str(token.trim())
        .map_err(|_| HospitalError::Authentication("Malformed bearer token".to_string()))
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let session = hospital_db::repositories::user::get_active_session(&state.db_pool, token)
            .await
            .map_err(HospitalError::Database)?
            .ok_or_else(|| {
                warn!("Rejected unknown or expired session token");
                HospitalError::Authentication("Invalid or expired session".to_string())
            })?;

        Ok(AuthUser::from_session(&session)?)
    }
}

/// Creates the configured administrator account if it does not exist yet.
pub async fn ensure_bootstrap_admin(pool: &sqlx::PgPool, admin: &BootstrapAdmin) -> Result<()> {
    if hospital_db::repositories::user::get_user_by_email(pool, &admin.email)
        .await?
        .is_some()
    {
        return Ok(());
    }

    let password_hash = hash_password(&admin.password)?;
    let user = hospital_db::repositories::user::create_user(
        pool,
        &admin.email,
        &password_hash,
        "Administrator",
        Role::Admin,
    )
    .await?;

    info!("Created bootstrap administrator {}", user.email);
    Ok(())
}
