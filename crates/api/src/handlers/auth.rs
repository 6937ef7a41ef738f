use axum::{extract::State, http::StatusCode, Json};
use hospital_core::{
    errors::HospitalError,
    models::user::{CreateUserRequest, LoginRequest, LoginResponse, Role, User},
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    handlers::db_error,
    middleware::{
        auth::{self, AuthUser},
        error_handling::AppError,
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = hospital_db::repositories::user::verify_credentials(
        &state.db_pool,
        payload.email.trim(),
        &payload.password,
    )
    .await
    .map_err(HospitalError::Database)?
    .ok_or_else(|| {
        warn!("Failed login attempt for {}", payload.email.trim());
        HospitalError::Authentication("Invalid email or password".to_string())
    })?;

    let role: Role = user.role.parse()?;
    let session = hospital_db::repositories::user::create_session(
        &state.db_pool,
        user.id,
        state.session_ttl,
    )
    .await
    .map_err(HospitalError::Database)?;

    info!("User {} logged in", user.id);
    Ok(Json(LoginResponse {
        token: session.token,
        user_id: user.id,
        role,
        expires_at: session.expires_at,
    }))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
) -> Result<StatusCode, AppError> {
    hospital_db::repositories::user::delete_session(&state.db_pool, user.token)
        .await
        .map_err(HospitalError::Database)?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
) -> Result<Json<User>, AppError> {
    let row = hospital_db::repositories::user::get_user_by_id(&state.db_pool, user.user_id)
        .await
        .map_err(HospitalError::Database)?
        .ok_or_else(|| HospitalError::NotFound("User no longer exists".to_string()))?;

    let user = User::try_from(row).map_err(HospitalError::Database)?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    user.require(&[Role::Admin])?;
    payload.validate()?;

    let password_hash = auth::hash_password(&payload.password)?;
    let row = hospital_db::repositories::user::create_user(
        &state.db_pool,
        payload.email.trim(),
        &password_hash,
        payload.full_name.trim(),
        payload.role,
    )
    .await
    .map_err(|e| db_error(e, "A user with this email"))?;

    info!("Created {} account {}", payload.role, row.id);
    let created = User::try_from(row).map_err(HospitalError::Database)?;
    Ok((StatusCode::CREATED, Json(created)))
}
