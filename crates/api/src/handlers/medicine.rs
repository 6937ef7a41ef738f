use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use hospital_core::{
    errors::{HospitalError, HospitalResult},
    models::{
        medicine::{AdjustStockRequest, CreateMedicineRequest, Medicine},
        user::Role,
    },
};
use hospital_db::repositories::medicine::StockAdjustment;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    handlers::db_error,
    middleware::{auth::AuthUser, error_handling::AppError},
    ApiState,
};

const INVENTORY_READERS: [Role; 3] = [Role::Admin, Role::Staff, Role::Doctor];
const INVENTORY_WRITERS: [Role; 2] = [Role::Admin, Role::Staff];

/// Turns the outcome of a stock change into the updated medicine or an error.
pub fn stock_adjustment_result(
    id: Uuid,
    delta: i32,
    outcome: StockAdjustment,
) -> HospitalResult<Medicine> {
    match outcome {
        StockAdjustment::Updated(row) => Ok(row.into()),
        StockAdjustment::Insufficient { available } => Err(HospitalError::Validation(format!(
            "Cannot remove {} units, only {} in stock",
            delta.unsigned_abs(),
            available
        ))),
        StockAdjustment::LimitExceeded { available } => Err(HospitalError::Validation(format!(
            "Cannot add {} units to {} in stock, the stock limit is {}",
            delta,
            available,
            i32::MAX
        ))),
        StockAdjustment::NotFound => Err(HospitalError::NotFound(format!(
            "Medicine with ID {} not found",
            id
        ))),
    }
}

#[axum::debug_handler]
pub async fn create_medicine(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Json(payload): Json<CreateMedicineRequest>,
) -> Result<(StatusCode, Json<Medicine>), AppError> {
    user.require(&INVENTORY_WRITERS)?;
    payload.validate()?;

    let row = hospital_db::repositories::medicine::create_medicine(&state.db_pool, &payload)
        .await
        .map_err(|e| db_error(e, "A medicine with this name"))?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

#[derive(Debug, Deserialize)]
pub struct MedicineQuery {
    #[serde(default)]
    pub low_stock: bool,
}

#[axum::debug_handler]
pub async fn list_medicines(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Query(query): Query<MedicineQuery>,
) -> Result<Json<Vec<Medicine>>, AppError> {
    user.require(&INVENTORY_READERS)?;

    let rows = hospital_db::repositories::medicine::list_medicines(&state.db_pool, query.low_stock)
        .await
        .map_err(HospitalError::Database)?;

    Ok(Json(rows.into_iter().map(Medicine::from).collect()))
}

#[axum::debug_handler]
pub async fn get_medicine(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Medicine>, AppError> {
    user.require(&INVENTORY_READERS)?;

    let row = hospital_db::repositories::medicine::get_medicine_by_id(&state.db_pool, id)
        .await
        .map_err(HospitalError::Database)?
        .ok_or_else(|| HospitalError::NotFound(format!("Medicine with ID {} not found", id)))?;

    Ok(Json(row.into()))
}

#[axum::debug_handler]
pub async fn adjust_stock(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustStockRequest>,
) -> Result<Json<Medicine>, AppError> {
    user.require(&INVENTORY_WRITERS)?;

    let outcome = hospital_db::repositories::medicine::adjust_stock(&state.db_pool, id, payload.delta)
        .await
        .map_err(HospitalError::Database)?;

    let medicine = stock_adjustment_result(id, payload.delta, outcome)?;
    if medicine.is_low_stock() {
        warn!(
            "Medicine {} is low on stock ({} left, reorder at {})",
            medicine.name, medicine.stock_quantity, medicine.reorder_level
        );
    } else {
        info!("Adjusted stock of {} by {}", medicine.name, payload.delta);
    }

    Ok(Json(medicine))
}
