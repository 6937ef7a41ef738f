use crate::models::DbMedicine;
use chrono::Utc;
use eyre::Result;
use hospital_core::models::medicine::CreateMedicineRequest;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_medicine(
    pool: &Pool<Postgres>,
    medicine: &CreateMedicineRequest,
) -> Result<DbMedicine> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let medicine = sqlx::query_as::<_, DbMedicine>(
        r#"
        INSERT INTO medicines
            (id, name, generic_name, category, unit_price_cents,
             stock_quantity, reorder_level, expiry_date, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, name, generic_name, category, unit_price_cents,
                  stock_quantity, reorder_level, expiry_date, created_at
        "#,
    )
    .bind(id)
    .bind(medicine.name.trim())
    .bind(medicine.generic_name.as_deref())
    .bind(medicine.category.as_deref())
    .bind(medicine.unit_price_cents)
    .bind(medicine.stock_quantity)
    .bind(medicine.reorder_level)
    .bind(medicine.expiry_date)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(medicine)
}

pub async fn get_medicine_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbMedicine>> {
    let medicine = sqlx::query_as::<_, DbMedicine>(
        r#"
        SELECT id, name, generic_name, category, unit_price_cents,
               stock_quantity, reorder_level, expiry_date, created_at
        FROM medicines
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(medicine)
}

pub async fn list_medicines(pool: &Pool<Postgres>, low_stock_only: bool) -> Result<Vec<DbMedicine>> {
    let medicines = sqlx::query_as::<_, DbMedicine>(
        r#"
        SELECT id, name, generic_name, category, unit_price_cents,
               stock_quantity, reorder_level, expiry_date, created_at
        FROM medicines
        WHERE NOT $1 OR stock_quantity <= reorder_level
        ORDER BY name ASC
        "#,
    )
    .bind(low_stock_only)
    .fetch_all(pool)
    .await?;

    Ok(medicines)
}

/// Outcome of a stock adjustment.
#[derive(Debug, Clone)]
pub enum StockAdjustment {
    Updated(DbMedicine),
    /// The change would take stock below zero; nothing was written.
    Insufficient { available: i32 },
    /// The change would overflow the stock column; nothing was written.
    LimitExceeded { available: i32 },
    NotFound,
}

/// Why a refused adjustment of `delta` against `available` units failed.
pub fn rejected_adjustment(available: i32, delta: i32) -> StockAdjustment {
    if delta > 0 {
        StockAdjustment::LimitExceeded { available }
    } else {
        StockAdjustment::Insufficient { available }
    }
}

/// Adds `delta` to the stock level in a single statement.
///
/// The sum is computed as BIGINT so neither bound raises a database error.
pub async fn adjust_stock(pool: &Pool<Postgres>, id: Uuid, delta: i32) -> Result<StockAdjustment> {
    let updated = sqlx::query_as::<_, DbMedicine>(
        r#"
        UPDATE medicines
        SET stock_quantity = (stock_quantity::BIGINT + $2)::INTEGER
        WHERE id = $1
          AND stock_quantity::BIGINT + $2 BETWEEN 0 AND 2147483647
        RETURNING id, name, generic_name, category, unit_price_cents,
                  stock_quantity, reorder_level, expiry_date, created_at
        "#,
    )
    .bind(id)
    .bind(i64::from(delta))
    .fetch_optional(pool)
    .await?;

    if let Some(medicine) = updated {
        tracing::debug!("Stock for medicine {} now {}", id, medicine.stock_quantity);
        return Ok(StockAdjustment::Updated(medicine));
    }

    // Distinguish a missing row from a rejected change
    Ok(match get_medicine_by_id(pool, id).await? {
        Some(medicine) => rejected_adjustment(medicine.stock_quantity, delta),
        None => StockAdjustment::NotFound,
    })
}
