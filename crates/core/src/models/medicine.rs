use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{HospitalError, HospitalResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    pub id: Uuid,
    pub name: String,
    pub generic_name: Option<String>,
    pub category: Option<String>,
    pub unit_price_cents: i64,
    pub stock_quantity: i32,
    pub reorder_level: i32,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Medicine {
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.reorder_level
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMedicineRequest {
    pub name: String,
    pub generic_name: Option<String>,
    pub category: Option<String>,
    pub unit_price_cents: i64,
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default)]
    pub reorder_level: i32,
    pub expiry_date: Option<NaiveDate>,
}

impl CreateMedicineRequest {
    pub fn validate(&self) -> HospitalResult<()> {
        if self.name.trim().is_empty() {
            return Err(HospitalError::Validation("Medicine name is required".to_string()));
        }
        if self.unit_price_cents < 0 || self.stock_quantity < 0 || self.reorder_level < 0 {
            return Err(HospitalError::Validation(
                "Price, stock and reorder level must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i32,
}
