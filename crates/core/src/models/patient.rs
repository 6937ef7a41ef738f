use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{HospitalError, HospitalResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub user_id: Option<Uuid>,
}

impl CreatePatientRequest {
    pub fn validate(&self, today: NaiveDate) -> HospitalResult<()> {
        if self.name.trim().is_empty() {
            return Err(HospitalError::Validation("Patient name is required".to_string()));
        }
        validate_contact(self.email.as_deref(), self.date_of_birth, today)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl UpdatePatientRequest {
    pub fn validate(&self, today: NaiveDate) -> HospitalResult<()> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(HospitalError::Validation("Patient name cannot be blank".to_string()));
        }
        validate_contact(self.email.as_deref(), self.date_of_birth, today)
    }
}

fn validate_contact(
    email: Option<&str>,
    date_of_birth: Option<NaiveDate>,
    today: NaiveDate,
) -> HospitalResult<()> {
    if let Some(email) = email {
        if !super::is_plausible_email(email) {
            return Err(HospitalError::Validation(format!("Invalid email: {}", email)));
        }
    }
    if let Some(dob) = date_of_birth {
        if dob > today {
            return Err(HospitalError::Validation(
                "Date of birth cannot be in the future".to_string(),
            ));
        }
    }
    Ok(())
}
