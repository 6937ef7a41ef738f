use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    availability::{AvailabilityWindow, TimeOfDay},
    errors::{HospitalError, HospitalResult},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub specialization: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialization: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub user_id: Option<Uuid>,
}

impl CreateDoctorRequest {
    pub fn validate(&self) -> HospitalResult<()> {
        if self.name.trim().is_empty() {
            return Err(HospitalError::Validation("Doctor name is required".to_string()));
        }
        if !super::is_plausible_email(&self.email) {
            return Err(HospitalError::Validation("A valid email is required".to_string()));
        }
        Ok(())
    }
}

/// One weekday's hours as exchanged over the API.
///
/// `day_of_week` counts from Sunday = 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursEntry {
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
}

/// Validated working hours for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingDay {
    pub day_of_week: i16,
    pub window: AvailabilityWindow,
}

impl WorkingHoursEntry {
    pub fn validate(&self) -> HospitalResult<WorkingDay> {
        if !(0..=6).contains(&self.day_of_week) {
            return Err(HospitalError::Validation(format!(
                "day_of_week must be between 0 (Sunday) and 6 (Saturday), got {}",
                self.day_of_week
            )));
        }
        let open: TimeOfDay = self.start_time.parse()?;
        let close: TimeOfDay = self.end_time.parse()?;
        let window = AvailabilityWindow::new(open, close);
        if window.is_empty() {
            return Err(HospitalError::Validation(format!(
                "start_time {} must be before end_time {}",
                open, close
            )));
        }
        Ok(WorkingDay {
            day_of_week: self.day_of_week,
            window,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetWorkingHoursRequest {
    pub hours: Vec<WorkingHoursEntry>,
}

impl SetWorkingHoursRequest {
    /// Validates every entry and rejects duplicate weekdays.
    pub fn validate(&self) -> HospitalResult<Vec<WorkingDay>> {
        let mut seen = HashSet::new();
        self.hours
            .iter()
            .map(|entry| {
                let day = entry.validate()?;
                if !seen.insert(day.day_of_week) {
                    return Err(HospitalError::Validation(format!(
                        "Duplicate working hours for day {}",
                        day.day_of_week
                    )));
                }
                Ok(day)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorResponse {
    #[serde(flatten)]
    pub doctor: Doctor,
    pub working_hours: Vec<WorkingHoursEntry>,
}
