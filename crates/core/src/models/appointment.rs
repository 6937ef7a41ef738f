use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    availability::{DEFAULT_SLOT_LENGTH_MINUTES, TimeOfDay},
    errors::{HospitalError, HospitalResult},
    models::doctor::WorkingHoursEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Statuses that still occupy the doctor's time.
    pub const ACTIVE: [AppointmentStatus; 3] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::InProgress => "IN_PROGRESS",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::NoShow => "NO_SHOW",
        }
    }

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    pub fn valid_transitions(self) -> &'static [AppointmentStatus] {
        use AppointmentStatus::*;
        match self {
            Scheduled => &[Confirmed, InProgress, Cancelled, NoShow],
            Confirmed => &[InProgress, Cancelled, NoShow],
            InProgress => &[Completed, Cancelled],
            // Terminal
            Completed | Cancelled | NoShow => &[],
        }
    }

    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        self.valid_transitions().contains(&next)
    }

    pub fn transition_to(self, next: AppointmentStatus) -> HospitalResult<AppointmentStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(HospitalError::Validation(format!(
                "Cannot change appointment status from {} to {}",
                self, next
            )))
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = HospitalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use AppointmentStatus::*;
        [Scheduled, Confirmed, InProgress, Completed, Cancelled, NoShow]
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| HospitalError::Validation(format!("Unknown appointment status: {}", s)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub duration_minutes: Option<u32>,
    pub reason: Option<String>,
}

/// Longest appointment a single booking may reserve.
pub const MAX_APPOINTMENT_MINUTES: u32 = 8 * 60;

/// A booking request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub duration_minutes: u32,
    pub reason: Option<String>,
}

impl CreateAppointmentRequest {
    pub fn validate(self) -> HospitalResult<NewAppointment> {
        let start: TimeOfDay = self.time.parse()?;
        let duration_minutes = self.duration_minutes.unwrap_or(DEFAULT_SLOT_LENGTH_MINUTES);
        if duration_minutes == 0 || duration_minutes > MAX_APPOINTMENT_MINUTES {
            return Err(HospitalError::Validation(format!(
                "duration_minutes must be between 1 and {}",
                MAX_APPOINTMENT_MINUTES
            )));
        }
        let reason = self
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        Ok(NewAppointment {
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            date: self.date,
            start,
            duration_minutes,
            reason,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlotsResponse {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub working_hours: Option<WorkingHoursEntry>,
    pub slot_length_minutes: u32,
    pub slots: Vec<TimeOfDay>,
}
