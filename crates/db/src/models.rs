use chrono::{DateTime, NaiveDate, Utc};
use eyre::{eyre, Result};
use hospital_core::{
    availability::{AvailabilityWindow, Interval},
    models::{
        appointment::{Appointment, AppointmentStatus},
        doctor::{Doctor, WorkingHoursEntry},
        medicine::Medicine,
        patient::Patient,
        user::{Role, User},
    },
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbUser> for User {
    type Error = eyre::Report;

    fn try_from(row: DbUser) -> Result<Self> {
        Ok(User {
            role: parse_role(&row.role)?,
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            created_at: row.created_at,
        })
    }
}

/// A live session joined with the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSessionUser {
    pub token: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

impl DbSessionUser {
    pub fn role(&self) -> Result<Role> {
        parse_role(&self.role)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub token: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoctor {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub specialization: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbDoctor> for Doctor {
    fn from(row: DbDoctor) -> Self {
        Doctor {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            specialization: row.specialization,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWorkingHours {
    pub doctor_id: Uuid,
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
}

impl DbWorkingHours {
    /// The stored hours as a window, or `None` when either bound is malformed.
    pub fn window(&self) -> Option<AvailabilityWindow> {
        AvailabilityWindow::parse(&self.start_time, &self.end_time)
    }
}

impl From<DbWorkingHours> for WorkingHoursEntry {
    fn from(row: DbWorkingHours) -> Self {
        WorkingHoursEntry {
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPatient {
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

impl From<DbPatient> for Patient {
    fn from(row: DbPatient) -> Self {
        Patient {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            phone: row.phone,
            email: row.email,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: Option<String>,
    pub duration_minutes: i32,
    pub status: String,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbAppointment {
    /// The span this booking occupies, or `None` when its time is missing or malformed.
    pub fn interval(&self) -> Option<Interval> {
        Interval::from_raw(self.appointment_time.as_deref(), self.duration_minutes)
    }

    pub fn status(&self) -> Result<AppointmentStatus> {
        self.status
            .parse()
            .map_err(|_| eyre!("Unknown appointment status in database: {}", self.status))
    }
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = eyre::Report;

    fn try_from(row: DbAppointment) -> Result<Self> {
        Ok(Appointment {
            status: row.status()?,
            id: row.id,
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            date: row.appointment_date,
            time: row.appointment_time,
            duration_minutes: row.duration_minutes,
            reason: row.reason,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMedicine {
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

impl From<DbMedicine> for Medicine {
    fn from(row: DbMedicine) -> Self {
        Medicine {
            id: row.id,
            name: row.name,
            generic_name: row.generic_name,
            category: row.category,
            unit_price_cents: row.unit_price_cents,
            stock_quantity: row.stock_quantity,
            reorder_level: row.reorder_level,
            expiry_date: row.expiry_date,
            created_at: row.created_at,
        }
    }
}

fn parse_role(role: &str) -> Result<Role> {
    role.parse()
        .map_err(|_| eyre!("Unknown role in database: {}", role))
}
