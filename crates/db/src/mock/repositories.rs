use chrono::NaiveDate;
use hospital_core::models::appointment::AppointmentStatus;
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbAppointment, DbDoctor, DbMedicine, DbPatient, DbSessionUser, DbWorkingHours};
use crate::repositories::medicine::StockAdjustment;

// Mock repositories for testing
mock! {
    pub DoctorRepo {
        pub async fn get_doctor_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbDoctor>>;

        pub async fn get_doctor_by_user_id(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Option<DbDoctor>>;

        pub async fn get_working_hours_for_day(
            &self,
            doctor_id: Uuid,
            day_of_week: i16,
        ) -> eyre::Result<Option<DbWorkingHours>>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn get_appointment_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbAppointment>>;

        pub async fn get_active_appointments_for_doctor(
            &self,
            doctor_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Vec<DbAppointment>>;

        pub async fn update_appointment_status(
            &self,
            id: Uuid,
            current: AppointmentStatus,
            next: AppointmentStatus,
            notes: Option<String>,
        ) -> eyre::Result<Option<DbAppointment>>;
    }
}

mock! {
    pub PatientRepo {
        pub async fn get_patient_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbPatient>>;

        pub async fn get_patient_by_user_id(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Option<DbPatient>>;
    }
}

mock! {
    pub SessionRepo {
        pub async fn get_active_session(
            &self,
            token: Uuid,
        ) -> eyre::Result<Option<DbSessionUser>>;
    }
}

mock! {
    pub MedicineRepo {
        pub async fn get_medicine_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbMedicine>>;

        pub async fn adjust_stock(
            &self,
            id: Uuid,
            delta: i32,
        ) -> eyre::Result<StockAdjustment>;
    }
}
