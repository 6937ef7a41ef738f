pub mod appointment;
pub mod doctor;
pub mod medicine;
pub mod patient;
pub mod user;
