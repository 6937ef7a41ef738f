pub mod appointment;
pub mod auth;
pub mod doctor;
pub mod health;
pub mod medicine;
pub mod patient;
