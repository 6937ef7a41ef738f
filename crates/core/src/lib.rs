//! # Hospital Core
//!
//! Domain types shared by the database and API crates: the error type, the
//! request/response models for each resource, and the availability calculator
//! used for appointment scheduling.

pub mod availability;
pub mod errors;
pub mod models;
