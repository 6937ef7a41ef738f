/// Session authentication, password hashing, and role checks
pub mod auth;
/// Mapping of domain errors onto HTTP responses
pub mod error_handling;
