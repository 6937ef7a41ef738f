pub mod appointment;
pub mod doctor;
pub mod medicine;
pub mod patient;
pub mod user;

/// Loose email shape check shared by the request validators.
pub(crate) fn is_plausible_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
