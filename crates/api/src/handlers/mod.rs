pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod inspections;
pub mod reports;

/// Trim and lowercase an e-mail so lookups are case-insensitive.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
