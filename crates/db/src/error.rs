//! Error type returned by the stores.

use vistoria_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Domain rejection: not found, validation, conflict.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    pub fn not_found(entity: &'static str, id: vistoria_core::types::DbId) -> Self {
        Self::Core(CoreError::NotFound { entity, id })
    }
}
