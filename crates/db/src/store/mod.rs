//! Storage seams used by the API.
//!
//! Handlers only see `Arc<dyn InspectionStore>` and `Arc<dyn AccountStore>`.
//! [`PgStore`] backs both with Postgres; [`MemoryStore`] keeps everything in
//! process and is what the server falls back to when no database is
//! configured, and what the HTTP tests run against.
//!
//! Writes are read-modify-write with last-writer-wins semantics. There is no
//! optimistic locking.

use async_trait::async_trait;
use vistoria_core::command::InspectionCommand;
use vistoria_core::inspection::{InspectionRecord, NewInspection};
use vistoria_core::roles::Role;
use vistoria_core::types::DbId;

use crate::error::DbError;
use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, Profile, User};

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

#[async_trait]
pub trait InspectionStore: Send + Sync {
    /// All inspections, most recent inspection date first.
    async fn list(&self) -> Result<Vec<InspectionRecord>, DbError>;

    /// Fails with `NotFound` when the inspection does not exist.
    async fn get(&self, id: DbId) -> Result<InspectionRecord, DbError>;

    async fn create(&self, input: NewInspection) -> Result<InspectionRecord, DbError>;

    /// Validate `command` against the current snapshot, persist it, and
    /// return the new snapshot.
    async fn apply(
        &self,
        id: DbId,
        command: InspectionCommand,
    ) -> Result<InspectionRecord, DbError>;

    /// Whether the backing storage is reachable.
    async fn health_check(&self) -> Result<(), DbError> {
        Ok(())
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;

    async fn find_user(&self, id: DbId) -> Result<Option<User>, DbError>;

    /// Fails with a conflict when the e-mail is already registered.
    async fn create_user(&self, input: CreateUser) -> Result<User, DbError>;

    async fn list_profiles(&self) -> Result<Vec<Profile>, DbError>;

    /// Fails with `NotFound` when the user does not exist.
    async fn update_role(&self, id: DbId, role: Role) -> Result<Profile, DbError>;

    async fn count_users(&self) -> Result<i64, DbError>;

    async fn create_session(&self, input: CreateSession) -> Result<Session, DbError>;

    /// A session that is neither revoked nor expired.
    async fn find_active_session(
        &self,
        refresh_token_hash: &str,
    ) -> Result<Option<Session>, DbError>;

    async fn revoke_session(&self, id: DbId) -> Result<bool, DbError>;

    async fn revoke_all_sessions(&self, user_id: DbId) -> Result<u64, DbError>;
}
