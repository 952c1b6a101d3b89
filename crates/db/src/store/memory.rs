//! In-process store guarded by a `tokio` `RwLock`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use vistoria_core::command::{apply_command, build_record, IdAllocator, InspectionCommand};
use vistoria_core::error::CoreError;
use vistoria_core::inspection::{InspectionRecord, NewInspection};
use vistoria_core::roles::Role;
use vistoria_core::sample::sample_inspections;
use vistoria_core::types::DbId;

use crate::error::DbError;
use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, Profile, User};
use crate::store::{AccountStore, InspectionStore};

/// Per-entity id sequences. Each counter holds the last id handed out.
#[derive(Debug, Default)]
struct Sequences {
    inspection: DbId,
    item: DbId,
    photo: DbId,
    comment: DbId,
    user: DbId,
    session: DbId,
}

impl IdAllocator for Sequences {
    fn next_inspection_id(&mut self) -> DbId {
        self.inspection += 1;
        self.inspection
    }

    fn next_item_id(&mut self) -> DbId {
        self.item += 1;
        self.item
    }

    fn next_photo_id(&mut self) -> DbId {
        self.photo += 1;
        self.photo
    }

    fn next_comment_id(&mut self) -> DbId {
        self.comment += 1;
        self.comment
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    inspections: BTreeMap<DbId, InspectionRecord>,
    users: BTreeMap<DbId, User>,
    sessions: BTreeMap<DbId, Session>,
    ids: Sequences,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the two sample inspections.
    pub fn seeded() -> Self {
        Self::with_inspections(sample_inspections())
    }

    /// A store holding `records`. Sequences continue after the highest ids.
    pub fn with_inspections(records: Vec<InspectionRecord>) -> Self {
        let mut state = MemoryState::default();
        for record in records {
            state.ids.inspection = state.ids.inspection.max(record.id);
            for (_, item) in record.tagged_items() {
                state.ids.item = state.ids.item.max(item.id);
            }
            for photo in &record.photos {
                state.ids.photo = state.ids.photo.max(photo.id);
            }
            for comment in &record.comments {
                state.ids.comment = state.ids.comment.max(comment.id);
            }
            state.inspections.insert(record.id, record);
        }
        Self {
            state: RwLock::new(state),
        }
    }
}

#[async_trait]
impl InspectionStore for MemoryStore {
    async fn list(&self) -> Result<Vec<InspectionRecord>, DbError> {
        let state = self.state.read().await;
        let mut records: Vec<InspectionRecord> = state.inspections.values().cloned().collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn get(&self, id: DbId) -> Result<InspectionRecord, DbError> {
        let state = self.state.read().await;
        state
            .inspections
            .get(&id)
            .cloned()
            .ok_or(DbError::not_found("Inspection", id))
    }

    async fn create(&self, input: NewInspection) -> Result<InspectionRecord, DbError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let record = build_record(input, &mut state.ids, Utc::now())?;
        state.inspections.insert(record.id, record.clone());
        tracing::info!(inspection_id = record.id, "Inspection created");
        Ok(record)
    }

    async fn apply(
        &self,
        id: DbId,
        command: InspectionCommand,
    ) -> Result<InspectionRecord, DbError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let current = state
            .inspections
            .get(&id)
            .ok_or(DbError::not_found("Inspection", id))?;
        let kind = command.kind();
        let next = apply_command(current, command, &mut state.ids, Utc::now())?;
        state.inspections.insert(id, next.clone());
        tracing::debug!(inspection_id = id, command = kind, "Inspection command applied");
        Ok(next)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, id: DbId) -> Result<Option<User>, DbError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn create_user(&self, input: CreateUser) -> Result<User, DbError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == input.email) {
            return Err(CoreError::Conflict(format!(
                "A user with email '{}' already exists",
                input.email
            ))
            .into());
        }
        state.ids.user += 1;
        let now = Utc::now();
        let user = User {
            id: state.ids.user,
            email: input.email,
            password_hash: input.password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
            role: input.role.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, DbError> {
        let state = self.state.read().await;
        Ok(state.users.values().map(Profile::from).collect())
    }

    async fn update_role(&self, id: DbId, role: Role) -> Result<Profile, DbError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or(DbError::not_found("User", id))?;
        user.role = role.as_str().to_string();
        user.updated_at = Utc::now();
        Ok(Profile::from(&*user))
    }

    async fn count_users(&self) -> Result<i64, DbError> {
        let state = self.state.read().await;
        Ok(state.users.len() as i64)
    }

    async fn create_session(&self, input: CreateSession) -> Result<Session, DbError> {
        let mut state = self.state.write().await;
        state.ids.session += 1;
        let now = Utc::now();
        let session = Session {
            id: state.ids.session,
            user_id: input.user_id,
            refresh_token_hash: input.refresh_token_hash,
            expires_at: input.expires_at,
            is_revoked: false,
            created_at: now,
            updated_at: now,
        };
        state.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_active_session(
        &self,
        refresh_token_hash: &str,
    ) -> Result<Option<Session>, DbError> {
        let state = self.state.read().await;
        let now = Utc::now();
        Ok(state
            .sessions
            .values()
            .find(|s| {
                s.refresh_token_hash == refresh_token_hash && !s.is_revoked && s.expires_at > now
            })
            .cloned())
    }

    async fn revoke_session(&self, id: DbId) -> Result<bool, DbError> {
        let mut state = self.state.write().await;
        match state.sessions.get_mut(&id) {
            Some(session) if !session.is_revoked => {
                session.is_revoked = true;
                session.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_sessions(&self, user_id: DbId) -> Result<u64, DbError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut revoked = 0;
        for session in state
            .sessions
            .values_mut()
            .filter(|s| s.user_id == user_id && !s.is_revoked)
        {
            session.is_revoked = true;
            session.updated_at = now;
            revoked += 1;
        }
        Ok(revoked)
    }
}
