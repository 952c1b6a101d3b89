//! Postgres-backed stores built on the repositories.

use async_trait::async_trait;
use vistoria_core::command::{validate_command, InspectionCommand};
use vistoria_core::inspection::{InspectionRecord, NewInspection};
use vistoria_core::roles::Role;
use vistoria_core::types::DbId;

use crate::error::DbError;
use crate::models::inspection::{CreatePhoto, InspectionRow};
use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, Profile, User};
use crate::repositories::{
    ChecklistItemRepo, CommentRepo, InspectionRepo, PhotoRepo, SessionRepo, UserRepo,
};
use crate::store::{AccountStore, InspectionStore};
use crate::DbPool;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn assemble(&self, rows: Vec<InspectionRow>) -> Result<Vec<InspectionRecord>, DbError> {
        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let children = InspectionRepo::load_children(&self.pool, &ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_record(&children))
            .collect())
    }

    async fn touch(&self, id: DbId) -> Result<(), DbError> {
        if !InspectionRepo::touch(&self.pool, id).await? {
            return Err(DbError::not_found("Inspection", id));
        }
        Ok(())
    }
}

#[async_trait]
impl InspectionStore for PgStore {
    async fn list(&self) -> Result<Vec<InspectionRecord>, DbError> {
        let rows = InspectionRepo::list(&self.pool).await?;
        self.assemble(rows).await
    }

    async fn get(&self, id: DbId) -> Result<InspectionRecord, DbError> {
        let row = InspectionRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(DbError::not_found("Inspection", id))?;
        let mut records = self.assemble(vec![row]).await?;
        records.pop().ok_or(DbError::not_found("Inspection", id))
    }

    async fn create(&self, input: NewInspection) -> Result<InspectionRecord, DbError> {
        input.validate()?;
        let row = InspectionRepo::create(&self.pool, &input).await?;
        tracing::info!(inspection_id = row.id, items = input.checklist.len(), "Inspection created");
        self.get(row.id).await
    }

    async fn apply(
        &self,
        id: DbId,
        command: InspectionCommand,
    ) -> Result<InspectionRecord, DbError> {
        let current = self.get(id).await?;
        validate_command(&current, &command)?;
        let kind = command.kind();

        match command {
            InspectionCommand::UpdateDetails(patch) => {
                InspectionRepo::update_details(&self.pool, id, &patch)
                    .await?
                    .ok_or(DbError::not_found("Inspection", id))?;
            }
            InspectionCommand::SetStatus(status) => {
                InspectionRepo::set_status(&self.pool, id, status)
                    .await?
                    .ok_or(DbError::not_found("Inspection", id))?;
            }
            InspectionCommand::AddChecklistItem(item) => {
                ChecklistItemRepo::create(&self.pool, id, &item).await?;
                self.touch(id).await?;
            }
            InspectionCommand::UpdateChecklistItem {
                item_id,
                status,
                notes,
            } => {
                ChecklistItemRepo::update(&self.pool, id, item_id, status, notes.as_deref())
                    .await?
                    .ok_or(DbError::not_found("ChecklistItem", item_id))?;
                self.touch(id).await?;
            }
            InspectionCommand::AddPhoto(photo) => {
                let input = CreatePhoto {
                    item_id: photo.item_id,
                    caption: photo.caption,
                    location: photo.location.into_point()?,
                    image: photo.image,
                    taken_at: photo.taken_at.unwrap_or_else(chrono::Utc::now),
                };
                PhotoRepo::create(&self.pool, id, &input).await?;
                self.touch(id).await?;
            }
            InspectionCommand::AddComment(comment) => {
                CommentRepo::create(&self.pool, id, &comment.author, comment.body.trim()).await?;
                self.touch(id).await?;
            }
        }

        tracing::debug!(inspection_id = id, command = kind, "Inspection command applied");
        self.get(id).await
    }

    async fn health_check(&self) -> Result<(), DbError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn find_user(&self, id: DbId) -> Result<Option<User>, DbError> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_user(&self, input: CreateUser) -> Result<User, DbError> {
        Ok(UserRepo::create(&self.pool, &input).await?)
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, DbError> {
        let users = UserRepo::list(&self.pool).await?;
        Ok(users.iter().map(Profile::from).collect())
    }

    async fn update_role(&self, id: DbId, role: Role) -> Result<Profile, DbError> {
        let user = UserRepo::update_role(&self.pool, id, role)
            .await?
            .ok_or(DbError::not_found("User", id))?;
        Ok(Profile::from(&user))
    }

    async fn count_users(&self) -> Result<i64, DbError> {
        Ok(UserRepo::count(&self.pool).await?)
    }

    async fn create_session(&self, input: CreateSession) -> Result<Session, DbError> {
        Ok(SessionRepo::create(&self.pool, &input).await?)
    }

    async fn find_active_session(
        &self,
        refresh_token_hash: &str,
    ) -> Result<Option<Session>, DbError> {
        Ok(SessionRepo::find_by_refresh_token_hash(&self.pool, refresh_token_hash).await?)
    }

    async fn revoke_session(&self, id: DbId) -> Result<bool, DbError> {
        Ok(SessionRepo::revoke(&self.pool, id).await?)
    }

    async fn revoke_all_sessions(&self, user_id: DbId) -> Result<u64, DbError> {
        Ok(SessionRepo::revoke_all_for_user(&self.pool, user_id).await?)
    }
}
