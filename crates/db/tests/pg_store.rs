//! `PgStore` against a real database.
//!
//! These need a running Postgres reachable through `DATABASE_URL`:
//! `cargo test -p vistoria-db -- --ignored`.

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use vistoria_core::command::{InspectionCommand, NewComment, NewPhoto};
use vistoria_core::error::CoreError;
use vistoria_core::geo::LocationFix;
use vistoria_core::inspection::{
    default_checklist, ChecklistStatus, ImageRef, InspectionStatus, NewInspection,
};
use vistoria_core::roles::Role;
use vistoria_db::models::session::CreateSession;
use vistoria_db::models::user::CreateUser;
use vistoria_db::store::{AccountStore, InspectionStore, PgStore};
use vistoria_db::DbError;

fn new_inspection() -> NewInspection {
    NewInspection {
        project_name: "Residencial Solaris".into(),
        address: "Av. Paulista, 1000".into(),
        date: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
        status: InspectionStatus::Pending,
        responsible: "Eng. Carlos Silva".into(),
        general_notes: String::new(),
        checklist: default_checklist(),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_and_reload_with_children(pool: PgPool) {
    vistoria_db::health_check(&pool).await.unwrap();
    let store = PgStore::new(pool);

    let created = store.create(new_inspection()).await.unwrap();
    assert_eq!(created.structural.len(), 2);
    assert_eq!(created.plumbing.len(), 1);
    assert_eq!(created.electrical.len(), 1);

    let item_id = created.plumbing[0].id;
    store
        .apply(
            created.id,
            InspectionCommand::UpdateChecklistItem {
                item_id,
                status: Some(ChecklistStatus::Rejected),
                notes: Some("Vazamento".into()),
            },
        )
        .await
        .unwrap();
    store
        .apply(
            created.id,
            InspectionCommand::AddPhoto(NewPhoto {
                caption: "Vazamento".into(),
                image: ImageRef::Url("https://example.com/v.jpg".into()),
                location: LocationFix::Acquired {
                    latitude: -23.54,
                    longitude: -46.64,
                },
                taken_at: None,
                item_id: Some(item_id),
            }),
        )
        .await
        .unwrap();
    let record = store
        .apply(
            created.id,
            InspectionCommand::AddComment(NewComment {
                author: "Eng. Maria".into(),
                body: "  Foto anexada.  ".into(),
            }),
        )
        .await
        .unwrap();

    assert_eq!(record.plumbing[0].status, ChecklistStatus::Rejected);
    assert_eq!(record.photos[0].item_id, Some(item_id));
    assert_eq!(record.photos[0].location.unwrap().latitude, -23.54);
    assert_eq!(record.comments[0].body, "Foto anexada.");
    assert_eq!(store.list().await.unwrap(), vec![record]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn missing_rows_are_not_found(pool: PgPool) {
    let store = PgStore::new(pool);
    assert_matches!(
        store.get(999).await,
        Err(DbError::Core(CoreError::NotFound { .. }))
    );
    assert_matches!(
        store.update_role(999, Role::Admin).await,
        Err(DbError::Core(CoreError::NotFound { entity: "User", .. }))
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_email_violates_unique_constraint(pool: PgPool) {
    let store = PgStore::new(pool);
    let input = CreateUser {
        email: "ana@example.com".into(),
        password_hash: "hash".into(),
        first_name: "Ana".into(),
        last_name: "Souza".into(),
        role: Role::User,
    };
    store.create_user(input.clone()).await.unwrap();

    let err = store.create_user(input).await.unwrap_err();
    assert_matches!(err, DbError::Sqlx(sqlx::Error::Database(ref db)) if db.constraint() == Some("uq_users_email"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn session_is_revoked_only_once(pool: PgPool) {
    let store = PgStore::new(pool);
    let user = store
        .create_user(CreateUser {
            email: "ana@example.com".into(),
            password_hash: "hash".into(),
            first_name: "Ana".into(),
            last_name: "Souza".into(),
            role: Role::User,
        })
        .await
        .unwrap();
    let session = store
        .create_session(CreateSession {
            user_id: user.id,
            refresh_token_hash: "live".into(),
            expires_at: Utc::now() + Duration::days(1),
        })
        .await
        .unwrap();

    assert!(store.revoke_session(session.id).await.unwrap());
    assert!(!store.revoke_session(session.id).await.unwrap());
    assert!(store.find_active_session("live").await.unwrap().is_none());
}
