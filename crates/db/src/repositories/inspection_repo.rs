//! Repository for the `inspections` table.

use sqlx::PgPool;
use vistoria_core::command::DetailsPatch;
use vistoria_core::inspection::{InspectionStatus, NewInspection};
use vistoria_core::types::DbId;

use crate::models::inspection::{InspectionChildren, InspectionRow};
use crate::repositories::{ChecklistItemRepo, CommentRepo, PhotoRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_name, address, inspection_date, status, responsible, \
                        general_notes, created_at, updated_at";

/// Provides CRUD operations for inspections.
pub struct InspectionRepo;

impl InspectionRepo {
    /// Insert an inspection and its initial checklist in one transaction.
    pub async fn create(pool: &PgPool, input: &NewInspection) -> Result<InspectionRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO inspections \
                (project_name, address, inspection_date, status, responsible, general_notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, InspectionRow>(&query)
            .bind(&input.project_name)
            .bind(&input.address)
            .bind(input.date)
            .bind(input.status.as_str())
            .bind(&input.responsible)
            .bind(&input.general_notes)
            .fetch_one(&mut *tx)
            .await?;

        for item in &input.checklist {
            ChecklistItemRepo::create_in_tx(&mut tx, row.id, item).await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    /// Find an inspection by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<InspectionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inspections WHERE id = $1");
        sqlx::query_as::<_, InspectionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all inspections, most recent inspection date first.
    pub async fn list(pool: &PgPool) -> Result<Vec<InspectionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspections ORDER BY inspection_date DESC, id DESC"
        );
        sqlx::query_as::<_, InspectionRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update descriptive fields. Only non-`None` fields in `patch` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_details(
        pool: &PgPool,
        id: DbId,
        patch: &DetailsPatch,
    ) -> Result<Option<InspectionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE inspections SET
                project_name = COALESCE($2, project_name),
                address = COALESCE($3, address),
                inspection_date = COALESCE($4, inspection_date),
                responsible = COALESCE($5, responsible),
                general_notes = COALESCE($6, general_notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InspectionRow>(&query)
            .bind(id)
            .bind(&patch.project_name)
            .bind(&patch.address)
            .bind(patch.date)
            .bind(&patch.responsible)
            .bind(&patch.general_notes)
            .fetch_optional(pool)
            .await
    }

    /// Set the status. Returns `None` if the inspection does not exist.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: InspectionStatus,
    ) -> Result<Option<InspectionRow>, sqlx::Error> {
        let query = format!("UPDATE inspections SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, InspectionRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Bump `updated_at` after a change to one of the child tables.
    ///
    /// Returns `true` if the row exists.
    pub async fn touch(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE inspections SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load items, photos and comments of every inspection in `ids`.
    pub async fn load_children(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<InspectionChildren, sqlx::Error> {
        if ids.is_empty() {
            return Ok(InspectionChildren::default());
        }
        Ok(InspectionChildren {
            items: ChecklistItemRepo::list_for_inspections(pool, ids).await?,
            photos: PhotoRepo::list_for_inspections(pool, ids).await?,
            comments: CommentRepo::list_for_inspections(pool, ids).await?,
        })
    }
}
