//! Repository for the `checklist_items` table.

use sqlx::PgPool;
use vistoria_core::inspection::{ChecklistStatus, NewChecklistItem};
use vistoria_core::types::DbId;

use crate::models::inspection::ChecklistItemRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, inspection_id, area, name, description, status, notes";

const INSERT: &str = "INSERT INTO checklist_items \
                        (inspection_id, area, name, description, status, notes) \
                      VALUES ($1, $2, $3, $4, $5, $6)";

/// Provides CRUD operations for checklist items.
pub struct ChecklistItemRepo;

impl ChecklistItemRepo {
    /// Append an item to an inspection.
    pub async fn create(
        pool: &PgPool,
        inspection_id: DbId,
        input: &NewChecklistItem,
    ) -> Result<ChecklistItemRow, sqlx::Error> {
        let query = format!("{INSERT} RETURNING {COLUMNS}");
        sqlx::query_as::<_, ChecklistItemRow>(&query)
            .bind(inspection_id)
            .bind(input.area.as_str())
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Same as [`Self::create`], inside the transaction creating the inspection.
    pub(crate) async fn create_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        inspection_id: DbId,
        input: &NewChecklistItem,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(INSERT)
            .bind(inspection_id)
            .bind(input.area.as_str())
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(&input.notes)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Patch status and/or notes of an item of `inspection_id`.
    ///
    /// Returns `None` if the item does not exist or belongs to another inspection.
    pub async fn update(
        pool: &PgPool,
        inspection_id: DbId,
        id: DbId,
        status: Option<ChecklistStatus>,
        notes: Option<&str>,
    ) -> Result<Option<ChecklistItemRow>, sqlx::Error> {
        let query = format!(
            "UPDATE checklist_items SET
                status = COALESCE($3, status),
                notes = COALESCE($4, notes)
             WHERE id = $2 AND inspection_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChecklistItemRow>(&query)
            .bind(inspection_id)
            .bind(id)
            .bind(status.map(|s| s.as_str()))
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Items of every inspection in `inspection_ids`, in insertion order.
    pub async fn list_for_inspections(
        pool: &PgPool,
        inspection_ids: &[DbId],
    ) -> Result<Vec<ChecklistItemRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM checklist_items WHERE inspection_id = ANY($1) ORDER BY id"
        );
        sqlx::query_as::<_, ChecklistItemRow>(&query)
            .bind(inspection_ids)
            .fetch_all(pool)
            .await
    }
}
