//! Repository for the `comments` table.

use sqlx::PgPool;
use vistoria_core::types::DbId;

use crate::models::inspection::CommentRow;

const COLUMNS: &str = "id, inspection_id, author, body, created_at";

/// Comments are append-only: there is no update or delete.
pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(
        pool: &PgPool,
        inspection_id: DbId,
        author: &str,
        body: &str,
    ) -> Result<CommentRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (inspection_id, author, body)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CommentRow>(&query)
            .bind(inspection_id)
            .bind(author)
            .bind(body)
            .fetch_one(pool)
            .await
    }

    /// Comments of every inspection in `inspection_ids`, oldest first.
    pub async fn list_for_inspections(
        pool: &PgPool,
        inspection_ids: &[DbId],
    ) -> Result<Vec<CommentRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM comments WHERE inspection_id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, CommentRow>(&query)
            .bind(inspection_ids)
            .fetch_all(pool)
            .await
    }
}
