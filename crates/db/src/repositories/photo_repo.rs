//! Repository for the `photos` table.

use sqlx::PgPool;
use vistoria_core::types::DbId;

use crate::models::inspection::{CreatePhoto, PhotoRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, inspection_id, item_id, caption, image_kind, image_ref, \
                        latitude, longitude, taken_at";

/// Provides insert and batch-load operations for photos.
pub struct PhotoRepo;

impl PhotoRepo {
    /// Append a photo to an inspection.
    pub async fn create(
        pool: &PgPool,
        inspection_id: DbId,
        input: &CreatePhoto,
    ) -> Result<PhotoRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO photos \
                (inspection_id, item_id, caption, image_kind, image_ref, latitude, longitude, taken_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PhotoRow>(&query)
            .bind(inspection_id)
            .bind(input.item_id)
            .bind(&input.caption)
            .bind(input.image.kind())
            .bind(input.image.value())
            .bind(input.location.map(|p| p.latitude))
            .bind(input.location.map(|p| p.longitude))
            .bind(input.taken_at)
            .fetch_one(pool)
            .await
    }

    /// Photos of every inspection in `inspection_ids`, in insertion order.
    pub async fn list_for_inspections(
        pool: &PgPool,
        inspection_ids: &[DbId],
    ) -> Result<Vec<PhotoRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM photos WHERE inspection_id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, PhotoRow>(&query)
            .bind(inspection_ids)
            .fetch_all(pool)
            .await
    }
}
