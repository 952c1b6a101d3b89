//! Inspection rows and the assembly of a full [`InspectionRecord`] from them.

use sqlx::FromRow;
use vistoria_core::geo::GeoPoint;
use vistoria_core::inspection::{
    ChecklistArea, ChecklistItem, ChecklistStatus, Comment, ImageRef, InspectionRecord,
    InspectionStatus, Photo,
};
use vistoria_core::types::{DbId, InspectionDate, Timestamp};

/// A row from the `inspections` table.
#[derive(Debug, Clone, FromRow)]
pub struct InspectionRow {
    pub id: DbId,
    pub project_name: String,
    pub address: String,
    pub inspection_date: InspectionDate,
    pub status: String,
    pub responsible: String,
    pub general_notes: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `checklist_items` table.
#[derive(Debug, Clone, FromRow)]
pub struct ChecklistItemRow {
    pub id: DbId,
    pub inspection_id: DbId,
    pub area: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub notes: String,
}

/// A row from the `photos` table.
#[derive(Debug, Clone, FromRow)]
pub struct PhotoRow {
    pub id: DbId,
    pub inspection_id: DbId,
    pub item_id: Option<DbId>,
    pub caption: String,
    pub image_kind: String,
    pub image_ref: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub taken_at: Timestamp,
}

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: DbId,
    pub inspection_id: DbId,
    pub author: String,
    pub body: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a photo. The location is already resolved.
#[derive(Debug, Clone)]
pub struct CreatePhoto {
    pub item_id: Option<DbId>,
    pub caption: String,
    pub image: ImageRef,
    pub location: Option<GeoPoint>,
    pub taken_at: Timestamp,
}

/// Child rows of one or more inspections, loaded in batch.
#[derive(Debug, Default)]
pub struct InspectionChildren {
    pub items: Vec<ChecklistItemRow>,
    pub photos: Vec<PhotoRow>,
    pub comments: Vec<CommentRow>,
}

impl InspectionRow {
    /// Build the domain record, picking the children that belong to this row.
    ///
    /// Text columns outside the known enum values are logged and read
    /// leniently: statuses fall back to pending, items with an unknown area
    /// and photos with an unknown image kind are skipped.
    pub fn into_record(self, children: &InspectionChildren) -> InspectionRecord {
        let status = InspectionStatus::parse(&self.status).unwrap_or_else(|_| {
            tracing::warn!(inspection_id = self.id, status = %self.status, "Unknown inspection status");
            InspectionStatus::Pending
        });

        let mut record = InspectionRecord {
            id: self.id,
            project_name: self.project_name,
            address: self.address,
            date: self.inspection_date,
            status,
            responsible: self.responsible,
            general_notes: self.general_notes,
            structural: Vec::new(),
            plumbing: Vec::new(),
            electrical: Vec::new(),
            photos: Vec::new(),
            comments: Vec::new(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        let owner = record.id;
        for row in children.items.iter().filter(|r| r.inspection_id == owner) {
            let Ok(area) = ChecklistArea::parse(&row.area) else {
                tracing::warn!(item_id = row.id, area = %row.area, "Skipping item with unknown area");
                continue;
            };
            record.items_mut(area).push(ChecklistItem {
                id: row.id,
                name: row.name.clone(),
                description: row.description.clone(),
                status: ChecklistStatus::from_str_or_pending(&row.status),
                notes: row.notes.clone(),
            });
        }

        for row in children.photos.iter().filter(|r| r.inspection_id == owner) {
            let image = match ImageRef::from_parts(&row.image_kind, row.image_ref.clone()) {
                Ok(image) => image,
                Err(e) => {
                    tracing::warn!(photo_id = row.id, error = %e, "Skipping photo");
                    continue;
                }
            };
            let location = match (row.latitude, row.longitude) {
                (Some(latitude), Some(longitude)) => Some(GeoPoint {
                    latitude,
                    longitude,
                }),
                _ => None,
            };
            record.photos.push(Photo {
                id: row.id,
                caption: row.caption.clone(),
                image,
                location,
                taken_at: row.taken_at,
                item_id: row.item_id,
            });
        }

        record.comments = children
            .comments
            .iter()
            .filter(|r| r.inspection_id == owner)
            .map(|row| Comment {
                id: row.id,
                author: row.author.clone(),
                body: row.body.clone(),
                created_at: row.created_at,
            })
            .collect();

        record
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;

    fn row(id: DbId, status: &str) -> InspectionRow {
        InspectionRow {
            id,
            project_name: "Obra".into(),
            address: "Rua A, 1".into(),
            inspection_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            status: status.into(),
            responsible: "Ana".into(),
            general_notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item(id: DbId, inspection_id: DbId, area: &str, status: &str) -> ChecklistItemRow {
        ChecklistItemRow {
            id,
            inspection_id,
            area: area.into(),
            name: format!("item {id}"),
            description: None,
            status: status.into(),
            notes: String::new(),
        }
    }

    #[test]
    fn children_are_grouped_by_area_and_owner() {
        let children = InspectionChildren {
            items: vec![
                item(1, 7, "plumbing", "rejected"),
                item(2, 7, "structural", "approved"),
                item(3, 8, "structural", "approved"),
            ],
            photos: vec![PhotoRow {
                id: 1,
                inspection_id: 7,
                item_id: Some(1),
                caption: "Vazamento".into(),
                image_kind: "url".into(),
                image_ref: "https://example.com/v.jpg".into(),
                latitude: Some(-23.5),
                longitude: Some(-46.6),
                taken_at: Utc::now(),
            }],
            comments: Vec::new(),
        };

        let record = row(7, "completed").into_record(&children);
        assert_eq!(record.status, InspectionStatus::Completed);
        assert_eq!(record.structural.len(), 1);
        assert_eq!(record.plumbing[0].status, ChecklistStatus::Rejected);
        assert!(record.electrical.is_empty());
        assert_eq!(record.photos[0].location.unwrap().latitude, -23.5);
    }

    #[test]
    fn unknown_text_values_are_read_leniently() {
        let children = InspectionChildren {
            items: vec![item(1, 1, "roofing", "approved"), item(2, 1, "electrical", "??")],
            ..Default::default()
        };
        let record = row(1, "archived").into_record(&children);

        assert_eq!(record.status, InspectionStatus::Pending);
        assert_eq!(record.item_count(), 1);
        assert_eq!(record.electrical[0].status, ChecklistStatus::Pending);
    }
}
