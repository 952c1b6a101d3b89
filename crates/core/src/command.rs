//! Commands that change an inspection.
//!
//! Every mutation is expressed as an [`InspectionCommand`]. Stores call
//! [`validate_command`] against the current snapshot before persisting, and
//! the in-memory store uses [`apply_command`] to compute the next snapshot.
//! Snapshots are never edited in place.

use crate::error::CoreError;
use crate::geo::LocationFix;
use crate::inspection::{
    require_text, ChecklistItem, ChecklistStatus, Comment, ImageRef, InspectionRecord,
    InspectionStatus, NewChecklistItem, NewInspection, Photo,
};
use crate::types::{DbId, InspectionDate, Timestamp};

/// Partial update of the descriptive fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsPatch {
    pub project_name: Option<String>,
    pub address: Option<String>,
    pub date: Option<InspectionDate>,
    pub responsible: Option<String>,
    pub general_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPhoto {
    pub caption: String,
    pub image: ImageRef,
    pub location: LocationFix,
    /// Capture time reported by the client; defaults to the time of the command.
    pub taken_at: Option<Timestamp>,
    pub item_id: Option<DbId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub author: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InspectionCommand {
    UpdateDetails(DetailsPatch),
    SetStatus(InspectionStatus),
    AddChecklistItem(NewChecklistItem),
    UpdateChecklistItem {
        item_id: DbId,
        status: Option<ChecklistStatus>,
        notes: Option<String>,
    },
    AddPhoto(NewPhoto),
    AddComment(NewComment),
}

impl InspectionCommand {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpdateDetails(_) => "update_details",
            Self::SetStatus(_) => "set_status",
            Self::AddChecklistItem(_) => "add_checklist_item",
            Self::UpdateChecklistItem { .. } => "update_checklist_item",
            Self::AddPhoto(_) => "add_photo",
            Self::AddComment(_) => "add_comment",
        }
    }
}

/// Source of identifiers for entities created by a command.
pub trait IdAllocator {
    fn next_inspection_id(&mut self) -> DbId;
    fn next_item_id(&mut self) -> DbId;
    fn next_photo_id(&mut self) -> DbId;
    fn next_comment_id(&mut self) -> DbId;
}

/// Check a command against the current snapshot without changing anything.
pub fn validate_command(
    record: &InspectionRecord,
    command: &InspectionCommand,
) -> Result<(), CoreError> {
    match command {
        InspectionCommand::UpdateDetails(patch) => {
            if let Some(name) = &patch.project_name {
                require_text("Project name", name)?;
            }
            if let Some(address) = &patch.address {
                require_text("Address", address)?;
            }
            if let Some(responsible) = &patch.responsible {
                require_text("Responsible", responsible)?;
            }
            Ok(())
        }
        InspectionCommand::SetStatus(_) => Ok(()),
        InspectionCommand::AddChecklistItem(item) => item.validate(),
        InspectionCommand::UpdateChecklistItem {
            item_id,
            status,
            notes,
        } => {
            if record.find_item(*item_id).is_none() {
                return Err(CoreError::NotFound {
                    entity: "ChecklistItem",
                    id: *item_id,
                });
            }
            if status.is_none() && notes.is_none() {
                return Err(CoreError::validation(
                    "Checklist item update must change the status or the notes",
                ));
            }
            Ok(())
        }
        InspectionCommand::AddPhoto(photo) => {
            require_text("Image reference", photo.image.value())?;
            photo.location.into_point()?;
            if let Some(item_id) = photo.item_id {
                if record.find_item(item_id).is_none() {
                    return Err(CoreError::validation(format!(
                        "Checklist item {item_id} does not belong to inspection {}",
                        record.id
                    )));
                }
            }
            Ok(())
        }
        InspectionCommand::AddComment(comment) => {
            require_text("Comment author", &comment.author)?;
            require_text("Comment", &comment.body)
        }
    }
}

/// Validate `command` and return the snapshot that results from applying it.
pub fn apply_command(
    record: &InspectionRecord,
    command: InspectionCommand,
    ids: &mut impl IdAllocator,
    now: Timestamp,
) -> Result<InspectionRecord, CoreError> {
    validate_command(record, &command)?;

    let mut next = record.clone();
    match command {
        InspectionCommand::UpdateDetails(patch) => {
            if let Some(name) = patch.project_name {
                next.project_name = name;
            }
            if let Some(address) = patch.address {
                next.address = address;
            }
            if let Some(date) = patch.date {
                next.date = date;
            }
            if let Some(responsible) = patch.responsible {
                next.responsible = responsible;
            }
            if let Some(notes) = patch.general_notes {
                next.general_notes = notes;
            }
        }
        InspectionCommand::SetStatus(status) => next.status = status,
        InspectionCommand::AddChecklistItem(item) => {
            let area = item.area;
            let built = build_item(ids.next_item_id(), item);
            next.items_mut(area).push(built);
        }
        InspectionCommand::UpdateChecklistItem {
            item_id,
            status,
            notes,
        } => {
            let (area, _) = record
                .find_item(item_id)
                .ok_or(CoreError::NotFound {
                    entity: "ChecklistItem",
                    id: item_id,
                })?;
            if let Some(item) = next.items_mut(area).iter_mut().find(|i| i.id == item_id) {
                if let Some(status) = status {
                    item.status = status;
                }
                if let Some(notes) = notes {
                    item.notes = notes;
                }
            }
        }
        InspectionCommand::AddPhoto(photo) => {
            let location = photo.location.into_point()?;
            next.photos.push(Photo {
                id: ids.next_photo_id(),
                caption: photo.caption,
                image: photo.image,
                location,
                taken_at: photo.taken_at.unwrap_or(now),
                item_id: photo.item_id,
            });
        }
        InspectionCommand::AddComment(comment) => {
            next.comments.push(Comment {
                id: ids.next_comment_id(),
                author: comment.author,
                body: comment.body.trim().to_string(),
                created_at: now,
            });
        }
    }
    next.updated_at = now;
    Ok(next)
}

/// Build a fresh record from validated creation input.
pub fn build_record(
    input: NewInspection,
    ids: &mut impl IdAllocator,
    now: Timestamp,
) -> Result<InspectionRecord, CoreError> {
    input.validate()?;

    let mut record = InspectionRecord {
        id: ids.next_inspection_id(),
        project_name: input.project_name,
        address: input.address,
        date: input.date,
        status: input.status,
        responsible: input.responsible,
        general_notes: input.general_notes,
        structural: Vec::new(),
        plumbing: Vec::new(),
        electrical: Vec::new(),
        photos: Vec::new(),
        comments: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    for item in input.checklist {
        let area = item.area;
        let built = build_item(ids.next_item_id(), item);
        record.items_mut(area).push(built);
    }
    Ok(record)
}

fn build_item(id: DbId, item: NewChecklistItem) -> ChecklistItem {
    ChecklistItem {
        id,
        name: item.name,
        description: item.description,
        status: item.status,
        notes: item.notes,
    }
}
