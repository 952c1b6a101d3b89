//! Inspection ("vistoria") record model.
//!
//! An [`InspectionRecord`] owns three checklists (one per [`ChecklistArea`]),
//! an append-only photo log and an append-only comment log. Records are
//! immutable snapshots; changes go through [`crate::command`].
//!
//! Status fields are closed enums. Stable lowercase codes are used on the wire
//! and in the database; the Portuguese display labels are accepted as aliases
//! so that data exported from the original front-end still loads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geo::GeoPoint;
use crate::types::{DbId, InspectionDate, Timestamp};

// ---------------------------------------------------------------------------
// Inspection status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InspectionStatus {
    #[serde(rename = "pending", alias = "Pendente")]
    Pending,
    #[serde(rename = "in_progress", alias = "Em Andamento")]
    InProgress,
    #[serde(rename = "completed", alias = "Concluída")]
    Completed,
}

impl InspectionStatus {
    pub const ALL: [InspectionStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Strict parse of a code (`in_progress`) or display label (`Em Andamento`).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s || v.label() == s)
            .ok_or_else(|| {
                CoreError::validation(format!(
                    "Invalid inspection status '{s}'. Must be one of: pending, in_progress, completed"
                ))
            })
    }

    /// Lenient parse for display: anything unrecognized is shown as pending.
    pub fn from_str_or_pending(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Portuguese label shown in tables and charts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::InProgress => "Em Andamento",
            Self::Completed => "Concluída",
        }
    }
}

// ---------------------------------------------------------------------------
// Checklist status and area
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChecklistStatus {
    #[serde(rename = "approved", alias = "Aprovado")]
    Approved,
    #[serde(rename = "rejected", alias = "Reprovado")]
    Rejected,
    #[default]
    #[serde(rename = "pending", alias = "Pendente")]
    Pending,
}

impl ChecklistStatus {
    pub const ALL: [ChecklistStatus; 3] = [Self::Approved, Self::Rejected, Self::Pending];

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s || v.label() == s)
            .ok_or_else(|| {
                CoreError::validation(format!(
                    "Invalid checklist status '{s}'. Must be one of: approved, rejected, pending"
                ))
            })
    }

    pub fn from_str_or_pending(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Approved => "Aprovado",
            Self::Rejected => "Reprovado",
            Self::Pending => "Pendente",
        }
    }
}

/// The category a checklist item belongs to.
///
/// The area is always stored explicitly alongside the item. Item identifiers
/// carry no category information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistArea {
    Structural,
    Plumbing,
    Electrical,
}

impl ChecklistArea {
    /// Report order.
    pub const ALL: [ChecklistArea; 3] = [Self::Structural, Self::Plumbing, Self::Electrical];

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s || v.label() == s)
            .ok_or_else(|| {
                CoreError::validation(format!(
                    "Invalid checklist area '{s}'. Must be one of: structural, plumbing, electrical"
                ))
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Plumbing => "plumbing",
            Self::Electrical => "electrical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Structural => "Estrutural",
            Self::Plumbing => "Hidráulica",
            Self::Electrical => "Elétrica",
        }
    }
}

// ---------------------------------------------------------------------------
// Nested entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: ChecklistStatus,
    pub notes: String,
}

/// Where the image bytes of a photo live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ImageRef {
    /// Remote URL.
    Url(String),
    /// Client-local blob reference (e.g. an object URL or a storage key).
    Blob(String),
}

impl ImageRef {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::Blob(_) => "blob",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Url(v) | Self::Blob(v) => v,
        }
    }

    /// Rebuild from the `(kind, value)` pair stored in the database.
    pub fn from_parts(kind: &str, value: String) -> Result<Self, CoreError> {
        match kind {
            "url" => Ok(Self::Url(value)),
            "blob" => Ok(Self::Blob(value)),
            other => Err(CoreError::validation(format!(
                "Invalid image reference kind '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: DbId,
    pub caption: String,
    pub image: ImageRef,
    pub location: Option<GeoPoint>,
    pub taken_at: Timestamp,
    /// Checklist item this photo documents, if any. Association only.
    pub item_id: Option<DbId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: DbId,
    pub author: String,
    pub body: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Inspection record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub id: DbId,
    pub project_name: String,
    pub address: String,
    pub date: InspectionDate,
    pub status: InspectionStatus,
    pub responsible: String,
    pub general_notes: String,
    pub structural: Vec<ChecklistItem>,
    pub plumbing: Vec<ChecklistItem>,
    pub electrical: Vec<ChecklistItem>,
    pub photos: Vec<Photo>,
    pub comments: Vec<Comment>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl InspectionRecord {
    pub fn items(&self, area: ChecklistArea) -> &[ChecklistItem] {
        match area {
            ChecklistArea::Structural => &self.structural,
            ChecklistArea::Plumbing => &self.plumbing,
            ChecklistArea::Electrical => &self.electrical,
        }
    }

    pub fn items_mut(&mut self, area: ChecklistArea) -> &mut Vec<ChecklistItem> {
        match area {
            ChecklistArea::Structural => &mut self.structural,
            ChecklistArea::Plumbing => &mut self.plumbing,
            ChecklistArea::Electrical => &mut self.electrical,
        }
    }

    /// Every item of the record, tagged with the area it was filed under.
    pub fn tagged_items(&self) -> impl Iterator<Item = (ChecklistArea, &ChecklistItem)> {
        ChecklistArea::ALL
            .into_iter()
            .flat_map(move |area| self.items(area).iter().map(move |item| (area, item)))
    }

    pub fn item_count(&self) -> usize {
        self.structural.len() + self.plumbing.len() + self.electrical.len()
    }

    pub fn find_item(&self, item_id: DbId) -> Option<(ChecklistArea, &ChecklistItem)> {
        self.tagged_items().find(|(_, item)| item.id == item_id)
    }

    /// Comments in display order: most recently added first.
    pub fn comments_newest_first(&self) -> Vec<&Comment> {
        self.comments.iter().rev().collect()
    }
}

// ---------------------------------------------------------------------------
// Creation input
// ---------------------------------------------------------------------------

/// A checklist item to create, filed under an explicit area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChecklistItem {
    pub area: ChecklistArea,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ChecklistStatus,
    #[serde(default)]
    pub notes: String,
}

impl NewChecklistItem {
    pub fn pending(area: ChecklistArea, name: &str, description: Option<&str>) -> Self {
        Self {
            area,
            name: name.to_string(),
            description: description.map(str::to_string),
            status: ChecklistStatus::Pending,
            notes: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("Checklist item name", &self.name)
    }
}

/// Validated input for starting an inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInspection {
    pub project_name: String,
    pub address: String,
    pub date: InspectionDate,
    pub status: InspectionStatus,
    pub responsible: String,
    pub general_notes: String,
    pub checklist: Vec<NewChecklistItem>,
}

impl NewInspection {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("Project name", &self.project_name)?;
        require_text("Address", &self.address)?;
        require_text("Responsible", &self.responsible)?;
        self.checklist.iter().try_for_each(NewChecklistItem::validate)
    }
}

/// Items every new inspection starts with when the caller supplies none.
pub fn default_checklist() -> Vec<NewChecklistItem> {
    vec![
        NewChecklistItem::pending(
            ChecklistArea::Structural,
            "Fundações",
            Some("Verificar estado das fundações"),
        ),
        NewChecklistItem::pending(ChecklistArea::Structural, "Estrutura", None),
        NewChecklistItem::pending(ChecklistArea::Plumbing, "Tubulação", None),
        NewChecklistItem::pending(ChecklistArea::Electrical, "Quadro Geral", None),
    ]
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Parse an inspection date.
///
/// Accepts ISO `YYYY-MM-DD` and the Brazilian `DD/MM/YYYY` form. Anything
/// else is a validation error.
pub fn parse_inspection_date(s: &str) -> Result<InspectionDate, CoreError> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .map_err(|_| {
            CoreError::validation(format!(
                "Invalid date '{s}'. Expected YYYY-MM-DD or DD/MM/YYYY"
            ))
        })
}

/// Reject empty or whitespace-only text.
pub fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}
