//! Handlers for the `/inspections` resource.
//!
//! Every mutation is translated into an [`InspectionCommand`] and applied
//! through the [`InspectionStore`](vistoria_db::store::InspectionStore),
//! which returns the new snapshot of the whole record.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use vistoria_core::command::{DetailsPatch, InspectionCommand, NewComment, NewPhoto};
use vistoria_core::error::CoreError;
use vistoria_core::geo::LocationFix;
use vistoria_core::inspection::{
    default_checklist, parse_inspection_date, ChecklistArea, ChecklistStatus, Comment, ImageRef,
    InspectionRecord, InspectionStatus, NewChecklistItem, NewInspection, Photo,
};
use vistoria_core::report::linked_photos;
use vistoria_core::types::{DbId, Timestamp};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::InspectionListParams;
use crate::response::DataResponse;
use crate::state::AppState;

type RecordResponse = Json<DataResponse<InspectionRecord>>;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /inspections`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInspectionRequest {
    #[validate(length(min = 1, max = 200))]
    pub project_name: String,
    #[validate(length(min = 1, max = 300))]
    pub address: String,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`.
    pub date: String,
    #[validate(length(min = 1, max = 200))]
    pub responsible: String,
    /// Defaults to `pending`.
    pub status: Option<String>,
    #[serde(default)]
    pub general_notes: String,
    /// Initial checklist. When omitted the default checklist is used.
    pub checklist: Option<Vec<NewChecklistItem>>,
}

/// Request body for `PUT /inspections/{id}`. Omitted fields are unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateInspectionRequest {
    pub project_name: Option<String>,
    pub address: Option<String>,
    pub date: Option<String>,
    pub responsible: Option<String>,
    pub general_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// Request body for `POST /inspections/{id}/items`.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// `structural`, `plumbing` or `electrical`.
    pub area: String,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// Request body for `PATCH /inspections/{id}/items/{item_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Request body for `POST /inspections/{id}/photos`.
#[derive(Debug, Deserialize)]
pub struct AddPhotoRequest {
    #[serde(default)]
    pub caption: String,
    pub image: ImageRef,
    /// Outcome of the client's geolocation request; missing means unavailable.
    #[serde(default)]
    pub location: LocationFix,
    pub taken_at: Option<Timestamp>,
    pub item_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub body: String,
}

fn parse_status(s: Option<&str>) -> Result<Option<InspectionStatus>, CoreError> {
    s.map(|s| InspectionStatus::parse(s.trim())).transpose()
}

fn parse_item_status(s: Option<&str>) -> Result<Option<ChecklistStatus>, CoreError> {
    s.map(|s| ChecklistStatus::parse(s.trim())).transpose()
}

async fn apply(state: &AppState, id: DbId, command: InspectionCommand) -> AppResult<RecordResponse> {
    let kind = command.kind();
    let record = state.inspections.apply(id, command).await?;
    tracing::debug!(inspection_id = id, command = kind, "Inspection updated");
    Ok(Json(DataResponse { data: record }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/inspections?q=&status=
///
/// Most recent inspection date first.
pub async fn list_inspections(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<InspectionListParams>,
) -> AppResult<Json<DataResponse<Vec<InspectionRecord>>>> {
    let filter = params.to_filter()?;
    let records = filter.apply(state.inspections.list().await?);
    Ok(Json(DataResponse { data: records }))
}

/// POST /api/v1/inspections
pub async fn create_inspection(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateInspectionRequest>,
) -> AppResult<(StatusCode, RecordResponse)> {
    input.validate()?;
    let new = NewInspection {
        project_name: input.project_name.trim().to_string(),
        address: input.address.trim().to_string(),
        date: parse_inspection_date(&input.date)?,
        status: parse_status(input.status.as_deref())?.unwrap_or(InspectionStatus::Pending),
        responsible: input.responsible.trim().to_string(),
        general_notes: input.general_notes,
        checklist: input.checklist.unwrap_or_else(default_checklist),
    };

    let record = state.inspections.create(new).await?;
    tracing::info!(
        inspection_id = record.id,
        user_id = auth.user_id,
        items = record.item_count(),
        "Inspection created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/inspections/{id}
pub async fn get_inspection(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<RecordResponse> {
    let record = state.inspections.get(id).await?;
    Ok(Json(DataResponse { data: record }))
}

/// PUT /api/v1/inspections/{id}
pub async fn update_inspection(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInspectionRequest>,
) -> AppResult<RecordResponse> {
    let patch = DetailsPatch {
        project_name: input.project_name.map(|s| s.trim().to_string()),
        address: input.address.map(|s| s.trim().to_string()),
        date: input.date.as_deref().map(parse_inspection_date).transpose()?,
        responsible: input.responsible.map(|s| s.trim().to_string()),
        general_notes: input.general_notes,
    };
    apply(&state, id, InspectionCommand::UpdateDetails(patch)).await
}

/// PUT /api/v1/inspections/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<RecordResponse> {
    let status = InspectionStatus::parse(input.status.trim())?;
    apply(&state, id, InspectionCommand::SetStatus(status)).await
}

/// POST /api/v1/inspections/{id}/items
pub async fn add_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AddItemRequest>,
) -> AppResult<(StatusCode, RecordResponse)> {
    let item = NewChecklistItem {
        area: ChecklistArea::parse(input.area.trim())?,
        name: input.name.trim().to_string(),
        description: input.description.filter(|d| !d.trim().is_empty()),
        status: parse_item_status(input.status.as_deref())?.unwrap_or_default(),
        notes: input.notes,
    };
    let response = apply(&state, id, InspectionCommand::AddChecklistItem(item)).await?;
    Ok((StatusCode::CREATED, response))
}

/// PATCH /api/v1/inspections/{id}/items/{item_id}
pub async fn update_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateItemRequest>,
) -> AppResult<RecordResponse> {
    let command = InspectionCommand::UpdateChecklistItem {
        item_id,
        status: parse_item_status(input.status.as_deref())?,
        notes: input.notes,
    };
    apply(&state, id, command).await
}

/// GET /api/v1/inspections/{id}/items/{item_id}/photos
///
/// Photos linked to one checklist item, in the order they were added.
pub async fn item_photos(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Vec<Photo>>>> {
    let record = state.inspections.get(id).await?;
    if record.find_item(item_id).is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ChecklistItem",
            id: item_id,
        }));
    }
    let photos = linked_photos(&record, item_id).into_iter().cloned().collect();
    Ok(Json(DataResponse { data: photos }))
}

/// POST /api/v1/inspections/{id}/photos
pub async fn add_photo(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AddPhotoRequest>,
) -> AppResult<(StatusCode, RecordResponse)> {
    let photo = NewPhoto {
        caption: input.caption.trim().to_string(),
        image: input.image,
        location: input.location,
        taken_at: input.taken_at,
        item_id: input.item_id,
    };
    let response = apply(&state, id, InspectionCommand::AddPhoto(photo)).await?;
    Ok((StatusCode::CREATED, response))
}

/// GET /api/v1/inspections/{id}/comments
///
/// Newest first.
pub async fn list_comments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Comment>>>> {
    let record = state.inspections.get(id).await?;
    let comments = record.comments_newest_first().into_iter().cloned().collect();
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/inspections/{id}/comments
///
/// The author is the display name of the signed-in user.
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AddCommentRequest>,
) -> AppResult<(StatusCode, RecordResponse)> {
    let user = state
        .accounts
        .find_user(auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let comment = NewComment {
        author: user.display_name(),
        body: input.body,
    };
    let response = apply(&state, id, InspectionCommand::AddComment(comment)).await?;
    Ok((StatusCode::CREATED, response))
}
