//! Route definitions for the `/inspections` resource.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::{inspections, reports};
use crate::state::AppState;

/// Routes mounted at `/inspections`.
///
/// ```text
/// GET   /                               -> list_inspections
/// POST  /                               -> create_inspection
/// GET   /{id}                           -> get_inspection
/// PUT   /{id}                           -> update_inspection
/// PUT   /{id}/status                    -> set_status
/// POST  /{id}/items                     -> add_item
/// PATCH /{id}/items/{item_id}           -> update_item
/// GET   /{id}/items/{item_id}/photos    -> item_photos
/// POST  /{id}/photos                    -> add_photo
/// GET   /{id}/comments                  -> list_comments
/// POST  /{id}/comments                  -> add_comment
/// GET   /{id}/report                    -> inspection_report
/// GET   /{id}/report/pdf                -> inspection_report_pdf
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(inspections::list_inspections).post(inspections::create_inspection),
        )
        .route(
            "/{id}",
            get(inspections::get_inspection).put(inspections::update_inspection),
        )
        .route("/{id}/status", put(inspections::set_status))
        .route("/{id}/items", post(inspections::add_item))
        .route("/{id}/items/{item_id}", patch(inspections::update_item))
        .route("/{id}/items/{item_id}/photos", get(inspections::item_photos))
        .route("/{id}/photos", post(inspections::add_photo))
        .route(
            "/{id}/comments",
            get(inspections::list_comments).post(inspections::add_comment),
        )
        .route("/{id}/report", get(reports::inspection_report))
        .route("/{id}/report/pdf", get(reports::inspection_report_pdf))
}
