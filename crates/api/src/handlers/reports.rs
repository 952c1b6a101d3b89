//! Report endpoints: JSON summaries and PDF downloads.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use vistoria_core::aggregation::{summarize, InspectionSummary};
use vistoria_core::inspection::{ChecklistArea, ChecklistItem, InspectionRecord, Photo};
use vistoria_core::report::{linked_photos, report_filename, ReportSummary, SUMMARY_REPORT_FILENAME};
use vistoria_core::types::DbId;
use vistoria_report::{render_inspection_pdf, render_summary_pdf};

use crate::error::AppResult;
use crate::export::{pdf_response, render_exclusive};
use crate::middleware::auth::AuthUser;
use crate::query::InspectionListParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ReportItem {
    #[serde(flatten)]
    pub item: ChecklistItem,
    pub photos: Vec<Photo>,
}

#[derive(Debug, Serialize)]
pub struct ReportArea {
    pub area: ChecklistArea,
    pub label: &'static str,
    pub items: Vec<ReportItem>,
}

/// Everything the individual report page shows.
#[derive(Debug, Serialize)]
pub struct InspectionReport {
    pub inspection: InspectionRecord,
    pub summary: ReportSummary,
    pub areas: Vec<ReportArea>,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    #[serde(flatten)]
    pub summary: InspectionSummary,
    pub filename: &'static str,
}

fn build_inspection_report(record: InspectionRecord) -> InspectionReport {
    let areas = ChecklistArea::ALL
        .into_iter()
        .map(|area| ReportArea {
            area,
            label: area.label(),
            items: record
                .items(area)
                .iter()
                .map(|item| ReportItem {
                    item: item.clone(),
                    photos: linked_photos(&record, item.id).into_iter().cloned().collect(),
                })
                .collect(),
        })
        .collect();

    InspectionReport {
        summary: ReportSummary::for_record(&record),
        filename: report_filename(&record.project_name),
        areas,
        inspection: record,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/inspections/{id}/report
pub async fn inspection_report(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<InspectionReport>>> {
    let record = state.inspections.get(id).await?;
    Ok(Json(DataResponse {
        data: build_inspection_report(record),
    }))
}

/// GET /api/v1/inspections/{id}/report/pdf
///
/// 409 while another export of the same inspection is still rendering.
pub async fn inspection_report_pdf(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let record = state.inspections.get(id).await?;
    let filename = report_filename(&record.project_name);
    tracing::info!(inspection_id = id, user_id = auth.user_id, "Exporting inspection report");

    let key = format!("inspection:{id}");
    let bytes = render_exclusive(&state.exports, &key, move || render_inspection_pdf(&record)).await?;
    Ok(pdf_response(&filename, bytes))
}

/// GET /api/v1/reports/summary?q=&status=
///
/// Distributions and totals over the (optionally filtered) inspections.
pub async fn summary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<InspectionListParams>,
) -> AppResult<Json<DataResponse<SummaryReport>>> {
    let filter = params.to_filter()?;
    let records = filter.apply(state.inspections.list().await?);
    Ok(Json(DataResponse {
        data: SummaryReport {
            summary: summarize(&records),
            filename: SUMMARY_REPORT_FILENAME,
        },
    }))
}

/// GET /api/v1/reports/summary/pdf?q=&status=
pub async fn summary_pdf(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<InspectionListParams>,
) -> AppResult<Response> {
    let filter = params.to_filter()?;
    let records = filter.apply(state.inspections.list().await?);
    tracing::info!(
        user_id = auth.user_id,
        inspections = records.len(),
        "Exporting summary report"
    );

    let bytes = render_exclusive(&state.exports, "summary", move || {
        render_summary_pdf(&records)
    })
    .await?;
    Ok(pdf_response(SUMMARY_REPORT_FILENAME, bytes))
}

#[cfg(test)]
mod tests {
    use vistoria_core::sample::sample_inspections;

    use super::*;

    #[test]
    fn report_groups_items_by_area_with_their_photos() {
        let report = build_inspection_report(sample_inspections().remove(1));

        assert_eq!(report.filename, "Edifício_Comercial_Central.pdf");
        assert_eq!(report.summary.rejected, 1);
        assert_eq!(report.areas.len(), 3);

        let plumbing = &report.areas[1];
        assert_eq!(plumbing.label, "Hidráulica");
        assert_eq!(plumbing.items[0].photos.len(), 1);
        assert!(report.areas[0].items[0].photos.is_empty());
    }
}
