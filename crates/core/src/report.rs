//! Report composition logic that does not depend on any rendering backend.
//!
//! - [`ReportSummary`] -- approved/rejected/total counters of one record.
//! - [`linked_photos`] -- photos documenting one checklist item.
//! - [`report_filename`] -- download name of an individual report.
//! - [`paginate`] -- slicing of a tall rendered sheet into pages.

use serde::Serialize;

use crate::error::CoreError;
use crate::inspection::{ChecklistStatus, InspectionRecord, Photo};
use crate::types::DbId;

/// A4 portrait width in millimetres.
pub const A4_WIDTH_MM: f64 = 210.0;

/// A4 portrait height in millimetres.
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Download name used for reports covering several inspections.
pub const SUMMARY_REPORT_FILENAME: &str = "relatorio_vistorias.pdf";

/// Fallback when a project has no usable name.
const UNNAMED_REPORT_FILENAME: &str = "relatorio_vistoria.pdf";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub approved: usize,
    pub rejected: usize,
    pub pending: usize,
    pub total: usize,
}

impl ReportSummary {
    /// Count items across the three checklist areas of `record`.
    pub fn for_record(record: &InspectionRecord) -> Self {
        let mut summary = Self::default();
        for (_, item) in record.tagged_items() {
            summary.total += 1;
            match item.status {
                ChecklistStatus::Approved => summary.approved += 1,
                ChecklistStatus::Rejected => summary.rejected += 1,
                ChecklistStatus::Pending => summary.pending += 1,
            }
        }
        summary
    }
}

/// Photos whose back-reference points at `item_id`.
///
/// A photo referencing an item that does not exist simply never matches.
pub fn linked_photos(record: &InspectionRecord, item_id: DbId) -> Vec<&Photo> {
    record
        .photos
        .iter()
        .filter(|p| p.item_id == Some(item_id))
        .collect()
}

/// `Obra Residencial #1` -> `Obra_Residencial_#1.pdf`.
///
/// Each run of whitespace becomes a single underscore.
pub fn report_filename(project_name: &str) -> String {
    let stem = project_name.split_whitespace().collect::<Vec<_>>().join("_");
    if stem.is_empty() {
        return UNNAMED_REPORT_FILENAME.to_string();
    }
    format!("{stem}.pdf")
}

/// Placement of the rendered sheet on one physical page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSlice {
    /// Zero-based page number.
    pub index: usize,
    /// Vertical offset of the top of the sheet relative to the top of the
    /// page, in the same unit as the heights given to [`paginate`]. Zero on
    /// the first page, then decreasing by one page height per page.
    pub offset: f64,
}

/// Slice a sheet of `content_height` into pages of `page_height`.
///
/// The first page shows the sheet at offset 0. While the height still left
/// after the pages placed so far is non-negative, another page is appended
/// with the sheet shifted up by one more page height. Content is never
/// cropped; a sheet whose height is an exact multiple of the page height
/// ends with an empty page.
pub fn paginate(content_height: f64, page_height: f64) -> Result<Vec<PageSlice>, CoreError> {
    if !page_height.is_finite() || page_height <= 0.0 {
        return Err(CoreError::validation(format!(
            "Page height must be positive, got {page_height}"
        )));
    }
    if !content_height.is_finite() || content_height <= 0.0 {
        return Err(CoreError::validation(format!(
            "Content height must be positive, got {content_height}"
        )));
    }

    let mut pages = vec![PageSlice {
        index: 0,
        offset: 0.0,
    }];
    let mut offset = 0.0;
    let mut height_left = content_height - page_height;
    while height_left >= 0.0 {
        offset -= page_height;
        pages.push(PageSlice {
            index: pages.len(),
            offset,
        });
        height_left -= page_height;
    }
    Ok(pages)
}
