//! Shared query parameter types for API handlers.

use serde::Deserialize;
use vistoria_core::error::CoreError;
use vistoria_core::inspection::InspectionStatus;
use vistoria_core::search::InspectionFilter;

/// Status value meaning "no status filter", as sent by the list page.
const ALL_STATUSES: &str = "all";

/// `?q=&status=` on the inspection list and the summary report.
#[derive(Debug, Default, Deserialize)]
pub struct InspectionListParams {
    pub q: Option<String>,
    pub status: Option<String>,
}

impl InspectionListParams {
    /// Build the search filter. Unknown status values are rejected.
    pub fn to_filter(&self) -> Result<InspectionFilter, CoreError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") | Some(ALL_STATUSES) => None,
            Some(s) => Some(InspectionStatus::parse(s)?),
        };
        let query = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        Ok(InspectionFilter { query, status })
    }
}

/// `?limit=` on the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub limit: Option<usize>,
}
