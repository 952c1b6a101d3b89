//! Handler for the dashboard: status counters and recent inspections.

use axum::extract::{Query, State};
use axum::Json;
use vistoria_core::aggregation::{dashboard_stats, DashboardStats, DEFAULT_RECENT_LIMIT};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::query::DashboardParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound for `?limit=`.
const MAX_RECENT_LIMIT: usize = 50;

/// GET /api/v1/dashboard?limit=
pub async fn get_dashboard(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_RECENT_LIMIT);
    let records = state.inspections.list().await?;
    Ok(Json(DataResponse {
        data: dashboard_stats(&records, limit),
    }))
}
