use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET /summary      -> summary
/// GET /summary/pdf  -> summary_pdf
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(reports::summary))
        .route("/summary/pdf", get(reports::summary_pdf))
}
