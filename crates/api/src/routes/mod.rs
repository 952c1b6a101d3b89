pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod inspections;
pub mod reports;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                                    login (public)
/// /auth/refresh                                  refresh (public)
/// /auth/logout                                   logout
/// /auth/me                                       current profile
///
/// /dashboard                                     status counters + recent
///
/// /inspections                                   list/search, create
/// /inspections/{id}                              get, update details
/// /inspections/{id}/status                       set status (PUT)
/// /inspections/{id}/items                        add item (POST)
/// /inspections/{id}/items/{item_id}              update item (PATCH)
/// /inspections/{id}/items/{item_id}/photos       linked photos
/// /inspections/{id}/photos                       add photo (POST)
/// /inspections/{id}/comments                     list, add
/// /inspections/{id}/report                       report JSON
/// /inspections/{id}/report/pdf                   report PDF
///
/// /reports/summary                               distributions + totals
/// /reports/summary/pdf                           summary PDF
///
/// /admin/users                                   list, create (admin only)
/// /admin/users/{id}/role                         change role (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/dashboard", dashboard::router())
        .nest("/inspections", inspections::router())
        .nest("/reports", reports::router())
        .nest("/admin", admin::router())
}
