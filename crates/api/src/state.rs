use std::sync::Arc;

use vistoria_db::store::{AccountStore, InspectionStore};

use crate::config::ServerConfig;
use crate::export::ExportTracker;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Inspection records (Postgres or in-memory).
    pub inspections: Arc<dyn InspectionStore>,
    /// Users and refresh-token sessions.
    pub accounts: Arc<dyn AccountStore>,
    pub config: Arc<ServerConfig>,
    /// PDF exports currently being rendered.
    pub exports: ExportTracker,
}
