//! PDF export plumbing shared by the report handlers.
//!
//! Rendering is CPU-bound and runs on the blocking pool. While a report is
//! being rendered its key is held in [`ExportTracker`]; a second request for
//! the same report is refused with [`ExportError::InProgress`] instead of
//! being queued. The key is released when rendering finishes, even if the
//! client has already gone away.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use vistoria_report::ExportError;

use crate::error::{AppError, AppResult};

/// Keys of the exports currently in flight.
#[derive(Debug, Clone, Default)]
pub struct ExportTracker {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl ExportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // The set stays consistent even if a holder panicked.
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mark `key` as in flight, or fail if it already is.
    pub fn begin(&self, key: &str) -> Result<ExportTicket, ExportError> {
        if !self.lock().insert(key.to_string()) {
            return Err(ExportError::InProgress(key.to_string()));
        }
        Ok(ExportTicket {
            tracker: self.clone(),
            key: key.to_string(),
        })
    }
}

/// Releases its key when dropped.
#[derive(Debug)]
pub struct ExportTicket {
    tracker: ExportTracker,
    key: String,
}

impl Drop for ExportTicket {
    fn drop(&mut self) {
        self.tracker.lock().remove(&self.key);
    }
}

/// Run `render` on the blocking pool while holding the export slot for `key`.
pub async fn render_exclusive<F>(tracker: &ExportTracker, key: &str, render: F) -> AppResult<Vec<u8>>
where
    F: FnOnce() -> Result<Vec<u8>, ExportError> + Send + 'static,
{
    let ticket = tracker.begin(key)?;
    let started = std::time::Instant::now();
    let key_owned = key.to_string();

    let bytes = tokio::task::spawn_blocking(move || {
        let result = render();
        drop(ticket);
        result
    })
    .await
    .map_err(|e| AppError::InternalError(format!("PDF render task failed: {e}")))??;

    tracing::info!(
        export = %key_owned,
        bytes = bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Report exported"
    );
    Ok(bytes)
}

/// `Content-Disposition` value for `filename`.
///
/// Header values must be ASCII, so non-ASCII characters become `_` in the
/// plain `filename` and the exact name is carried in `filename*` (RFC 6266).
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if fallback == filename {
        return format!("attachment; filename=\"{filename}\"");
    }

    let mut encoded = String::new();
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

/// `200 application/pdf` with an attachment disposition.
pub fn pdf_response(filename: &str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (CONTENT_DISPOSITION, content_disposition(filename)),
        ],
        bytes,
    )
        .into_response()
}
