use vistoria_core::error::CoreError;

/// Why a report could not be exported. No bytes are produced in any case.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Nothing was laid out for the requested report.
    #[error("Report region is missing: {0}")]
    RegionMissing(String),

    /// Another export of the same report has not finished yet.
    #[error("An export of {0} is already in progress")]
    InProgress(String),

    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}

impl From<lopdf::Error> for ExportError {
    fn from(err: lopdf::Error) -> Self {
        Self::Pdf(err.to_string())
    }
}

impl From<CoreError> for ExportError {
    fn from(err: CoreError) -> Self {
        Self::Pdf(format!("pagination failed: {err}"))
    }
}
