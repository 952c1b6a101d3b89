//! PDF export of inspection reports.
//!
//! A report is first laid out on one [`sheet::Sheet`] as wide as an A4 page
//! and as tall as its content, then [`pdf::render_sheet`] slices the sheet
//! into A4 pages using [`vistoria_core::report::paginate`].
//!
//! Rendering is synchronous and CPU-bound; async callers should run it on a
//! blocking thread.

pub mod error;
pub mod inspection;
pub mod pdf;
pub mod sheet;
pub mod summary;
pub mod text;

pub use error::ExportError;
pub use inspection::{compose_inspection_sheet, render_inspection_pdf};
pub use summary::{compose_summary_sheet, render_summary_pdf};
