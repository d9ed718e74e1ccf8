//! # sheetview-core
//!
//! Interactive workbook viewing on top of `sheetview-sheet`.
//!
//! This crate provides:
//! - Workbook sources and a memoizing loader
//! - Session state and view events
//! - Column projection, search, summary statistics and CSV export
//! - A pure render step and the stateful [`Viewer`]
//! - Localized messages

/// Error types and result aliases.
pub mod error;
/// CSV download of the rows on screen.
pub mod export;
pub mod loader;
/// User-facing text.
pub mod messages;
pub mod render;
pub mod session;
pub mod source;
/// Descriptive statistics.
pub mod summary;
pub mod table;
pub mod viewer;

pub use error::{LoadError, ViewError, ViewResult};
pub use export::{csv_download, export_csv, CsvDownload, CSV_CONTENT_TYPE};
pub use loader::WorkbookLoader;
pub use messages::{Locale, Messages};
pub use render::{render, render_localized, Body, Notice, NoticeLevel, RenderedView, SheetPanel};
pub use session::{SessionState, ViewEvent};
pub use source::{SourceKey, WorkbookSource};
pub use summary::{describe, ColumnStats, Summary};
pub use table::display_dataset;
pub use viewer::{SourceEvent, Viewer, ViewerConfig, DEFAULT_WORKBOOK_PATH};
