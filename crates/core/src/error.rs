//! Error types for sheetview.

use sheetview_sheet::SheetError;
use thiserror::Error;

/// Result type for view operations.
pub type ViewResult<T> = Result<T, ViewError>;

/// Errors raised while turning a source into a workbook.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Every decode engine failed, or the bytes could not be read at all.
    #[error("Unreadable workbook '{label}': {cause}")]
    UnreadableWorkbook {
        label: String,
        #[source]
        cause: SheetError,
    },

    /// The "use default file" control was used but no path is configured,
    /// or nothing exists at it.
    #[error("No default workbook found")]
    MissingDefaultPath,

    /// Uploaded file name is not `.xls` or `.xlsx`.
    #[error("Unsupported file type: {name} (expected .xls or .xlsx)")]
    UnsupportedExtension { name: String },
}

/// Errors raised while deriving the view of a loaded workbook.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The session points at a sheet the workbook does not have.
    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    /// Sheet-level failure (projection, export).
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

impl LoadError {
    /// Wrap a sheet error raised while loading `label`.
    pub fn unreadable(label: impl Into<String>, cause: SheetError) -> Self {
        Self::UnreadableWorkbook {
            label: label.into(),
            cause,
        }
    }
}
