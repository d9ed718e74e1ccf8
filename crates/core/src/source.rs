//! Where a workbook comes from.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::LoadError;

/// File extensions the upload control accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["xls", "xlsx"];

/// A byte-bearing workbook source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbookSource {
    /// Bytes uploaded by the user, with the client-side file name.
    Upload { name: String, data: Arc<[u8]> },
    /// A workbook on the local filesystem.
    Path(PathBuf),
}

/// Identity used for memoization: uploads by content, paths by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Content(Arc<[u8]>),
    Path(PathBuf),
}

impl WorkbookSource {
    /// Build an upload source, rejecting names without an accepted extension.
    pub fn upload(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Result<Self, LoadError> {
        let name = name.into();
        if !has_accepted_extension(&name) {
            return Err(LoadError::UnsupportedExtension { name });
        }
        Ok(Self::Upload {
            name,
            data: data.into(),
        })
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Human-readable name: the uploaded file name or the path.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Upload { name, .. } => name.clone(),
            Self::Path(path) => path.display().to_string(),
        }
    }

    #[must_use]
    pub fn key(&self) -> SourceKey {
        match self {
            Self::Upload { data, .. } => SourceKey::Content(Arc::clone(data)),
            Self::Path(path) => SourceKey::Path(path.clone()),
        }
    }
}

fn has_accepted_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}
