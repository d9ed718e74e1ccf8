//! Memoized workbook loading.

use std::sync::Arc;

use sheetview_sheet::{Book, DecodeChain, SheetError};
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::source::{SourceKey, WorkbookSource};

/// Decodes workbook sources and remembers the most recent successful load.
///
/// Loading the same source again (same bytes, or same path) returns the
/// memoized book without decoding. Failures are never memoized.
#[derive(Debug, Default)]
pub struct WorkbookLoader {
    chain: DecodeChain,
    cached: Option<(SourceKey, Arc<Book>)>,
    decodes: usize,
}

impl WorkbookLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom engine order instead of auto-then-xls.
    #[must_use]
    pub fn with_chain(chain: DecodeChain) -> Self {
        Self {
            chain,
            ..Self::default()
        }
    }

    /// Load a workbook, decoding only when the source differs from the memoized one.
    pub fn load(&mut self, source: &WorkbookSource) -> Result<Arc<Book>, LoadError> {
        let key = source.key();
        if let Some((cached_key, book)) = &self.cached {
            if *cached_key == key {
                debug!(source = %source.label(), "workbook cache hit");
                return Ok(Arc::clone(book));
            }
        }

        let label = source.label();
        self.decodes += 1;
        let decoded = match source {
            WorkbookSource::Upload { data, .. } => self.chain.decode(data),
            WorkbookSource::Path(path) => std::fs::read(path)
                .map_err(SheetError::from)
                .and_then(|bytes| self.chain.decode(&bytes)),
        };

        match decoded {
            Ok(book) => {
                info!(source = %label, sheets = book.sheet_count(), "workbook loaded");
                let book = Arc::new(book);
                self.cached = Some((key, Arc::clone(&book)));
                Ok(book)
            }
            Err(err) => {
                warn!(source = %label, error = %err, "workbook could not be loaded");
                Err(LoadError::unreadable(label, err))
            }
        }
    }

    /// Forget the memoized book if it belongs to `source`. Returns whether anything was dropped.
    pub fn invalidate(&mut self, source: &WorkbookSource) -> bool {
        let key = source.key();
        if self.cached.as_ref().is_some_and(|(cached, _)| *cached == key) {
            self.cached = None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.cached = None;
    }

    /// Whether `source` would be served from memory.
    #[must_use]
    pub fn is_cached(&self, source: &WorkbookSource) -> bool {
        let key = source.key();
        self.cached.as_ref().is_some_and(|(cached, _)| *cached == key)
    }

    /// Number of real decode attempts made so far.
    #[must_use]
    pub fn decode_count(&self) -> usize {
        self.decodes
    }
}
