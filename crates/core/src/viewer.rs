//! The stateful viewer: owns the source, the memoizing loader and the session.

use std::path::PathBuf;
use std::sync::Arc;

use sheetview_sheet::Book;
use tracing::{debug, info, warn};

use crate::error::{LoadError, ViewResult};
use crate::export::{csv_download, CsvDownload};
use crate::loader::WorkbookLoader;
use crate::messages::Locale;
use crate::render::{render_localized, selected_display, Notice, NoticeLevel, RenderedView};
use crate::session::{SessionState, ViewEvent};
use crate::source::WorkbookSource;

/// Fallback path tried by the "use default file" control.
pub const DEFAULT_WORKBOOK_PATH: &str = "/mnt/data/workbook.xls";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// `None` disables the default file.
    pub default_path: Option<PathBuf>,
    pub locale: Locale,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_path: Some(PathBuf::from(DEFAULT_WORKBOOK_PATH)),
            locale: Locale::default(),
        }
    }
}

/// An interaction that changes where the workbook comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    Upload { name: String, data: Vec<u8> },
    UseDefaultFile,
    /// Drop the memoized load of the current source and read it again.
    Reload,
}

#[derive(Debug, Default)]
pub struct Viewer {
    config: ViewerConfig,
    loader: WorkbookLoader,
    source: Option<WorkbookSource>,
    book: Option<Arc<Book>>,
    state: SessionState,
    source_notices: Vec<Notice>,
}

impl Viewer {
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn book(&self) -> Option<&Book> {
        self.book.as_deref()
    }

    #[must_use]
    pub fn source(&self) -> Option<&WorkbookSource> {
        self.source.as_ref()
    }

    #[must_use]
    pub fn loader(&self) -> &WorkbookLoader {
        &self.loader
    }

    /// Apply a source event. Failures are also recorded as sidebar notices,
    /// so callers may ignore the returned error.
    pub fn handle_source(&mut self, event: SourceEvent) -> Result<(), LoadError> {
        let messages = self.config.locale.messages();
        match event {
            SourceEvent::Upload { name, data } => {
                let source = match WorkbookSource::upload(name, data) {
                    Ok(source) => source,
                    Err(err) => {
                        warn!(error = %err, "upload rejected");
                        if let LoadError::UnsupportedExtension { name } = &err {
                            self.source_notices = vec![Notice::new(
                                NoticeLevel::Error,
                                messages.unsupported_extension(name),
                            )];
                        }
                        return Err(err);
                    }
                };
                let ack = Notice::new(NoticeLevel::Success, messages.uploaded(&source.label()));
                self.open(source, ack)
            }
            SourceEvent::UseDefaultFile => {
                let Some(path) = self.config.default_path.clone().filter(|p| p.exists()) else {
                    warn!(path = ?self.config.default_path, "default workbook not found");
                    self.source_notices =
                        vec![Notice::new(NoticeLevel::Warning, messages.missing_default_path)];
                    return Err(LoadError::MissingDefaultPath);
                };
                let source = WorkbookSource::path(path);
                let ack = Notice::new(NoticeLevel::Info, messages.opened_default(&source.label()));
                self.open(source, ack)
            }
            SourceEvent::Reload => {
                let Some(source) = self.source.clone() else {
                    debug!("reload without a source");
                    return Ok(());
                };
                let invalidated = self.loader.invalidate(&source);
                info!(source = %source.label(), invalidated, "reloading workbook");
                let ack = self.source_notices.first().cloned();
                match self.loader.load(&source) {
                    Ok(book) => {
                        self.book = Some(book);
                        self.source_notices = ack.into_iter().collect();
                        Ok(())
                    }
                    Err(err) => {
                        self.fail(err.to_string());
                        Err(err)
                    }
                }
            }
        }
    }

    fn open(&mut self, source: WorkbookSource, ack: Notice) -> Result<(), LoadError> {
        if self.source.as_ref().map(WorkbookSource::key) != Some(source.key()) {
            debug!(source = %source.label(), "new source, resetting session");
            self.state = SessionState::default();
        }

        match self.loader.load(&source) {
            Ok(book) => {
                self.source = Some(source);
                self.book = Some(book);
                self.source_notices = vec![ack];
                Ok(())
            }
            Err(err) => {
                self.fail(err.to_string());
                Err(err)
            }
        }
    }

    fn fail(&mut self, detail: String) {
        let messages = self.config.locale.messages();
        self.source = None;
        self.book = None;
        self.state = SessionState::default();
        self.source_notices = vec![
            Notice::new(NoticeLevel::Error, messages.unreadable_workbook),
            Notice::new(NoticeLevel::Error, detail),
        ];
    }

    /// Apply a view event and render.
    pub fn handle_view(&mut self, event: ViewEvent) -> RenderedView {
        self.render(Some(event))
    }

    /// Render the current state.
    pub fn page(&mut self) -> RenderedView {
        self.render(None)
    }

    fn render(&mut self, event: Option<ViewEvent>) -> RenderedView {
        let state = std::mem::take(&mut self.state);
        let (mut view, state) =
            render_localized(self.config.locale, self.book.as_deref(), state, event);
        self.state = state;

        view.sidebar = if self.source_notices.is_empty() && self.source.is_none() {
            vec![Notice::new(
                NoticeLevel::Info,
                self.config.locale.messages().no_upload_hint,
            )]
        } else {
            self.source_notices.clone()
        };
        view
    }

    /// CSV of the rows currently on screen, or `None` when no sheet is selected.
    pub fn download(&self) -> ViewResult<Option<CsvDownload>> {
        let Some(book) = self.book.as_deref() else {
            return Ok(None);
        };
        let Some((sheet, display)) = selected_display(book, &self.state)? else {
            return Ok(None);
        };
        Ok(Some(csv_download(sheet.name(), &display)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Body;
    use rust_xlsxwriter::Workbook;

    fn xlsx_bytes() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let plan = workbook.add_worksheet();
        plan.set_name("Plan").unwrap();
        plan.write_string(0, 0, "Task").unwrap();
        plan.write_string(1, 0, "Survey").unwrap();
        let budget = workbook.add_worksheet();
        budget.set_name("Budget").unwrap();
        budget.write_string(0, 0, "Item").unwrap();
        budget.write_string(1, 0, "Travel").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    fn upload(viewer: &mut Viewer, name: &str, data: Vec<u8>) -> Result<(), LoadError> {
        viewer.handle_source(SourceEvent::Upload {
            name: name.into(),
            data,
        })
    }

    #[test]
    fn test_idle_page_shows_upload_hint() {
        let mut viewer = Viewer::default();
        let view = viewer.page();
        assert!(matches!(view.body, Body::Idle { .. }));
        assert_eq!(view.sidebar[0].text, Locale::En.messages().no_upload_hint);
    }

    #[test]
    fn test_upload_acknowledged() {
        let mut viewer = Viewer::default();
        upload(&mut viewer, "plan.xlsx", xlsx_bytes()).unwrap();
        let view = viewer.page();
        assert_eq!(view.sidebar[0].text, "File uploaded: plan.xlsx");
        assert_eq!(view.sidebar[0].level, NoticeLevel::Success);
        assert_eq!(
            view.selector().unwrap().labels().collect::<Vec<_>>(),
            ["Plan", "Budget"]
        );
    }

    #[test]
    fn test_unsupported_upload_keeps_current_workbook() {
        let mut viewer = Viewer::default();
        upload(&mut viewer, "plan.xlsx", xlsx_bytes()).unwrap();
        let err = upload(&mut viewer, "notes.txt", b"hello".to_vec()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension { .. }));
        assert!(viewer.book().is_some());
        assert_eq!(viewer.page().sidebar[0].level, NoticeLevel::Error);
    }

    #[test]
    fn test_missing_default_path_is_a_warning() {
        let mut viewer = Viewer::new(ViewerConfig {
            default_path: None,
            locale: Locale::En,
        });
        let err = viewer.handle_source(SourceEvent::UseDefaultFile).unwrap_err();
        assert!(matches!(err, LoadError::MissingDefaultPath));
        let view = viewer.page();
        assert_eq!(view.sidebar[0].level, NoticeLevel::Warning);
        assert!(matches!(view.body, Body::Idle { .. }));
    }

    #[test]
    fn test_default_path_is_opened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workbook.xlsx");
        std::fs::write(&path, xlsx_bytes()).unwrap();

        let mut viewer = Viewer::new(ViewerConfig {
            default_path: Some(path.clone()),
            locale: Locale::En,
        });
        viewer.handle_source(SourceEvent::UseDefaultFile).unwrap();
        let view = viewer.page();
        assert_eq!(
            view.sidebar[0].text,
            format!("Opened file from: {}", path.display())
        );
        assert_eq!(viewer.book().unwrap().sheet_count(), 2);
    }

    #[test]
    fn test_new_source_resets_session() {
        let mut viewer = Viewer::default();
        upload(&mut viewer, "plan.xlsx", xlsx_bytes()).unwrap();
        viewer.handle_view(ViewEvent::SelectSheet {
            name: "Budget".into(),
        });
        viewer.handle_view(ViewEvent::SetSearch {
            text: "travel".into(),
        });

        // Same bytes under another name keep the session.
        upload(&mut viewer, "copy.xlsx", xlsx_bytes()).unwrap();
        assert_eq!(viewer.state().search_text, "travel");
        assert_eq!(viewer.loader().decode_count(), 1);

        let mut other = Workbook::new();
        other.add_worksheet().write_string(0, 0, "X").unwrap();
        upload(&mut viewer, "other.xlsx", other.save_to_buffer().unwrap()).unwrap();
        assert_eq!(viewer.state(), &SessionState::default());
    }

    #[test]
    fn test_reload_re_reads_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workbook.xlsx");
        std::fs::write(&path, xlsx_bytes()).unwrap();
        let mut viewer = Viewer::new(ViewerConfig {
            default_path: Some(path.clone()),
            locale: Locale::En,
        });
        viewer.handle_source(SourceEvent::UseDefaultFile).unwrap();
        viewer.handle_view(ViewEvent::SelectSheet { name: "Plan".into() });

        let mut changed = Workbook::new();
        changed
            .add_worksheet()
            .set_name("Summary")
            .unwrap()
            .write_string(0, 0, "Total")
            .unwrap();
        changed.save(&path).unwrap();

        viewer.handle_source(SourceEvent::Reload).unwrap();
        assert_eq!(viewer.loader().decode_count(), 2);
        assert_eq!(viewer.book().unwrap().sheet_names(), ["Summary"]);

        let view = viewer.page();
        assert!(view.panel().is_none());
        assert_eq!(view.notices[0].text, "Sheet not found: Plan");
        assert_eq!(viewer.state().selected_sheet, None);
    }

    #[test]
    fn test_download_requires_selection() {
        let mut viewer = Viewer::default();
        assert_eq!(viewer.download().unwrap(), None);
        upload(&mut viewer, "plan.xlsx", xlsx_bytes()).unwrap();
        assert_eq!(viewer.download().unwrap(), None);

        viewer.handle_view(ViewEvent::SelectSheet { name: "Plan".into() });
        let download = viewer.download().unwrap().unwrap();
        assert_eq!(download.file_name, "Plan.csv");
        assert_eq!(download.bytes, b"\xEF\xBB\xBFTask\nSurvey\n");
    }
}
