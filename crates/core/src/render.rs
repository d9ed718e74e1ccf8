//! Pure rendering of a workbook and session state into a view model.
//!
//! [`render`] never touches the filesystem or the loader: it takes the loaded
//! workbook (if any), the current [`SessionState`] and at most one
//! [`ViewEvent`], and returns what to show plus the next state.

use serde::Serialize;
use sheetview_sheet::{Book, Sheet};
use tracing::{debug, warn};

use crate::error::{ViewError, ViewResult};
use crate::export::download_file_name;
use crate::messages::{Locale, Messages};
use crate::session::{SessionState, ViewEvent};
use crate::summary::describe;
use crate::table::display_dataset;

/// Sheet buttons per selector row.
pub const BUTTONS_PER_ROW: usize = 3;

/// Everything the page shows for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedView {
    pub locale: Locale,
    pub title: String,
    pub header: String,
    pub intro: Vec<String>,
    /// Source acknowledgements shown in the sidebar. Filled by the viewer.
    pub sidebar: Vec<Notice>,
    pub notices: Vec<Notice>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Body {
    /// No workbook is loaded.
    Idle { prompt: String },
    Workbook(WorkbookView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkbookView {
    pub selector: SheetSelector,
    /// Shown until a sheet is selected.
    pub prompt: Option<String>,
    pub panel: Option<SheetPanel>,
}

/// One button per sheet, in workbook order, grouped into rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSelector {
    pub heading: String,
    pub rows: Vec<Vec<SheetButton>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetButton {
    /// Stable control key, `btn_<index>`.
    pub key: String,
    pub label: String,
    pub active: bool,
}

/// The selected sheet's table, controls and derived panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetPanel {
    pub name: String,
    pub heading: String,
    pub total_rows: usize,
    pub available_columns: Vec<String>,
    pub chosen_columns: Vec<String>,
    pub search_text: String,
    pub search_result: Option<String>,
    pub full_sheet: Option<TableView>,
    pub table: TableView,
    pub show_stats: bool,
    pub summary: Option<SummaryView>,
    pub download_name: String,
}

/// A table with every cell already turned into display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SummaryView {
    Table(TableView),
    Notice(String),
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

impl SheetSelector {
    fn new(messages: &Messages, book: &Book, selected: Option<&str>) -> Self {
        let buttons: Vec<SheetButton> = book
            .sheet_names()
            .into_iter()
            .enumerate()
            .map(|(i, name)| SheetButton {
                key: format!("btn_{i}"),
                label: name.to_string(),
                active: selected == Some(name),
            })
            .collect();

        Self {
            heading: messages.sheets_heading.to_string(),
            rows: buttons
                .chunks(BUTTONS_PER_ROW)
                .map(<[SheetButton]>::to_vec)
                .collect(),
        }
    }

    /// Button labels in display order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(|button| button.label.as_str())
    }
}

impl From<&Sheet> for TableView {
    fn from(sheet: &Sheet) -> Self {
        Self {
            columns: sheet.columns().to_vec(),
            rows: sheet
                .rows()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        }
    }
}

impl RenderedView {
    fn frame(locale: Locale, body: Body) -> Self {
        let messages = locale.messages();
        Self {
            locale,
            title: messages.page_title.to_string(),
            header: messages.header.to_string(),
            intro: messages.intro.iter().map(ToString::to_string).collect(),
            sidebar: Vec::new(),
            notices: Vec::new(),
            body,
        }
    }

    /// The sheet panel, when a sheet is shown.
    #[must_use]
    pub fn panel(&self) -> Option<&SheetPanel> {
        match &self.body {
            Body::Workbook(workbook) => workbook.panel.as_ref(),
            Body::Idle { .. } => None,
        }
    }

    #[must_use]
    pub fn selector(&self) -> Option<&SheetSelector> {
        match &self.body {
            Body::Workbook(workbook) => Some(&workbook.selector),
            Body::Idle { .. } => None,
        }
    }
}

/// Render with the default locale.
#[must_use]
pub fn render(
    book: Option<&Book>,
    state: SessionState,
    event: Option<ViewEvent>,
) -> (RenderedView, SessionState) {
    render_localized(Locale::default(), book, state, event)
}

/// Fold `event` into `state`, then describe the page for `book`.
///
/// Selecting a sheet the workbook does not have is rejected and leaves the
/// state unchanged. A saved selection that no longer exists is cleared.
#[must_use]
pub fn render_localized(
    locale: Locale,
    book: Option<&Book>,
    mut state: SessionState,
    event: Option<ViewEvent>,
) -> (RenderedView, SessionState) {
    let messages = locale.messages();
    let Some(book) = book else {
        let body = Body::Idle {
            prompt: messages.idle_prompt.to_string(),
        };
        return (RenderedView::frame(locale, body), state);
    };

    let mut notices = Vec::new();
    match event {
        Some(ViewEvent::SelectSheet { name }) if !book.has_sheet(&name) => {
            warn!(sheet = %name, "rejected selection of unknown sheet");
            notices.push(Notice::new(NoticeLevel::Error, messages.sheet_not_found(&name)));
        }
        Some(event) => {
            debug!(?event, "applying view event");
            state.apply(event);
        }
        None => {}
    }

    let panel = match sheet_panel(messages, book, &state) {
        Ok(panel) => panel,
        Err(err) => {
            warn!(error = %err, "selected sheet cannot be shown");
            let text = match &err {
                ViewError::SheetNotFound { name } => messages.sheet_not_found(name),
                ViewError::Sheet(inner) => inner.to_string(),
            };
            notices.push(Notice::new(NoticeLevel::Error, text));
            state.selected_sheet = None;
            None
        }
    };

    let workbook = WorkbookView {
        selector: SheetSelector::new(messages, book, state.selected_sheet.as_deref()),
        prompt: panel
            .is_none()
            .then(|| messages.pick_sheet_prompt.to_string()),
        panel,
    };

    let mut view = RenderedView::frame(locale, Body::Workbook(workbook));
    view.notices = notices;
    (view, state)
}

/// The selected sheet and its display dataset, or `None` when nothing is selected.
pub(crate) fn selected_display<'a>(
    book: &'a Book,
    state: &SessionState,
) -> ViewResult<Option<(&'a Sheet, Sheet)>> {
    let Some(name) = state.selected_sheet.as_deref() else {
        return Ok(None);
    };
    let sheet = book
        .get_sheet(name)
        .map_err(|_| ViewError::SheetNotFound {
            name: name.to_string(),
        })?;
    let display = display_dataset(sheet, &state.columns_for(sheet), &state.search_text)?;
    Ok(Some((sheet, display)))
}

fn sheet_panel(
    messages: &Messages,
    book: &Book,
    state: &SessionState,
) -> ViewResult<Option<SheetPanel>> {
    let Some((sheet, display)) = selected_display(book, state)? else {
        return Ok(None);
    };

    let summary = state.show_stats.then(|| match describe(&display).to_sheet() {
        Some(table) => SummaryView::Table(TableView::from(&table)),
        None => SummaryView::Notice(messages.no_numeric_data.to_string()),
    });

    Ok(Some(SheetPanel {
        name: sheet.name().to_string(),
        heading: messages.sheet_heading(sheet.name(), sheet.row_count()),
        total_rows: sheet.row_count(),
        available_columns: sheet.columns().to_vec(),
        chosen_columns: display.columns().to_vec(),
        search_text: state.search_text.clone(),
        search_result: (!state.search_text.is_empty())
            .then(|| messages.search_result(display.row_count())),
        full_sheet: state.show_full.then(|| TableView::from(sheet)),
        table: TableView::from(&display),
        show_stats: state.show_stats,
        summary,
        download_name: download_file_name(sheet.name()),
    }))
}

impl SummaryView {
    /// True when there was no numeric data to summarize.
    #[must_use]
    pub fn is_notice(&self) -> bool {
        matches!(self, SummaryView::Notice(_))
    }
}
