//! Per-session view state carried between renders.

use serde::{Deserialize, Serialize};
use sheetview_sheet::Sheet;

/// Everything the page remembers between interactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Sheet set by the most recently activated selector button.
    pub selected_sheet: Option<String>,
    /// Columns picked in the multi-select, in pick order. `None` means all columns.
    pub chosen_columns: Option<Vec<String>>,
    /// Case-insensitive search text; empty disables filtering.
    pub search_text: String,
    /// Whether the statistics checkbox is ticked.
    pub show_stats: bool,
    /// Whether the full, unfiltered sheet is shown above the table.
    pub show_full: bool,
}

/// A user interaction that only touches session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    /// A sheet selector button was activated.
    SelectSheet { name: String },
    /// The column multi-select changed.
    SetColumns { columns: Vec<String> },
    /// The search input changed.
    SetSearch { text: String },
    /// The statistics checkbox changed.
    SetShowStats { show: bool },
    /// All table controls submitted together.
    Controls {
        columns: Vec<String>,
        search: String,
        show_stats: bool,
    },
    /// The "show full sheet" button was pressed.
    ToggleFullSheet,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a sheet. The column choice names the previous sheet's columns,
    /// so it goes back to "all"; search text and the stats checkbox carry over.
    /// The full-sheet view is closed.
    pub fn select_sheet(&mut self, name: &str) {
        if self.selected_sheet.as_deref() == Some(name) {
            return;
        }
        self.selected_sheet = Some(name.to_string());
        self.chosen_columns = None;
        self.show_full = false;
    }

    /// Record a column choice, dropping repeats while keeping pick order.
    pub fn set_columns(&mut self, columns: Vec<String>) {
        let mut unique: Vec<String> = Vec::with_capacity(columns.len());
        for column in columns {
            if !unique.contains(&column) {
                unique.push(column);
            }
        }
        self.chosen_columns = Some(unique);
    }

    /// Columns to project `sheet` onto: the saved choice restricted to columns
    /// the sheet actually has, or every column when nothing was chosen.
    #[must_use]
    pub fn columns_for(&self, sheet: &Sheet) -> Vec<String> {
        match &self.chosen_columns {
            None => sheet.columns().to_vec(),
            Some(chosen) => chosen
                .iter()
                .filter(|name| sheet.has_column(name))
                .cloned()
                .collect(),
        }
    }

    /// Fold one event into the state. Sheet names are checked by the caller.
    pub fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::SelectSheet { name } => self.select_sheet(&name),
            ViewEvent::SetColumns { columns } => self.set_columns(columns),
            ViewEvent::SetSearch { text } => self.search_text = text,
            ViewEvent::SetShowStats { show } => self.show_stats = show,
            ViewEvent::Controls {
                columns,
                search,
                show_stats,
            } => {
                self.set_columns(columns);
                self.search_text = search;
                self.show_stats = show_stats;
            }
            ViewEvent::ToggleFullSheet => self.show_full = !self.show_full,
        }
    }
}
