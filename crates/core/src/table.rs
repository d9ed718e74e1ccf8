//! Column projection and row search over a selected sheet.

use sheetview_sheet::{CellValue, Result, Sheet};

/// Derive the display dataset: project onto `columns` (in that order), then
/// keep the rows where any projected cell contains `search`, ignoring case.
///
/// An empty `search` keeps every row. Row order is preserved.
///
/// ```
/// use sheetview_core::display_dataset;
/// use sheetview_sheet::Sheet;
///
/// let sheet = Sheet::from_data(vec![
///     vec!["City", "Year"],
///     vec!["Riyadh", "2024"],
///     vec!["Jeddah", "2025"],
/// ]);
/// let view = display_dataset(&sheet, &["City".to_string()], "RIYADH").unwrap();
/// assert_eq!(view.row_count(), 1);
/// assert_eq!(view.columns(), ["City"]);
/// ```
pub fn display_dataset<S: AsRef<str>>(sheet: &Sheet, columns: &[S], search: &str) -> Result<Sheet> {
    let projected = sheet.select_columns(columns)?;
    if search.is_empty() {
        return Ok(projected);
    }

    let needle = search.to_lowercase();
    Ok(projected.filter_rows(|row| row_matches(row, &needle)))
}

/// OR across cells: true when at least one cell contains the lowercased needle.
#[must_use]
pub fn row_matches(row: &[CellValue], needle_lower: &str) -> bool {
    row.iter().any(|cell| cell.contains_lowercase(needle_lower))
}
