use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use std::collections::{HashMap, HashSet};

/// A named table: ordered, unique column names over row-major cells.
///
/// Every row holds exactly `col_count()` cells; constructors pad short rows
/// with `CellValue::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    rows: Vec<Vec<CellValue>>,
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            columns: Vec::new(),
            column_index: HashMap::new(),
            rows: Vec::new(),
        }
    }

    /// Create a sheet from a 2D vector of values, using the first row as the header.
    ///
    /// ```
    /// use sheetview_sheet::Sheet;
    ///
    /// let sheet = Sheet::from_data(vec![
    ///     vec!["Name", "City"],
    ///     vec!["Alice", "Riyadh"],
    /// ]);
    /// assert_eq!(sheet.columns(), ["Name", "City"]);
    /// assert_eq!(sheet.row_count(), 1);
    /// ```
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let grid: Vec<Vec<CellValue>> = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self::from_grid("Sheet1", grid)
    }

    /// Build a sheet from a raw cell grid whose first row is the header.
    ///
    /// Blank header cells become `Unnamed: <index>` and repeated names get a
    /// `.1`, `.2`, ... suffix, so this never fails.
    #[must_use]
    pub fn from_grid(name: &str, grid: Vec<Vec<CellValue>>) -> Self {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = grid.into_iter();

        let header = grid.next().unwrap_or_default();
        let mut raw_names: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let text = cell.as_str();
                if text.trim().is_empty() {
                    format!("Unnamed: {i}")
                } else {
                    text
                }
            })
            .collect();
        for i in raw_names.len()..width {
            raw_names.push(format!("Unnamed: {i}"));
        }

        let columns = dedupe_column_names(raw_names);
        let rows = grid
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();

        let mut sheet = Sheet::with_name(name);
        sheet.column_index = build_index(&columns);
        sheet.columns = columns;
        sheet.rows = rows;
        sheet
    }

    /// Build a sheet from explicit column names and rows.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateColumnName` for repeated names and `LengthMismatch`
    /// when a row is wider than the header. Short rows are padded with nulls.
    pub fn with_columns(
        name: &str,
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(SheetError::DuplicateColumnName {
                    name: column.clone(),
                });
            }
        }

        let width = columns.len();
        let mut padded = Vec::with_capacity(rows.len());
        for mut row in rows {
            if row.len() > width {
                return Err(SheetError::LengthMismatch {
                    expected: width,
                    actual: row.len(),
                });
            }
            row.resize(width, CellValue::Null);
            padded.push(row);
        }

        let mut sheet = Sheet::with_name(name);
        sheet.column_index = build_index(&columns);
        sheet.columns = columns;
        sheet.rows = padded;
        Ok(sheet)
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Column names in order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the number of data rows (the header is not counted)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the sheet has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    /// Position of a column by name
    #[must_use]
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    // ===== Cell Access =====

    /// Get a cell value by row and column index (0-based)
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .ok_or(SheetError::IndexOutOfBounds {
                row,
                col,
                rows: self.row_count(),
                cols: self.col_count(),
            })
    }

    /// Get a cell value by row index and column name
    pub fn get_by_name(&self, row: usize, col_name: &str) -> Result<&CellValue> {
        let col = self.column_index_by_name(col_name)?;
        self.get(row, col)
    }

    /// Get a row by index
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterate over data rows
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Iterate over one column's cells
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    // ===== Derived Sheets =====

    /// Project onto the named columns, in the given order, keeping row order.
    ///
    /// # Errors
    ///
    /// Returns `ColumnNotFound` for a name that is not a column of this sheet
    /// and `DuplicateColumnName` when a name is requested twice.
    pub fn select_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<Sheet> {
        let indices = columns
            .iter()
            .map(|name| self.column_index_by_name(name.as_ref()))
            .collect::<Result<Vec<usize>>>()?;

        let names = columns.iter().map(|s| s.as_ref().to_string()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Sheet::with_columns(&self.name, names, rows)
    }

    /// Keep only the rows matching the predicate, preserving their order.
    #[must_use]
    pub fn filter_rows<F>(&self, predicate: F) -> Sheet
    where
        F: Fn(&[CellValue]) -> bool,
    {
        Sheet {
            name: self.name.clone(),
            columns: self.columns.clone(),
            column_index: self.column_index.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| predicate(row))
                .cloned()
                .collect(),
        }
    }

    fn column_index_by_name(&self, name: &str) -> Result<usize> {
        self.column_position(name)
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })
    }
}

fn build_index(columns: &[String]) -> HashMap<String, usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect()
}

/// Rename repeated header names to `name.1`, `name.2`, ... (first free suffix).
fn dedupe_column_names(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(names.len());

    for name in names {
        if taken.insert(name.clone()) {
            result.push(name);
            continue;
        }
        let mut suffix = 1;
        let unique = loop {
            let candidate = format!("{name}.{suffix}");
            if !taken.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        taken.insert(unique.clone());
        result.push(unique);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> Sheet {
        Sheet::from_data(vec![
            vec!["Name", "City", "Year"],
            vec!["Alice", "Riyadh", "2024"],
            vec!["Bob", "Jeddah", "2025"],
            vec!["Carol", "Dammam", "2025"],
        ])
    }

    #[test]
    fn test_from_grid_header() {
        let sheet = cities();
        assert_eq!(sheet.columns(), ["Name", "City", "Year"]);
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.col_count(), 3);
        assert_eq!(
            sheet.get_by_name(1, "City").unwrap(),
            &CellValue::String("Jeddah".to_string())
        );
    }

    #[test]
    fn test_from_grid_pads_and_names_blank_headers() {
        let sheet = Sheet::from_grid(
            "Raw",
            vec![
                vec![CellValue::from("A"), CellValue::Null],
                vec![CellValue::from(1), CellValue::from(2), CellValue::from(3)],
                vec![CellValue::from(4)],
            ],
        );
        assert_eq!(sheet.columns(), ["A", "Unnamed: 1", "Unnamed: 2"]);
        assert_eq!(sheet.row(1).unwrap(), [CellValue::Int(4), CellValue::Null, CellValue::Null]);
    }

    #[test]
    fn test_from_grid_dedupes_names() {
        let sheet = Sheet::from_data(vec![vec!["X", "X", "X.1", "X"]]);
        assert_eq!(sheet.columns(), ["X", "X.1", "X.1.1", "X.2"]);
    }

    #[test]
    fn test_from_grid_empty() {
        let sheet = Sheet::from_grid("Empty", Vec::new());
        assert_eq!(sheet.col_count(), 0);
        assert_eq!(sheet.row_count(), 0);
        assert_eq!(sheet.name(), "Empty");
    }

    #[test]
    fn test_with_columns_rejects_duplicates() {
        let result = Sheet::with_columns("S", vec!["a".into(), "a".into()], Vec::new());
        assert!(matches!(result, Err(SheetError::DuplicateColumnName { .. })));
    }

    #[test]
    fn test_with_columns_rejects_wide_row() {
        let result = Sheet::with_columns(
            "S",
            vec!["a".into()],
            vec![vec![CellValue::Int(1), CellValue::Int(2)]],
        );
        assert!(matches!(result, Err(SheetError::LengthMismatch { .. })));
    }

    #[test]
    fn test_select_columns_reorders() {
        let projected = cities().select_columns(&["Year", "Name"]).unwrap();
        assert_eq!(projected.columns(), ["Year", "Name"]);
        assert_eq!(projected.row_count(), 3);
        assert_eq!(projected.get(0, 1).unwrap(), &CellValue::from("Alice"));
    }

    #[test]
    fn test_select_columns_unknown() {
        let result = cities().select_columns(&["Country"]);
        assert!(matches!(result, Err(SheetError::ColumnNotFound { name }) if name == "Country"));
    }

    #[test]
    fn test_select_no_columns_keeps_rows() {
        let projected = cities().select_columns::<&str>(&[]).unwrap();
        assert_eq!(projected.col_count(), 0);
        assert_eq!(projected.row_count(), 3);
    }

    #[test]
    fn test_filter_rows_preserves_order() {
        let filtered = cities().filter_rows(|row| row[2].as_str() == "2025");
        let names: Vec<String> = filtered.column_values(0).map(CellValue::as_str).collect();
        assert_eq!(names, ["Bob", "Carol"]);
    }
}
