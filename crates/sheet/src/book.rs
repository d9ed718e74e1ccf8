use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use indexmap::IndexMap;

/// A book containing multiple sheets (preserves source order)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Book {
    sheets: IndexMap<String, Sheet>,
}

impl Book {
    /// Create a new empty book
    #[must_use]
    pub fn new() -> Self {
        Book {
            sheets: IndexMap::new(),
        }
    }

    /// Get the number of sheets
    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the book is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Check if a sheet exists
    #[must_use]
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Iterate over (name, sheet) pairs in order
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(name, sheet)| (name.as_str(), sheet))
    }

    /// Add a sheet to the book; the sheet takes the given name
    pub fn add_sheet(&mut self, name: &str, sheet: Sheet) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetAlreadyExists {
                name: name.to_string(),
            });
        }

        let mut sheet = sheet;
        sheet.set_name(name);
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_order_is_insertion_order() {
        let mut book = Book::new();
        book.add_sheet("Plan", Sheet::new()).unwrap();
        book.add_sheet("Budget", Sheet::new()).unwrap();
        book.add_sheet("Archive", Sheet::new()).unwrap();

        assert_eq!(book.sheet_names(), ["Plan", "Budget", "Archive"]);
        assert_eq!(book.sheet_count(), 3);
    }

    #[test]
    fn test_add_sheet_renames_and_rejects_duplicates() {
        let mut book = Book::new();
        book.add_sheet("Data", Sheet::with_name("other")).unwrap();
        assert_eq!(book.get_sheet("Data").unwrap().name(), "Data");

        let result = book.add_sheet("Data", Sheet::new());
        assert!(matches!(result, Err(SheetError::SheetAlreadyExists { .. })));
    }

    #[test]
    fn test_get_missing_sheet() {
        let book = Book::new();
        assert!(book.is_empty());
        assert!(matches!(
            book.get_sheet("Nope"),
            Err(SheetError::SheetNotFound { name }) if name == "Nope"
        ));
    }
}
