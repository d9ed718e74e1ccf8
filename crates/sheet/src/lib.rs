//! Sheet/Book model for sheetview
//!
//! Holds the tabular data a workbook decodes into: a [`Book`] is an ordered set
//! of named [`Sheet`]s, each an ordered list of uniquely named columns over rows
//! of [`CellValue`]s.
//!
//! # Examples
//!
//! ## Creating a sheet from data
//!
//! ```
//! use sheetview_sheet::{Sheet, CellValue};
//!
//! let sheet = Sheet::from_data(vec![
//!     vec!["Name", "Age", "City"],
//!     vec!["Alice", "30", "NYC"],
//!     vec!["Bob", "25", "LA"],
//! ]);
//!
//! assert_eq!(sheet.row_count(), 2);
//! assert_eq!(sheet.col_count(), 3);
//! assert_eq!(sheet.get_by_name(1, "City").unwrap(), &CellValue::from("LA"));
//! ```
//!
//! ## Decoding a workbook
//!
//! ```no_run
//! use sheetview_sheet::{Book, DecodeChain, DecodeEngine};
//!
//! let bytes = std::fs::read("plan.xls").unwrap();
//!
//! // Content sniffing first, then the legacy reader
//! let book = Book::from_excel_bytes(&bytes).unwrap();
//!
//! // Or an explicit engine order
//! let chain = DecodeChain::new(vec![DecodeEngine::Xlsx, DecodeEngine::Xls]);
//! let book = chain.decode(&bytes).unwrap();
//! println!("{:?}", book.sheet_names());
//! ```
//!
//! ## Exporting CSV
//!
//! ```
//! use sheetview_sheet::{CsvOptions, Sheet};
//!
//! let sheet = Sheet::from_data(vec![vec!["Item", "Amount"], vec!["Travel", "120"]]);
//! let bytes = sheet.to_csv_bytes(&CsvOptions::default()).unwrap();
//! assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
//! ```

mod book;
mod cell;
mod csv;
mod error;
mod excel;
mod sheet;

/// Re-export book type.
pub use book::Book;
/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export CSV options and the BOM bytes.
pub use csv::{CsvOptions, UTF8_BOM};
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export decode engines.
pub use excel::{DecodeChain, DecodeEngine};
/// Re-export sheet type.
pub use sheet::Sheet;
