use crate::book::Book;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook_auto_from_rs, Data, Reader, Xls, Xlsx};
use chrono::NaiveDateTime;
use std::fmt;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One strategy for turning workbook bytes into a [`Book`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeEngine {
    /// Format inferred from the content (xls, xlsx, xlsb, ods are tried in turn)
    Auto,
    /// Legacy binary (BIFF) reader
    Xls,
    /// Zipped-XML reader
    Xlsx,
}

impl DecodeEngine {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DecodeEngine::Auto => "auto",
            DecodeEngine::Xls => "xls",
            DecodeEngine::Xlsx => "xlsx",
        }
    }

    /// Decode every sheet of the workbook. Any failing sheet fails the whole call.
    pub fn decode(self, bytes: &[u8]) -> Result<Book> {
        let cursor = Cursor::new(bytes);
        match self {
            DecodeEngine::Auto => {
                let workbook = open_workbook_auto_from_rs(cursor)
                    .map_err(|e| decode_error(self, e))?;
                read_book(workbook, self)
            }
            DecodeEngine::Xls => {
                let workbook: Xls<_> = Xls::new(cursor).map_err(|e| decode_error(self, e))?;
                read_book(workbook, self)
            }
            DecodeEngine::Xlsx => {
                let workbook: Xlsx<_> = Xlsx::new(cursor).map_err(|e| decode_error(self, e))?;
                read_book(workbook, self)
            }
        }
    }
}

impl fmt::Display for DecodeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered list of engines; the first one that succeeds wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeChain {
    engines: Vec<DecodeEngine>,
}

impl Default for DecodeChain {
    /// Content sniffing first, then the legacy binary reader.
    fn default() -> Self {
        DecodeChain {
            engines: vec![DecodeEngine::Auto, DecodeEngine::Xls],
        }
    }
}

impl DecodeChain {
    #[must_use]
    pub fn new(engines: Vec<DecodeEngine>) -> Self {
        DecodeChain { engines }
    }

    /// Try each engine in order.
    ///
    /// # Errors
    ///
    /// Returns `UnreadableWorkbook` with every engine's failure when none succeeds.
    pub fn decode(&self, bytes: &[u8]) -> Result<Book> {
        let mut causes = Vec::with_capacity(self.engines.len());
        for engine in &self.engines {
            match engine.decode(bytes) {
                Ok(book) => return Ok(book),
                Err(err) => causes.push(err.to_string()),
            }
        }
        Err(SheetError::UnreadableWorkbook { causes })
    }
}

impl Book {
    /// Decode a workbook from memory with the default engine chain
    pub fn from_excel_bytes(bytes: &[u8]) -> Result<Self> {
        DecodeChain::default().decode(bytes)
    }

    /// Read and decode a workbook file with the default engine chain
    pub fn from_excel_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_excel_bytes(&bytes)
    }
}

fn decode_error(engine: DecodeEngine, err: impl fmt::Display) -> SheetError {
    SheetError::Decode {
        engine: engine.name(),
        message: err.to_string(),
    }
}

fn read_book<RS, R>(mut workbook: R, engine: DecodeEngine) -> Result<Book>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: fmt::Display,
{
    let sheet_names = workbook.sheet_names().to_vec();
    let mut book = Book::new();

    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| decode_error(engine, e))?;

        let grid: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(data_to_cell_value).collect())
            .collect();

        book.add_sheet(&sheet_name, Sheet::from_grid(&sheet_name, grid))?;
    }

    Ok(book)
}

fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(DATETIME_FORMAT).to_string()
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) if s.is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(timestamp) => CellValue::String(format_timestamp(timestamp)),
            // Out-of-range serials keep their numeric value
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(e.to_string()),
    }
}
