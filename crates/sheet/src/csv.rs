use crate::cell::CellValue;
use crate::error::Result;
use crate::sheet::Sheet;
use std::io::{Read, Write};

/// UTF-8 byte order mark, expected by spreadsheet tools to detect the encoding.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// CSV reader/writer options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Write a UTF-8 BOM before the header / skip one when reading (default: true)
    pub bom: bool,
    /// Whether to use type inference when reading
    pub infer_types: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            quote: b'"',
            bom: true,
            infer_types: true,
        }
    }
}

impl CsvOptions {
    /// Set whether a BOM is written/skipped
    #[must_use]
    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    /// Set whether to infer types
    #[must_use]
    pub fn with_type_inference(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }
}

impl Sheet {
    /// Write the header row and all data rows as delimited text.
    ///
    /// Nulls become empty fields; fields are quoted only when needed.
    pub fn write_csv<W: Write>(&self, mut writer: W, options: &CsvOptions) -> Result<()> {
        if options.bom {
            writer.write_all(&UTF8_BOM)?;
        }

        // The csv writer renders an empty record as `""`, which reads back as a column.
        if self.col_count() == 0 {
            for _ in 0..=self.row_count() {
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
            return Ok(());
        }

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        csv_writer.write_record(self.columns())?;
        for row in self.rows() {
            csv_writer.write_record(row.iter().map(CellValue::as_str))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Encode the sheet as CSV bytes
    pub fn to_csv_bytes(&self, options: &CsvOptions) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer, options)?;
        Ok(buffer)
    }

    /// Load a sheet from CSV text whose first record is the header
    pub fn from_csv_reader<R: Read>(name: &str, mut reader: R, options: &CsvOptions) -> Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        let body: &[u8] = if options.bom {
            content.strip_prefix(&UTF8_BOM).unwrap_or(&content[..])
        } else {
            &content[..]
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false) // We handle headers ourselves
            .flexible(true)
            .from_reader(body);

        let mut grid: Vec<Vec<CellValue>> = Vec::new();
        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = record
                .iter()
                .map(|field| {
                    if index == 0 || !options.infer_types {
                        CellValue::String(field.to_string())
                    } else {
                        CellValue::parse(field)
                    }
                })
                .collect();
            grid.push(row);
        }

        Ok(Sheet::from_grid(name, grid))
    }
}
