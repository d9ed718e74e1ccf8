//! CSV download of the display dataset.

use sheetview_sheet::{CsvOptions, Result, Sheet};

/// MIME type sent with the download.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// A ready-to-send CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDownload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Download name for a sheet: `<sheet-name>.csv`.
#[must_use]
pub fn download_file_name(sheet_name: &str) -> String {
    format!("{sheet_name}.csv")
}

/// Encode `display` as BOM-prefixed, comma-separated UTF-8 with a header row.
/// The same dataset always produces the same bytes.
pub fn export_csv(display: &Sheet) -> Result<Vec<u8>> {
    display.to_csv_bytes(&CsvOptions::default())
}

/// Build the download for the dataset shown for `sheet_name`.
pub fn csv_download(sheet_name: &str, display: &Sheet) -> Result<CsvDownload> {
    Ok(CsvDownload {
        file_name: download_file_name(sheet_name),
        bytes: export_csv(display)?,
    })
}
