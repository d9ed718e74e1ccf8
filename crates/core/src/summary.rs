//! Descriptive statistics over the numeric columns of a display dataset.

use serde::Serialize;
use sheetview_sheet::{CellValue, Sheet};

/// Row labels of the statistics table, top to bottom.
pub const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Statistics for one numeric column. Undefined values are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Result of the summary panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "columns", rename_all = "snake_case")]
pub enum Summary {
    Table(Vec<ColumnStats>),
    NoNumericData,
}

impl ColumnStats {
    /// Values in [`STAT_LABELS`] order.
    #[must_use]
    pub fn values(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }

    fn from_values(column: &str, mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        let count = values.len();
        let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
        let std = mean.filter(|_| count > 1).map(|m| {
            let squares: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
            (squares / (count - 1) as f64).sqrt()
        });

        ColumnStats {
            column: column.to_string(),
            count,
            mean,
            std,
            min: values.first().copied(),
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values.last().copied(),
        }
    }
}

impl Summary {
    /// Lay the statistics out as a sheet: one row per statistic, one column
    /// per numeric column, plus a leading label column. Undefined values are NaN.
    #[must_use]
    pub fn to_sheet(&self) -> Option<Sheet> {
        let Summary::Table(stats) = self else {
            return None;
        };

        let mut columns = vec![String::new()];
        columns.extend(stats.iter().map(|s| s.column.clone()));

        let rows = STAT_LABELS
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let mut row = vec![CellValue::from(*label)];
                row.extend(
                    stats
                        .iter()
                        .map(|s| CellValue::Float(s.values()[i].unwrap_or(f64::NAN))),
                );
                row
            })
            .collect();

        // Numeric column names are unique and never empty, so this cannot clash.
        Sheet::with_columns("summary", columns, rows).ok()
    }
}

/// Describe every numeric column of `sheet`.
///
/// A column is numeric when it holds at least one number and every non-null
/// cell is an integer or float. NaN cells count as missing.
#[must_use]
pub fn describe(sheet: &Sheet) -> Summary {
    let stats: Vec<ColumnStats> = sheet
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(index, name)| {
            numeric_values(sheet, index).map(|values| ColumnStats::from_values(name, values))
        })
        .collect();

    if stats.is_empty() {
        Summary::NoNumericData
    } else {
        Summary::Table(stats)
    }
}

fn numeric_values(sheet: &Sheet, index: usize) -> Option<Vec<f64>> {
    let mut values = Vec::new();
    let mut saw_number = false;
    for cell in sheet.column_values(index) {
        match cell {
            CellValue::Null => {}
            CellValue::Int(i) => {
                saw_number = true;
                values.push(*i as f64);
            }
            CellValue::Float(f) => {
                saw_number = true;
                if !f.is_nan() {
                    values.push(*f);
                }
            }
            CellValue::Bool(_) | CellValue::String(_) => return None,
        }
    }
    saw_number.then_some(values)
}

/// Linear interpolation between closest ranks on sorted values.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        len => {
            let pos = q * (len - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            let frac = pos - lower as f64;
            Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
        }
    }
}
