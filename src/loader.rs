use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::InputError;
use crate::models::{AttemptRecord, Dataset};

/// Names of the two columns the analyzer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub time: String,
    pub score: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            time: crate::models::DEFAULT_TIME_COLUMN.to_string(),
            score: crate::models::DEFAULT_SCORE_COLUMN.to_string(),
        }
    }
}

pub fn load_csv(csv_path: &Path, columns: &ColumnNames) -> Result<Dataset, InputError> {
    debug!(path = %csv_path.display(), "reading attempts");
    let file = std::fs::File::open(csv_path)?;
    read_dataset(file, columns)
}

/// Parses attempts from any CSV source. Extra columns are ignored.
pub fn read_dataset<R: Read>(source: R, columns: &ColumnNames) -> Result<Dataset, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let time_idx = headers.iter().position(|h| h == columns.time);
    let score_idx = headers.iter().position(|h| h == columns.score);

    let (time_idx, score_idx) = match (time_idx, score_idx) {
        (Some(t), Some(s)) => (t, s),
        (t, s) => {
            let mut missing = Vec::new();
            if t.is_none() {
                missing.push(columns.time.clone());
            }
            if s.is_none() {
                missing.push(columns.score.clone());
            }
            return Err(InputError::MissingColumns(missing));
        }
    };

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = result?;
        // 1-based data row numbers, header excluded
        let row_number = index + 1;
        records.push(AttemptRecord {
            time_minutes: parse_cell(&row, time_idx, row_number, &columns.time)?,
            score: parse_cell(&row, score_idx, row_number, &columns.score)?,
        });
    }

    if records.is_empty() {
        return Err(InputError::Empty);
    }

    debug!(rows = records.len(), "loaded attempts");
    Ok(Dataset {
        time_column: columns.time.clone(),
        score_column: columns.score.clone(),
        records,
    })
}

fn parse_cell(
    row: &csv::StringRecord,
    idx: usize,
    row_number: usize,
    column: &str,
) -> Result<f64, InputError> {
    let raw = row.get(idx).unwrap_or("");
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| InputError::InvalidNumber {
            row: row_number,
            column: column.to_string(),
            value: raw.to_string(),
        })
}
