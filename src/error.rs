use thiserror::Error;

/// Problems with the CSV handed to the analyzer. Any of these withholds every
/// other output.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("could not read input: {0}")]
    Read(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV must have {} column(s)", quoted(.0))]
    MissingColumns(Vec<String>),

    #[error("row {row}: column '{column}' is not a number: '{value}'")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("CSV contains no data rows")]
    Empty,
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EfficiencyError {
    #[error("Time must be > 0 (got {time})")]
    NonPositiveTime { time: f64 },

    #[error("Score must be a finite number (got {score})")]
    NonFiniteScore { score: f64 },
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(" and ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_every_name() {
        let err = InputError::MissingColumns(vec![
            "Attempt_Time_Minutes".to_string(),
            "Score".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "CSV must have 'Attempt_Time_Minutes' and 'Score' column(s)"
        );
    }

    #[test]
    fn invalid_number_names_row_and_column() {
        let err = InputError::InvalidNumber {
            row: 3,
            column: "Score".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "row 3: column 'Score' is not a number: 'abc'");
    }
}
