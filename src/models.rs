use std::fmt;

use serde::Serialize;

pub const DEFAULT_TIME_COLUMN: &str = "Attempt_Time_Minutes";
pub const DEFAULT_SCORE_COLUMN: &str = "Score";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttemptRecord {
    pub time_minutes: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub time_column: String,
    pub score_column: String,
    pub records: Vec<AttemptRecord>,
}

impl Dataset {
    pub fn times(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.time_minutes).collect()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.score).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Student segment relative to the dataset-wide medians of time and score.
///
/// Variant order is the tie-break order used when counts are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum QuadrantCategory {
    FastHighAchiever,
    DiligentHighAchiever,
    Rusher,
    Struggler,
}

impl QuadrantCategory {
    pub fn label(self) -> &'static str {
        match self {
            QuadrantCategory::FastHighAchiever => "Fast High-Achiever",
            QuadrantCategory::DiligentHighAchiever => "Diligent High-Achiever",
            QuadrantCategory::Rusher => "Rusher (Low Score)",
            QuadrantCategory::Struggler => "Struggler (Low Score/Slow)",
        }
    }
}

impl fmt::Display for QuadrantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub field: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub fields: Vec<FieldSummary>,
}

impl SummaryTable {
    pub const STATISTICS: [&'static str; 8] =
        ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    pub fn field(&self, name: &str) -> Option<&FieldSummary> {
        self.fields.iter().find(|f| f.field == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    None,
    Positive,
    Negative,
    Undefined,
}

impl Trend {
    pub fn description(self) -> &'static str {
        match self {
            Trend::None => "No significant relationship",
            Trend::Positive => "Positive trend: More time ≈ Higher score",
            Trend::Negative => "Negative trend: More time ≈ Lower score",
            Trend::Undefined => "zero variance in time or score",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub coefficient: Option<f64>,
    pub trend: Trend,
}

impl CorrelationResult {
    pub fn message(&self) -> String {
        match self.coefficient {
            Some(r) => format!("Pearson Correlation: {:.4} ({})", r, self.trend.description()),
            None => format!("Pearson Correlation: undefined ({})", self.trend.description()),
        }
    }
}

/// Least-squares fit of score against time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn at(&self, time_minutes: f64) -> f64 {
        self.slope * time_minutes + self.intercept
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Medians {
    pub time_minutes: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub record: AttemptRecord,
    pub efficiency: Option<f64>,
    pub category: QuadrantCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: QuadrantCategory,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub record_count: usize,
    pub time_column: String,
    pub score_column: String,
    pub summary: SummaryTable,
    pub correlation: CorrelationResult,
    pub correlation_message: String,
    pub medians: Medians,
    pub assignments: Vec<Assignment>,
    pub category_counts: Vec<CategoryCount>,
    /// Rows whose efficiency could not be computed because time was not positive.
    pub undefined_efficiency_rows: usize,
    pub trend_line: Option<TrendLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_display() {
        for category in [
            QuadrantCategory::FastHighAchiever,
            QuadrantCategory::DiligentHighAchiever,
            QuadrantCategory::Rusher,
            QuadrantCategory::Struggler,
        ] {
            assert_eq!(category.to_string(), category.label());
        }
    }

    #[test]
    fn correlation_message_formats_four_decimals() {
        let result = CorrelationResult {
            coefficient: Some(-1.0),
            trend: Trend::Negative,
        };
        assert_eq!(
            result.message(),
            "Pearson Correlation: -1.0000 (Negative trend: More time ≈ Lower score)"
        );
    }

    #[test]
    fn undefined_correlation_has_no_nan() {
        let result = CorrelationResult {
            coefficient: None,
            trend: Trend::Undefined,
        };
        let message = result.message();
        assert!(!message.contains("NaN"));
        assert!(message.contains("undefined"));
    }

    #[test]
    fn trend_line_evaluates() {
        let line = TrendLine {
            slope: -2.0,
            intercept: 110.0,
        };
        assert_eq!(line.at(10.0), 90.0);
    }
}
