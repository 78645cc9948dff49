use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::efficiency;
use crate::error::InputError;
use crate::loader::{self, ColumnNames};
use crate::models::{Analysis, Assignment, Dataset, SummaryTable};
use crate::segment;
use crate::stats;

pub const EFFICIENCY_FIELD: &str = "Efficiency";

/// Time and score always; efficiency only when every row has one.
pub fn compute_summary_statistics(dataset: &Dataset, efficiencies: &[Option<f64>]) -> SummaryTable {
    let mut fields = Vec::new();
    fields.extend(stats::summarize(&dataset.time_column, &dataset.times()));
    fields.extend(stats::summarize(&dataset.score_column, &dataset.scores()));

    let defined: Option<Vec<f64>> = efficiencies.iter().copied().collect();
    if let Some(values) = defined {
        fields.extend(stats::summarize(EFFICIENCY_FIELD, &values));
    }

    SummaryTable { fields }
}

pub fn analyze(dataset: &Dataset) -> Result<Analysis, InputError> {
    if dataset.is_empty() {
        return Err(InputError::Empty);
    }

    let times = dataset.times();
    let scores = dataset.scores();

    let efficiencies: Vec<Option<f64>> = dataset
        .records
        .iter()
        .enumerate()
        .map(|(index, record)| match efficiency::compute_efficiency(record) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(row = index + 1, %err, "efficiency undefined");
                None
            }
        })
        .collect();
    let undefined_efficiency_rows = efficiencies.iter().filter(|e| e.is_none()).count();

    let summary = compute_summary_statistics(dataset, &efficiencies);
    if let Some(field) = summary.field(EFFICIENCY_FIELD) {
        debug!(mean = field.mean, max = field.max, "efficiency summarized");
    }
    let correlation = stats::correlation(&times, &scores);
    let medians = segment::medians(dataset).ok_or(InputError::Empty)?;
    let categories = segment::segment_by_quadrant(dataset, &medians);
    let category_counts = segment::count_by_category(&categories);

    let assignments = dataset
        .records
        .iter()
        .zip(efficiencies)
        .zip(categories)
        .map(|((record, efficiency), category)| Assignment {
            record: *record,
            efficiency,
            category,
        })
        .collect();

    info!(
        rows = dataset.len(),
        correlation = ?correlation.coefficient,
        undefined_efficiency_rows,
        "analysis complete"
    );

    Ok(Analysis {
        record_count: dataset.len(),
        time_column: dataset.time_column.clone(),
        score_column: dataset.score_column.clone(),
        summary,
        correlation_message: correlation.message(),
        correlation,
        medians,
        assignments,
        category_counts,
        undefined_efficiency_rows,
        trend_line: stats::linear_fit(&times, &scores),
    })
}

pub fn analyze_file(csv_path: &Path, columns: &ColumnNames) -> Result<Analysis, InputError> {
    let dataset = loader::load_csv(csv_path, columns)?;
    analyze(&dataset)
}

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub csv_path: PathBuf,
    pub columns: ColumnNames,
}

/// Fixed-shape answer to one request: a message that is always present and an
/// analysis that is absent whenever the input was rejected.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub message: String,
    pub analysis: Option<Analysis>,
}

impl AnalysisResponse {
    pub fn is_error(&self) -> bool {
        self.analysis.is_none()
    }
}

pub fn handle_request(request: &AnalysisRequest) -> AnalysisResponse {
    match analyze_file(&request.csv_path, &request.columns) {
        Ok(analysis) => AnalysisResponse {
            message: analysis.correlation_message.clone(),
            analysis: Some(analysis),
        },
        Err(err) => {
            warn!(path = %request.csv_path.display(), %err, "analysis rejected input");
            AnalysisResponse {
                message: format!("Error: {err}"),
                analysis: None,
            }
        }
    }
}
