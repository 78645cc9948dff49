use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{Analysis, FieldSummary, SummaryTable};

fn statistic(summary: &FieldSummary, name: &str) -> String {
    let value = match name {
        "count" => return summary.count.to_string(),
        "mean" => summary.mean,
        "std" => match summary.std_dev {
            Some(std) => std,
            None => return "n/a".to_string(),
        },
        "min" => summary.min,
        "25%" => summary.p25,
        "50%" => summary.p50,
        "75%" => summary.p75,
        _ => summary.max,
    };
    format!("{value:.4}")
}

/// Rows are statistics, columns are fields.
pub fn summary_rows(table: &SummaryTable) -> Vec<Vec<String>> {
    SummaryTable::STATISTICS
        .iter()
        .map(|name| {
            let mut row = vec![name.to_string()];
            row.extend(table.fields.iter().map(|field| statistic(field, name)));
            row
        })
        .collect()
}

fn markdown_table(output: &mut String, header: &[String], rows: &[Vec<String>]) {
    let _ = writeln!(output, "| {} |", header.join(" | "));
    let _ = writeln!(
        output,
        "|{}|",
        header.iter().map(|_| "---").collect::<Vec<_>>().join("|")
    );
    for row in rows {
        let _ = writeln!(output, "| {} |", row.join(" | "));
    }
}

fn text_table(output: &mut String, header: &[String], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:>width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let _ = writeln!(output, "{}", line(header));
    for row in rows {
        let _ = writeln!(output, "{}", line(row.as_slice()));
    }
}

fn summary_header(analysis: &Analysis) -> Vec<String> {
    let mut header = vec![String::new()];
    header.extend(analysis.summary.fields.iter().map(|f| f.field.clone()));
    header
}

fn segment_rows(analysis: &Analysis) -> Vec<Vec<String>> {
    analysis
        .category_counts
        .iter()
        .map(|c| vec![c.label.to_string(), c.count.to_string()])
        .collect()
}

fn segment_header() -> Vec<String> {
    vec!["Student Type".to_string(), "Count".to_string()]
}

/// Plain-text rendering for the terminal.
pub fn render_text(analysis: &Analysis) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", analysis.correlation_message);
    let _ = writeln!(output);
    let _ = writeln!(output, "General Statistics");
    text_table(&mut output, &summary_header(analysis), &summary_rows(&analysis.summary));
    let _ = writeln!(output);
    let _ = writeln!(output, "Student Segments");
    text_table(&mut output, &segment_header(), &segment_rows(analysis));
    output
}

pub fn build_report(analysis: &Analysis, source: &str, generated_at: DateTime<Utc>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Exam Attempt Analysis");
    let _ = writeln!(
        output,
        "Generated from {} ({} attempts) at {}",
        source,
        analysis.record_count,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Correlation Insight");
    let _ = writeln!(output, "{}", analysis.correlation_message);

    let _ = writeln!(output);
    let _ = writeln!(output, "## General Statistics");
    markdown_table(&mut output, &summary_header(analysis), &summary_rows(&analysis.summary));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Student Segments");
    let _ = writeln!(
        output,
        "Cutoffs: median time {:.1}, median score {:.1}.",
        analysis.medians.time_minutes, analysis.medians.score
    );
    let _ = writeln!(output);
    markdown_table(&mut output, &segment_header(), &segment_rows(analysis));

    if analysis.undefined_efficiency_rows > 0 {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Efficiency");
        let _ = writeln!(
            output,
            "{} attempt(s) had non-positive time; their efficiency is undefined and the \
             efficiency column is left out of the statistics.",
            analysis.undefined_efficiency_rows
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer;
    use crate::models::{AttemptRecord, Dataset};
    use chrono::TimeZone;

    fn analysis(rows: &[(f64, f64)]) -> Analysis {
        let dataset = Dataset {
            time_column: "Attempt_Time_Minutes".to_string(),
            score_column: "Score".to_string(),
            records: rows
                .iter()
                .map(|&(time_minutes, score)| AttemptRecord { time_minutes, score })
                .collect(),
        };
        analyzer::analyze(&dataset).unwrap()
    }

    #[test]
    fn summary_rows_follow_statistic_order() {
        let analysis = analysis(&[(10.0, 90.0), (20.0, 70.0), (30.0, 50.0), (40.0, 30.0)]);
        let rows = summary_rows(&analysis.summary);
        let names: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, SummaryTable::STATISTICS.to_vec());
        assert_eq!(rows[0], vec!["count", "4", "4", "4"]);
        assert_eq!(rows[1][1], "25.0000");
    }

    #[test]
    fn single_row_std_is_not_available() {
        let analysis = analysis(&[(10.0, 90.0)]);
        let rows = summary_rows(&analysis.summary);
        assert_eq!(rows[2][1], "n/a");
    }

    #[test]
    fn report_contains_all_sections() {
        let analysis = analysis(&[(10.0, 90.0), (20.0, 70.0), (30.0, 50.0), (40.0, 30.0)]);
        let generated_at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let report = build_report(&analysis, "attempts.csv", generated_at);

        assert!(report.starts_with("# Exam Attempt Analysis\n"));
        assert!(report.contains("Generated from attempts.csv (4 attempts) at 2026-03-01 09:30 UTC"));
        assert!(report.contains("Pearson Correlation: -1.0000"));
        assert!(report.contains("|  | Attempt_Time_Minutes | Score | Efficiency |"));
        assert!(report.contains("| Fast High-Achiever | 2 |"));
        assert!(report.contains("median time 25.0, median score 60.0"));
        assert!(!report.contains("## Efficiency"));
    }

    #[test]
    fn report_notes_undefined_efficiency() {
        let analysis = analysis(&[(0.0, 10.0), (20.0, 70.0)]);
        let report = build_report(&analysis, "attempts.csv", Utc::now());
        assert!(report.contains("## Efficiency"));
        assert!(report.contains("1 attempt(s) had non-positive time"));
    }

    #[test]
    fn text_rendering_lists_segments() {
        let analysis = analysis(&[(10.0, 90.0), (20.0, 70.0), (30.0, 50.0), (40.0, 30.0)]);
        let text = render_text(&analysis);
        assert!(text.starts_with("Pearson Correlation"));
        assert!(text.contains("Student Segments"));
        assert!(text.contains("Struggler (Low Score/Slow)"));
    }
}
