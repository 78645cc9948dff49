//! Vega-Lite chart documents built from a finished analysis.
//!
//! Nothing here recomputes statistics: the medians, categories and trend line
//! all come from the `Analysis`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::{json, Value};

use crate::models::Analysis;

const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

pub const DISTRIBUTION_FILE: &str = "distributions.vl.json";
pub const SEGMENTATION_FILE: &str = "segmentation.vl.json";

fn points(analysis: &Analysis) -> Vec<Value> {
    analysis
        .assignments
        .iter()
        .map(|a| {
            json!({
                "time": a.record.time_minutes,
                "score": a.record.score,
                "category": a.category.label(),
            })
        })
        .collect()
}

fn histogram(title: &str, field: &str, axis: &str) -> Value {
    json!({
        "title": title,
        "mark": "bar",
        "encoding": {
            "x": { "field": field, "type": "quantitative", "bin": true, "title": axis },
            "y": { "aggregate": "count", "type": "quantitative" }
        }
    })
}

fn boxplot(title: &str, field: &str, axis: &str) -> Value {
    json!({
        "title": title,
        "mark": "boxplot",
        "encoding": {
            "x": { "field": field, "type": "quantitative", "title": axis }
        }
    })
}

/// Histograms on top, boxplots underneath; score on the left, time on the right.
pub fn distribution_figure(analysis: &Analysis) -> Value {
    json!({
        "$schema": SCHEMA,
        "data": { "values": points(analysis) },
        "vconcat": [
            { "hconcat": [
                histogram("Score Distribution", "score", &analysis.score_column),
                histogram("Time Distribution", "time", &analysis.time_column),
            ]},
            { "hconcat": [
                boxplot("Score Outliers (Boxplot)", "score", &analysis.score_column),
                boxplot("Time Outliers (Boxplot)", "time", &analysis.time_column),
            ]},
        ]
    })
}

pub fn segmentation_figure(analysis: &Analysis) -> Value {
    let medians = analysis.medians;
    let mut layers = vec![
        json!({
            "data": { "values": points(analysis) },
            "mark": { "type": "point", "filled": true, "size": 100 },
            "encoding": {
                "x": { "field": "time", "type": "quantitative", "title": analysis.time_column },
                "y": { "field": "score", "type": "quantitative", "title": analysis.score_column },
                "color": { "field": "category", "type": "nominal" },
                "shape": { "field": "category", "type": "nominal" }
            }
        }),
        json!({
            "data": { "values": [{
                "time": medians.time_minutes,
                "label": format!("Median Time ({:.1})", medians.time_minutes),
            }]},
            "mark": { "type": "rule", "strokeDash": [6, 4] },
            "encoding": {
                "x": { "field": "time", "type": "quantitative" },
                "tooltip": { "field": "label" }
            }
        }),
        json!({
            "data": { "values": [{
                "score": medians.score,
                "label": format!("Median Score ({:.1})", medians.score),
            }]},
            "mark": { "type": "rule", "strokeDash": [6, 4] },
            "encoding": {
                "y": { "field": "score", "type": "quantitative" },
                "tooltip": { "field": "label" }
            }
        }),
    ];

    if let Some(line) = analysis.trend_line {
        let times = analysis.assignments.iter().map(|a| a.record.time_minutes);
        let lo = times.clone().fold(f64::INFINITY, f64::min);
        let hi = times.fold(f64::NEG_INFINITY, f64::max);
        layers.push(json!({
            "data": { "values": [
                { "time": lo, "score": line.at(lo) },
                { "time": hi, "score": line.at(hi) },
            ]},
            "mark": { "type": "line", "opacity": 0.5 },
            "encoding": {
                "x": { "field": "time", "type": "quantitative" },
                "y": { "field": "score", "type": "quantitative" }
            }
        }));
    }

    json!({
        "$schema": SCHEMA,
        "title": "Student Segmentation (Quadrant Analysis)",
        "layer": layers,
    })
}

/// Writes both figures into `dir`, creating it if needed.
pub fn write_plots(analysis: &Analysis, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create plot directory {}", dir.display()))?;

    let mut written = Vec::new();
    for (name, figure) in [
        (DISTRIBUTION_FILE, distribution_figure(analysis)),
        (SEGMENTATION_FILE, segmentation_figure(analysis)),
    ] {
        let path = dir.join(name);
        let body = serde_json::to_string_pretty(&figure)?;
        std::fs::write(&path, body)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
