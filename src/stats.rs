//! Descriptive statistics over attempt columns.
//!
//! Percentiles use linear interpolation between order statistics: the value
//! at position `(n - 1) * p` of the sorted sample.

use crate::models::{CorrelationResult, FieldSummary, Trend, TrendLine};

/// Correlations with a magnitude below this are reported as no relationship.
pub const CORRELATION_THRESHOLD: f64 = 0.2;

/// Power of two at or above the largest magnitude. Dividing by it is exact
/// and keeps sums of squares of large inputs from overflowing.
fn scale_of(values: &[f64]) -> f64 {
    let max_abs = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if max_abs == 0.0 || !max_abs.is_finite() {
        return 1.0;
    }
    2f64.powi(max_abs.log2().ceil().clamp(-1022.0, 1023.0) as i32)
}

fn scaled(values: &[f64]) -> (f64, Vec<f64>) {
    let scale = scale_of(values);
    (scale, values.iter().map(|v| v / scale).collect())
}

/// Every value identical. Decided on the raw data, since rounding in the
/// mean leaves a tiny non-zero spread for constants like 0.1.
fn is_constant(values: &[f64]) -> bool {
    match values.split_first() {
        Some((first, rest)) => rest.iter().all(|v| v == first),
        None => true,
    }
}

fn unscaled_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn unscaled_covariance(xs: &[f64], ys: &[f64]) -> f64 {
    let mx = unscaled_mean(xs);
    let my = unscaled_mean(ys);
    let sum: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    sum / (xs.len() - 1) as f64
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let (scale, values) = scaled(values);
    Some(unscaled_mean(&values) * scale)
}

/// Sample standard deviation (denominator n - 1).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    if is_constant(values) {
        return Some(0.0);
    }
    let (scale, values) = scaled(values);
    let std = unscaled_covariance(&values, &values).sqrt() * scale;
    std.is_finite().then_some(std)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn percentile_of_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    percentile_of_sorted(&sorted(values), p)
}

pub fn median(values: &[f64]) -> Option<f64> {
    percentile(values, 0.5)
}

pub fn summarize(field: &str, values: &[f64]) -> Option<FieldSummary> {
    let sorted = sorted(values);
    let (&min, &max) = (sorted.first()?, sorted.last()?);
    Some(FieldSummary {
        field: field.to_string(),
        count: sorted.len(),
        mean: mean(&sorted)?,
        std_dev: std_dev(&sorted),
        min,
        p25: percentile_of_sorted(&sorted, 0.25)?,
        p50: percentile_of_sorted(&sorted, 0.5)?,
        p75: percentile_of_sorted(&sorted, 0.75)?,
        max,
    })
}

/// Pearson correlation, `None` when either side is constant, there are fewer
/// than two values, or the result is not a finite number.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 || is_constant(xs) || is_constant(ys) {
        return None;
    }
    // correlation is scale-invariant, so the scale factors drop out
    let (_, xs) = scaled(xs);
    let (_, ys) = scaled(ys);
    let cov = unscaled_covariance(&xs, &ys);
    let sx = unscaled_covariance(&xs, &xs).sqrt();
    let sy = unscaled_covariance(&ys, &ys).sqrt();
    let r = cov / (sx * sy);
    if !r.is_finite() {
        return None;
    }
    // rounding can push a perfect fit just past the bound
    Some(r.clamp(-1.0, 1.0))
}

pub fn classify(coefficient: f64) -> Trend {
    if coefficient.abs() < CORRELATION_THRESHOLD {
        Trend::None
    } else if coefficient > 0.0 {
        Trend::Positive
    } else {
        Trend::Negative
    }
}

pub fn correlation(xs: &[f64], ys: &[f64]) -> CorrelationResult {
    match pearson(xs, ys) {
        Some(r) => CorrelationResult {
            coefficient: Some(r),
            trend: classify(r),
        },
        None => CorrelationResult {
            coefficient: None,
            trend: Trend::Undefined,
        },
    }
}

/// Ordinary least-squares line of `ys` on `xs`. `None` when time is constant.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<TrendLine> {
    if xs.len() != ys.len() || xs.len() < 2 || is_constant(xs) {
        return None;
    }
    let (x_scale, scaled_xs) = scaled(xs);
    let (y_scale, scaled_ys) = scaled(ys);
    let var_x = unscaled_covariance(&scaled_xs, &scaled_xs);
    if var_x == 0.0 {
        return None;
    }
    let slope = unscaled_covariance(&scaled_xs, &scaled_ys) / var_x * (y_scale / x_scale);
    let intercept = mean(ys)? - slope * mean(xs)?;
    (slope.is_finite() && intercept.is_finite()).then_some(TrendLine { slope, intercept })
}
