use crate::error::EfficiencyError;
use crate::models::AttemptRecord;

pub const DEFAULT_PRECISION: usize = 2;

/// Score per minute. NaN time is rejected along with zero and negative time,
/// and a NaN or infinite score never reaches the division.
pub fn score_per_minute(score: f64, time_minutes: f64) -> Result<f64, EfficiencyError> {
    if time_minutes.is_nan() || time_minutes <= 0.0 {
        return Err(EfficiencyError::NonPositiveTime { time: time_minutes });
    }
    if !score.is_finite() {
        return Err(EfficiencyError::NonFiniteScore { score });
    }
    Ok(score / time_minutes)
}

pub fn compute_efficiency(record: &AttemptRecord) -> Result<f64, EfficiencyError> {
    score_per_minute(record.score, record.time_minutes)
}

/// One-line result for a single score/time pair. Errors become the message.
pub fn calculate(score: f64, time_minutes: f64, precision: usize) -> String {
    match score_per_minute(score, time_minutes) {
        Ok(value) => format!("Efficiency: {value:.precision$} points/min"),
        Err(EfficiencyError::NonPositiveTime { .. }) => "Time must be > 0".to_string(),
        Err(EfficiencyError::NonFiniteScore { .. }) => "Score must be a finite number".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn calculator_formats_two_decimals() {
        assert_eq!(calculate(80.0, 40.0, DEFAULT_PRECISION), "Efficiency: 2.00 points/min");
    }

    #[test]
    fn calculator_supports_three_decimals() {
        assert_eq!(calculate(70.0, 30.0, 3), "Efficiency: 2.333 points/min");
    }

    #[test]
    fn calculator_rejects_zero_and_negative_time() {
        assert_eq!(calculate(80.0, 0.0, DEFAULT_PRECISION), "Time must be > 0");
        assert_eq!(calculate(80.0, -5.0, DEFAULT_PRECISION), "Time must be > 0");
        assert_eq!(calculate(80.0, f64::NAN, DEFAULT_PRECISION), "Time must be > 0");
    }

    #[test]
    fn calculator_rejects_non_finite_score() {
        assert_eq!(calculate(f64::NAN, 40.0, DEFAULT_PRECISION), "Score must be a finite number");
        assert_eq!(
            calculate(f64::INFINITY, 40.0, DEFAULT_PRECISION),
            "Score must be a finite number"
        );
        assert!(matches!(
            score_per_minute(f64::NAN, 40.0),
            Err(EfficiencyError::NonFiniteScore { .. })
        ));
    }

    #[test]
    fn record_efficiency_errors_on_zero_time() {
        let record = AttemptRecord {
            time_minutes: 0.0,
            score: 50.0,
        };
        assert_eq!(
            compute_efficiency(&record),
            Err(EfficiencyError::NonPositiveTime { time: 0.0 })
        );
    }

    proptest! {
        #[test]
        fn efficiency_is_score_over_time(score in 0.0f64..100.0, time in 0.01f64..500.0) {
            let record = AttemptRecord { time_minutes: time, score };
            let value = compute_efficiency(&record).unwrap();
            prop_assert!((value - score / time).abs() < 1e-9);
        }
    }
}
