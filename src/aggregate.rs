//! Reductions over the consolidated sample series.

use crate::error::{AggregateError, Result};

/// Arithmetic total in series order; `0.0` for an empty series
pub fn sum(samples: &[f64]) -> f64 {
    // Float `Sum` starts from -0.0, which would print as "-0"
    samples.iter().fold(0.0, |total, sample| total + sample)
}

/// Arithmetic mean.
///
/// An empty series has no mean, so it is reported as `EmptySeries` instead
/// of producing NaN.
pub fn average(samples: &[f64]) -> Result<f64> {
    if samples.is_empty() {
        return Err(AggregateError::EmptySeries);
    }
    Ok(sum(samples) / samples.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum() {
        assert_eq!(sum(&[10.0, 20.0, 30.0, 40.0]), 100.0);
        assert_eq!(sum(&[-1.5, 1.5]), 0.0);
    }

    #[test]
    fn test_sum_empty_is_zero() {
        let total = sum(&[]);
        assert_eq!(total, 0.0);
        assert!(total.is_sign_positive());
        assert_eq!(total.to_string(), "0");
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[10.0, 20.0, 30.0, 40.0]).unwrap(), 25.0);
        assert_eq!(average(&[7.0]).unwrap(), 7.0);
    }

    #[test]
    fn test_average_empty_is_error() {
        assert!(matches!(average(&[]), Err(AggregateError::EmptySeries)));
    }

    #[test]
    fn test_sum_is_order_independent_for_exact_values() {
        let forward = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut reversed = forward;
        reversed.reverse();
        assert_eq!(sum(&forward), sum(&reversed));
    }
}
