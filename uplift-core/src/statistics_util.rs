//! Statistical utility functions.

/// Computes the mean of a slice of data.
pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    if count == 0 {
        return None;
    }

    Some(sum / count as f64)
}

/// Divides `numerator` by a population `count`, returning exactly 0 when the count is 0.
///
/// Curve construction divides by running group sizes that are legitimately zero at the
/// start of a ranking (or for a group that has not appeared yet), and those positions
/// must contribute nothing rather than NaN or infinity.
pub fn ratio_or_zero(numerator: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        numerator / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
        assert_eq!(mean(&[0.5]), Some(0.5));
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_ratio_or_zero() {
        assert_eq!(ratio_or_zero(3.0, 2), 1.5);
        assert_eq!(ratio_or_zero(-4.0, 8), -0.5);
    }

    #[test]
    fn test_ratio_or_zero_zero_count() {
        // Zero counts never produce NaN or infinity, even with a zero numerator
        assert_eq!(ratio_or_zero(0.0, 0), 0.0);
        assert_eq!(ratio_or_zero(5.0, 0), 0.0);
        assert!(ratio_or_zero(-5.0, 0).is_finite());
    }
}
