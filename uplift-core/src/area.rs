//! Areas under uplift curves.

use tracing::{debug, instrument};

use crate::curves::{qini_curve, uplift_curve};
use crate::error::UpliftMetricsError;

/// Computes the area under a curve given by points `(x[i], y[i])` with the trapezoidal rule.
///
/// `x` must be monotonic. When it is decreasing the area is sign-corrected so that it matches
/// the area of the same curve traversed left to right.
///
/// # Errors
///
/// Returns `UpliftMetricsError` if `x` and `y` differ in length, if there are fewer than two
/// points, or if `x` is neither increasing nor decreasing.
pub fn trapezoid(x: &[f64], y: &[f64]) -> Result<f64, UpliftMetricsError> {
    if x.len() != y.len() {
        return Err(UpliftMetricsError::CurveLengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(UpliftMetricsError::TooFewPoints {
            num_points: x.len(),
        });
    }

    let decreasing = x.windows(2).any(|w| w[1] < w[0]);
    if decreasing && let Some(index) = x.windows(2).position(|w| w[1] > w[0]) {
        return Err(UpliftMetricsError::NonMonotonicX { index: index + 1 });
    }
    let direction = if decreasing { -1.0 } else { 1.0 };

    let area: f64 = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum();
    Ok(direction * area)
}

/// Computes the Area Under the Uplift Curve from prediction scores.
///
/// No random-targeting baseline is subtracted.
#[instrument(skip_all, fields(num_samples = outcome.len()))]
pub fn auuc(outcome: &[f64], score: &[f64], treatment: &[u8]) -> Result<f64, UpliftMetricsError> {
    let area = uplift_curve(outcome, score, treatment)?.area()?;
    debug!(auuc = area, "Computed area under the uplift curve");
    Ok(area)
}

/// Computes the Area Under the Qini Curve (the Qini coefficient) from prediction scores.
///
/// No random-targeting baseline is subtracted.
#[instrument(skip_all, fields(num_samples = outcome.len()))]
pub fn auqc(outcome: &[f64], score: &[f64], treatment: &[u8]) -> Result<f64, UpliftMetricsError> {
    let area = qini_curve(outcome, score, treatment)?.area()?;
    debug!(auqc = area, "Computed area under the qini curve");
    Ok(area)
}
