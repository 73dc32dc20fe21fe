use thiserror::Error;

use crate::top_k::{Group, TopK};

/// Errors that can occur when computing uplift metrics. Every variant describes invalid input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpliftMetricsError {
    #[error(
        "Length mismatch: outcome = {outcome_len}, score = {score_len}, treatment = {treatment_len}"
    )]
    LengthMismatch {
        outcome_len: usize,
        score_len: usize,
        treatment_len: usize,
    },
    #[error("Need at least one sample, got none")]
    EmptyInput,
    #[error("Treatment must be 0 or 1, got {value} at position {index}")]
    InvalidTreatment { index: usize, value: u8 },
    #[error("Uplift score supports only the `first` and `group` averaging methods, got `{average}`")]
    InvalidAverage { average: String },
    #[error("Invalid value for k: `{value}` is neither an integer nor a float")]
    InvalidTopK { value: String },
    #[error(
        "k={k} should be either a positive integer smaller than the number of samples {num_samples} or a float in the (0, 1) range"
    )]
    TopKOutOfRange { k: TopK, num_samples: usize },
    #[error(
        "With k={k}, the first {window} observations exceed the number of samples in the {group} group: {group_size}"
    )]
    GroupWindowTooLarge {
        k: TopK,
        group: Group,
        window: usize,
        group_size: usize,
    },
    #[error("With k={k}, there are no {group} observations among the first {window} observations")]
    EmptyGroupWindow { k: TopK, group: Group, window: usize },
    #[error("Curve length mismatch: x = {x_len}, y = {y_len}")]
    CurveLengthMismatch { x_len: usize, y_len: usize },
    #[error("At least 2 points are needed to compute an area under a curve, got {num_points}")]
    TooFewPoints { num_points: usize },
    #[error("x is neither increasing nor decreasing at position {index}")]
    NonMonotonicX { index: usize },
}
