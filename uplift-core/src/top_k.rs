//! Uplift score at the top k observations.
//!
//! The score is the mean outcome of treated subjects minus the mean outcome of control
//! subjects, both restricted to the best-ranked part of the population. `Average::First`
//! takes one window over the pooled ranking while `Average::Group` takes a separate window
//! inside each group.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::UpliftMetricsError;
use crate::ranking::{CONTROL, RankedSample, TREATED, rank_validated, validate_inputs};
use crate::statistics_util::mean;

/// Size of the top-k window.
///
/// A `Count` is an absolute number of observations and must lie strictly between 0 and the
/// number of samples. A `Fraction` is a share of the population, strictly between 0 and 1,
/// and resolves to `ceil(fraction * population)` observations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopK {
    Count(usize),
    Fraction(f64),
}

impl TopK {
    fn validate(self, num_samples: usize) -> Result<(), UpliftMetricsError> {
        let in_range = match self {
            TopK::Count(k) => k > 0 && k < num_samples,
            TopK::Fraction(f) => f > 0.0 && f < 1.0,
        };
        if in_range {
            Ok(())
        } else {
            Err(UpliftMetricsError::TopKOutOfRange { k: self, num_samples })
        }
    }

    /// Number of observations in the window for a population of `population` subjects.
    pub fn window(self, population: usize) -> usize {
        match self {
            TopK::Count(k) => k,
            TopK::Fraction(f) => (f * population as f64).ceil() as usize,
        }
    }
}

impl fmt::Display for TopK {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopK::Count(k) => write!(f, "{k}"),
            TopK::Fraction(fraction) => write!(f, "{fraction:?}"),
        }
    }
}

/// Integer literals parse as a `Count`; any other float literal (including `2.0`) parses as
/// a `Fraction`.
impl FromStr for TopK {
    type Err = UpliftMetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(count) = s.parse::<usize>() {
            return Ok(TopK::Count(count));
        }
        s.parse::<f64>()
            .map(TopK::Fraction)
            .map_err(|_| UpliftMetricsError::InvalidTopK {
                value: s.to_string(),
            })
    }
}

/// Strategy for choosing the top-k observations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Average {
    /// Take the first k observations over both groups, then average each group inside them
    #[default]
    First,
    /// Take the first k observations of each group separately
    Group,
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Average::First => write!(f, "first"),
            Average::Group => write!(f, "group"),
        }
    }
}

impl FromStr for Average {
    type Err = UpliftMetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Average::First),
            "group" => Ok(Average::Group),
            other => Err(UpliftMetricsError::InvalidAverage {
                average: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Control,
    Treatment,
}

impl Group {
    fn label(self) -> u8 {
        match self {
            Group::Control => CONTROL,
            Group::Treatment => TREATED,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Control => write!(f, "control"),
            Group::Treatment => write!(f, "treatment"),
        }
    }
}

/// Mean outcome of `group` among the first `window` observations of the pooled ranking.
fn pooled_window_mean(
    ranked: &RankedSample,
    group: Group,
    window: usize,
    k: TopK,
) -> Result<f64, UpliftMetricsError> {
    let outcomes: Vec<f64> = ranked
        .outcome
        .iter()
        .zip(ranked.treatment.iter())
        .take(window)
        .filter(|&(_, &t)| t == group.label())
        .map(|(&y, _)| y)
        .collect();
    mean(&outcomes).ok_or(UpliftMetricsError::EmptyGroupWindow { k, group, window })
}

/// Mean outcome over the first `ceil(k)` observations of `group` alone.
fn group_window_mean(
    ranked: &RankedSample,
    group: Group,
    k: TopK,
) -> Result<f64, UpliftMetricsError> {
    let group_size = ranked.group_outcomes(group.label()).count();
    let window = k.window(group_size);
    if window > group_size {
        return Err(UpliftMetricsError::GroupWindowTooLarge {
            k,
            group,
            window,
            group_size,
        });
    }
    debug!(%group, window, group_size, "Resolved per-group window");
    let outcomes: Vec<f64> = ranked.group_outcomes(group.label()).take(window).collect();
    mean(&outcomes).ok_or(UpliftMetricsError::EmptyGroupWindow { k, group, window })
}

/// Computes the uplift score at the first k observations.
///
/// Returns the mean outcome of the top-k treated subjects minus the mean outcome of the
/// top-k control subjects, where "top-k" follows `average`.
///
/// # Errors
///
/// Returns `UpliftMetricsError` if:
/// - The inputs have different lengths, are empty, or contain a treatment other than 0/1
/// - `k` is a count outside `(0, num_samples)` or a fraction outside `(0, 1)`
/// - With `Average::Group`, the window is larger than the control or treatment group
/// - A group has no observations inside its window
#[instrument(skip_all, fields(num_samples = outcome.len(), k = %k, average = %average))]
pub fn uplift_at_k(
    outcome: &[f64],
    score: &[f64],
    treatment: &[u8],
    k: TopK,
    average: Average,
) -> Result<f64, UpliftMetricsError> {
    let num_samples = validate_inputs(outcome, score, treatment)?;
    k.validate(num_samples)?;
    let ranked = rank_validated(outcome, score, treatment);

    let (score_control, score_treatment) = match average {
        Average::First => {
            let window = k.window(num_samples);
            debug!(window, "Resolved pooled window");
            (
                pooled_window_mean(&ranked, Group::Control, window, k)?,
                pooled_window_mean(&ranked, Group::Treatment, window, k)?,
            )
        }
        Average::Group => (
            group_window_mean(&ranked, Group::Control, k)?,
            group_window_mean(&ranked, Group::Treatment, k)?,
        ),
    };
    Ok(score_treatment - score_control)
}
