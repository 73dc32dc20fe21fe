//! Ranking and treatment/control partition shared by every uplift metric.
//!
//! Subjects are ordered by predicted uplift, highest first. The sort is stable, so subjects
//! with identical scores keep their input order and repeated calls produce identical rankings.

use tracing::{debug, instrument};

use crate::error::UpliftMetricsError;

/// Treatment label for a treated subject.
pub const TREATED: u8 = 1;
/// Treatment label for a control subject.
pub const CONTROL: u8 = 0;

/// The inputs reordered by descending score, plus per-group views of the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSample {
    pub outcome: Vec<f64>,
    pub score: Vec<f64>,
    pub treatment: Vec<u8>,
    /// Ranked outcome with treated entries zeroed
    pub outcome_control: Vec<f64>,
    /// Ranked outcome with control entries zeroed
    pub outcome_treated: Vec<f64>,
}

impl RankedSample {
    pub fn len(&self) -> usize {
        self.score.len()
    }

    pub fn is_empty(&self) -> bool {
        self.score.is_empty()
    }

    pub fn num_treated(&self) -> usize {
        self.treatment.iter().filter(|&&t| t == TREATED).count()
    }

    pub fn num_control(&self) -> usize {
        self.len() - self.num_treated()
    }

    /// Ranked outcomes of a single group, best-scored first.
    pub fn group_outcomes(&self, label: u8) -> impl Iterator<Item = f64> + '_ {
        self.outcome
            .iter()
            .zip(self.treatment.iter())
            .filter(move |&(_, &t)| t == label)
            .map(|(&y, _)| y)
    }
}

/// Checks that the three inputs describe the same non-empty population with binary treatment.
///
/// Returns the number of samples.
pub fn validate_inputs(
    outcome: &[f64],
    score: &[f64],
    treatment: &[u8],
) -> Result<usize, UpliftMetricsError> {
    if outcome.len() != score.len() || outcome.len() != treatment.len() {
        return Err(UpliftMetricsError::LengthMismatch {
            outcome_len: outcome.len(),
            score_len: score.len(),
            treatment_len: treatment.len(),
        });
    }
    if outcome.is_empty() {
        return Err(UpliftMetricsError::EmptyInput);
    }
    if let Some((index, &value)) = treatment
        .iter()
        .enumerate()
        .find(|&(_, &t)| t != TREATED && t != CONTROL)
    {
        return Err(UpliftMetricsError::InvalidTreatment { index, value });
    }
    Ok(outcome.len())
}

/// Returns the permutation that sorts `score` in descending order.
///
/// Ties keep their original relative order. Scores compare by IEEE equality, so `0.0` and
/// `-0.0` tie; only NaN falls back to `f64::total_cmp`.
pub fn descending_order(score: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..score.len()).collect();
    order.sort_by(|&a, &b| {
        score[b]
            .partial_cmp(&score[a])
            .unwrap_or_else(|| score[b].total_cmp(&score[a]))
    });
    order
}

/// Validates the inputs, ranks them by descending score and builds the per-group outcome views.
#[instrument(skip_all, fields(num_samples = outcome.len()))]
pub fn rank_by_score(
    outcome: &[f64],
    score: &[f64],
    treatment: &[u8],
) -> Result<RankedSample, UpliftMetricsError> {
    validate_inputs(outcome, score, treatment)?;
    Ok(rank_validated(outcome, score, treatment))
}

/// Ranks inputs that already passed `validate_inputs`.
pub(crate) fn rank_validated(outcome: &[f64], score: &[f64], treatment: &[u8]) -> RankedSample {
    let order = descending_order(score);

    let outcome: Vec<f64> = order.iter().map(|&i| outcome[i]).collect();
    let score: Vec<f64> = order.iter().map(|&i| score[i]).collect();
    let treatment: Vec<u8> = order.iter().map(|&i| treatment[i]).collect();

    let (outcome_control, outcome_treated): (Vec<f64>, Vec<f64>) = outcome
        .iter()
        .zip(treatment.iter())
        .map(|(&y, &t)| if t == TREATED { (0.0, y) } else { (y, 0.0) })
        .unzip();

    let ranked = RankedSample {
        outcome,
        score,
        treatment,
        outcome_control,
        outcome_treated,
    };
    debug!(
        num_treated = ranked.num_treated(),
        num_control = ranked.num_control(),
        "Ranked samples by descending score"
    );
    ranked
}
