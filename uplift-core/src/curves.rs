//! Uplift and Qini curves.
//!
//! Both curves walk the ranking once, keeping running treated/control counts and outcome
//! sums, and emit a point at the last subject of every run of equal scores, so a tied block
//! always lands on a single curve point.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::area::trapezoid;
use crate::error::UpliftMetricsError;
use crate::ranking::{RankedSample, TREATED, rank_by_score};
use crate::statistics_util::ratio_or_zero;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// Per-capita outcome difference between treated and control, scaled by the population so far
    Uplift,
    /// Treated outcome sum minus the control outcome sum rescaled to the treated population
    Qini,
}

impl CurveKind {
    fn value_at(self, totals: &ThresholdTotals) -> f64 {
        match self {
            CurveKind::Uplift => {
                let treated_rate = ratio_or_zero(totals.sum_treated, totals.num_treated);
                let control_rate = ratio_or_zero(totals.sum_control, totals.num_control);
                (treated_rate - control_rate) * totals.num_all as f64
            }
            CurveKind::Qini => {
                let population_ratio = ratio_or_zero(totals.num_treated as f64, totals.num_control);
                totals.sum_treated - totals.sum_control * population_ratio
            }
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveKind::Uplift => write!(f, "uplift"),
            CurveKind::Qini => write!(f, "qini"),
        }
    }
}

/// Points on an Uplift or Qini curve.
///
/// `counts[i]` is the number of top-ranked subjects scanned and `values[i]` the curve value
/// there. The first point is always `(0, 0)` and counts are strictly increasing up to the
/// total number of subjects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub kind: CurveKind,
    pub counts: Vec<usize>,
    pub values: Vec<f64>,
}

impl Curve {
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.counts.iter().copied().zip(self.values.iter().copied())
    }

    /// Area under the curve by the trapezoidal rule.
    pub fn area(&self) -> Result<f64, UpliftMetricsError> {
        let x: Vec<f64> = self.counts.iter().map(|&c| c as f64).collect();
        trapezoid(&x, &self.values)
    }

    pub fn into_parts(self) -> (Vec<usize>, Vec<f64>) {
        (self.counts, self.values)
    }
}

/// Running totals over the ranking, taken at the last subject of a run of equal scores.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ThresholdTotals {
    pub num_all: usize,
    pub num_treated: usize,
    pub num_control: usize,
    pub sum_treated: f64,
    pub sum_control: f64,
}

/// Walks the ranking once and collects the running totals at every threshold position.
pub(crate) fn threshold_totals(ranked: &RankedSample) -> Vec<ThresholdTotals> {
    let n = ranked.len();
    let mut running = ThresholdTotals::default();
    let mut thresholds = Vec::new();

    for i in 0..n {
        running.num_all = i + 1;
        if ranked.treatment[i] == TREATED {
            running.num_treated += 1;
        } else {
            running.num_control += 1;
        }
        running.sum_treated += ranked.outcome_treated[i];
        running.sum_control += ranked.outcome_control[i];

        let is_last_of_run = i + 1 == n || ranked.score[i] != ranked.score[i + 1];
        if is_last_of_run {
            thresholds.push(running);
        }
    }
    thresholds
}

fn build_curve(kind: CurveKind, ranked: &RankedSample) -> Curve {
    let thresholds = threshold_totals(ranked);
    let mut counts: Vec<usize> = thresholds.iter().map(|t| t.num_all).collect();
    let mut values: Vec<f64> = thresholds.iter().map(|t| kind.value_at(t)).collect();

    let starts_at_origin = counts.first() == Some(&0) && values.first() == Some(&0.0);
    if !starts_at_origin {
        counts.insert(0, 0);
        values.insert(0, 0.0);
    }

    debug!(
        curve = %kind,
        num_thresholds = thresholds.len(),
        num_points = counts.len(),
        "Built curve"
    );
    Curve {
        kind,
        counts,
        values,
    }
}

/// Computes the Uplift curve.
///
/// For every distinct score threshold the value is
/// `(mean_treated_outcome - mean_control_outcome) * subjects_so_far`, with a group's mean
/// taken as 0 while that group has no subjects yet.
///
/// # Errors
///
/// Returns `UpliftMetricsError` if the inputs have different lengths, are empty, or contain a
/// treatment label other than 0 or 1.
#[instrument(skip_all, fields(num_samples = outcome.len()))]
pub fn uplift_curve(
    outcome: &[f64],
    score: &[f64],
    treatment: &[u8],
) -> Result<Curve, UpliftMetricsError> {
    let ranked = rank_by_score(outcome, score, treatment)?;
    Ok(build_curve(CurveKind::Uplift, &ranked))
}

/// Computes the Qini curve.
///
/// For every distinct score threshold the value is
/// `sum_treated - sum_control * (num_treated / num_control)`, with the ratio taken as 0 while
/// no control subjects have been seen.
///
/// # Errors
///
/// Same conditions as [`uplift_curve`].
#[instrument(skip_all, fields(num_samples = outcome.len()))]
pub fn qini_curve(
    outcome: &[f64],
    score: &[f64],
    treatment: &[u8],
) -> Result<Curve, UpliftMetricsError> {
    let ranked = rank_by_score(outcome, score, treatment)?;
    Ok(build_curve(CurveKind::Qini, &ranked))
}
