//! Evaluation metrics for uplift models.
//!
//! Given observed outcomes, predicted uplift scores and a binary treatment assignment, this
//! crate builds Uplift and Qini curves, integrates them into AUUC/AUQC, and scores the
//! treatment effect among the top-ranked subjects.
//!
//! All functions are pure: they borrow their inputs, allocate fresh outputs, and return a
//! [`UpliftMetricsError`] for invalid input before doing any work.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod area;
pub mod curves;
pub mod error;
pub mod ranking;
pub mod statistics_util;
pub mod top_k;

pub use area::{auqc, auuc, trapezoid};
pub use curves::{Curve, CurveKind, qini_curve, uplift_curve};
pub use error::UpliftMetricsError;
pub use ranking::{RankedSample, rank_by_score};
pub use top_k::{Average, Group, TopK, uplift_at_k};
