//! Public API types written by the uplift evaluations binary.
//! Every JSONL output line deserializes into an `EvaluationUpdate`.

use serde::{Deserialize, Serialize};
use uplift_core::Curve;
use uuid::Uuid;

use crate::stats::EvaluationReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub evaluation_run_id: Uuid,
    pub num_datapoints: usize,
    pub num_treated: usize,
    pub num_control: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvaluationUpdate {
    RunInfo(RunInfo),
    Report(EvaluationReport),
    Curve(Curve),
}
