use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uplift_core::{Average, Curve, TopK, UpliftMetricsError, auqc, auuc, uplift_at_k};

use crate::OutputFormat;
use crate::dataset::Dataset;
use crate::types::EvaluationUpdate;

/// A scalar metric that can be reported and gated with a cutoff.
/// Larger values are better for every metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Auuc,
    Auqc,
    UpliftAtK,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Auuc, Metric::Auqc, Metric::UpliftAtK];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Auuc => write!(f, "auuc"),
            Metric::Auqc => write!(f, "auqc"),
            Metric::UpliftAtK => write!(f, "uplift_at_k"),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auuc" => Ok(Metric::Auuc),
            "auqc" => Ok(Metric::Auqc),
            "uplift_at_k" => Ok(Metric::UpliftAtK),
            other => Err(format!(
                "Unknown metric '{other}'. Expected one of: auuc, auqc, uplift_at_k"
            )),
        }
    }
}

/// Metrics computed over a whole dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub auuc: f64,
    pub auqc: f64,
    pub uplift_at_k: f64,
    pub k: TopK,
    pub average: Average,
}

impl EvaluationReport {
    #[instrument(skip_all, fields(num_datapoints = dataset.len(), k = %k, average = %average))]
    pub fn compute(
        dataset: &Dataset,
        k: TopK,
        average: Average,
    ) -> Result<Self, UpliftMetricsError> {
        info!("Computing uplift metrics");
        let Dataset {
            outcome,
            score,
            treatment,
        } = dataset;
        let report = Self {
            auuc: auuc(outcome, score, treatment)?,
            auqc: auqc(outcome, score, treatment)?,
            uplift_at_k: uplift_at_k(outcome, score, treatment, k, average)?,
            k,
            average,
        };
        debug!(
            auuc = report.auuc,
            auqc = report.auqc,
            uplift_at_k = report.uplift_at_k,
            "Computed uplift metrics"
        );
        Ok(report)
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Auuc => self.auuc,
            Metric::Auqc => self.auqc,
            Metric::UpliftAtK => self.uplift_at_k,
        }
    }
}

/// Writes a single update in the requested output format.
pub fn write_update(
    writer: &mut impl Write,
    update: &EvaluationUpdate,
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Jsonl => {
            writeln!(writer, "{}", serde_json::to_string(update)?)?;
        }
        OutputFormat::Pretty => match update {
            EvaluationUpdate::RunInfo(run_info) => {
                writeln!(writer, "Run ID: {}", run_info.evaluation_run_id)?;
                writeln!(
                    writer,
                    "Number of datapoints: {} (treated: {}, control: {})",
                    run_info.num_datapoints, run_info.num_treated, run_info.num_control
                )?;
            }
            EvaluationUpdate::Report(report) => {
                writeln!(writer, "Top-k window: k={} ({})", report.k, report.average)?;
                for metric in Metric::ALL {
                    writeln!(writer, "{metric}: {:.4}", report.metric(metric))?;
                }
            }
            EvaluationUpdate::Curve(curve) => write_curve_table(writer, curve)?,
        },
    }
    Ok(())
}

fn write_curve_table(writer: &mut impl Write, curve: &Curve) -> Result<()> {
    writeln!(writer, "{} curve:", curve.kind)?;
    writeln!(writer, "  count\tvalue")?;
    for (count, value) in curve.points() {
        writeln!(writer, "  {count}\t{value:.4}")?;
    }
    Ok(())
}
