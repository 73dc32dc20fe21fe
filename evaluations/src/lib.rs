#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uplift_core::{Average, TopK, qini_curve, uplift_curve};
use uuid::Uuid;

// Public re-exports for external consumers
pub use dataset::{Dataset, Observation};
pub use stats::{EvaluationReport, Metric};
pub use types::{EvaluationUpdate, RunInfo};

use stats::write_update;

pub mod config;
pub mod dataset;
pub mod helpers;
pub mod stats;
pub mod types;

/// Window used when neither the command line nor the defaults file sets `k`.
pub const DEFAULT_TOP_K: TopK = TopK::Fraction(0.3);

#[derive(clap::ValueEnum, Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[clap(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Jsonl,
    #[default]
    Pretty,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a JSONL dataset with one `{"outcome", "score", "treatment"}` object per line.
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Size of the top-k window: an integer count, or a fraction of the population in (0, 1).
    /// Defaults to 0.3.
    #[arg(short = 'k', long = "top-k", value_parser = parse_top_k)]
    pub k: Option<TopK>,

    /// How the top-k window is taken: `first` (over both groups) or `group` (per group).
    /// Defaults to `first`.
    #[arg(short, long, value_parser = parse_average)]
    pub average: Option<Average>,

    #[arg(short, long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Also write the Uplift and Qini curves.
    #[arg(long)]
    pub curves: bool,

    /// Minimum acceptable value per metric. The run fails if any metric is below its cutoff.
    /// Format: metric=cutoff, comma-separated for multiple metrics.
    /// Example: --cutoff auuc=1.5,uplift_at_k=0.05
    #[arg(long = "cutoff", value_parser = parse_cutoff, value_delimiter = ',', num_args = 0..)]
    pub cutoffs: Vec<(Metric, f64)>,
}

fn parse_top_k(s: &str) -> Result<TopK, String> {
    s.parse::<TopK>().map_err(|e| e.to_string())
}

fn parse_average(s: &str) -> Result<Average, String> {
    s.trim().parse::<Average>().map_err(|e| e.to_string())
}

/// Parse a single cutoff in format "metric=cutoff"
fn parse_cutoff(s: &str) -> Result<(Metric, f64), String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Cutoff cannot be empty".to_string());
    }

    let Some((metric, cutoff)) = s.split_once('=') else {
        return Err(format!(
            "Invalid cutoff format: '{s}'. Expected format: metric=cutoff"
        ));
    };

    let metric = metric.trim().parse::<Metric>()?;
    let cutoff = cutoff
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("Invalid cutoff value '{cutoff}': {e}"))?;

    if !cutoff.is_finite() {
        return Err(format!("Cutoff value must be finite, got {cutoff}"));
    }

    Ok((metric, cutoff))
}

/// Runs a single evaluation from CLI arguments.
///
/// Loads the dataset and computes the metrics report, then writes the run info and the
/// report (plus both curves when `--curves` is set) to `writer` and checks the configured
/// cutoffs. Nothing is written if the dataset or the report cannot be produced.
///
/// Returns an error if the dataset cannot be loaded, a metric cannot be computed, or any
/// metric is below its cutoff. In pretty mode the failed cutoffs are also written out.
#[instrument(skip_all, fields(evaluation_run_id = %evaluation_run_id, format = ?args.format))]
pub fn run_evaluation(args: Args, evaluation_run_id: Uuid, mut writer: impl Write) -> Result<()> {
    let Some(dataset_path) = args.dataset else {
        bail!(
            "--dataset must be provided either as a CLI arg or in ~/{}",
            config::DEFAULTS_FILE_NAME
        );
    };
    let k = args.k.unwrap_or(DEFAULT_TOP_K);
    let average = args.average.unwrap_or_default();
    debug!(k = %k, average = %average, "Resolved top-k settings");

    let dataset = Dataset::load(&dataset_path)?;
    let num_treated = dataset.num_treated();
    let run_info = RunInfo {
        evaluation_run_id,
        num_datapoints: dataset.len(),
        num_treated,
        num_control: dataset.len() - num_treated,
    };
    let report = EvaluationReport::compute(&dataset, k, average)?;
    write_update(
        &mut writer,
        &EvaluationUpdate::RunInfo(run_info),
        &args.format,
    )?;
    write_update(
        &mut writer,
        &EvaluationUpdate::Report(report.clone()),
        &args.format,
    )?;

    if args.curves {
        let Dataset {
            outcome,
            score,
            treatment,
        } = &dataset;
        for curve in [
            uplift_curve(outcome, score, treatment)?,
            qini_curve(outcome, score, treatment)?,
        ] {
            write_update(&mut writer, &EvaluationUpdate::Curve(curve), &args.format)?;
        }
    }

    let failures = check_metric_cutoffs(&report, &args.cutoffs);
    if args.format == OutputFormat::Pretty {
        for (metric, cutoff, actual) in &failures {
            writeln!(
                writer,
                "Failed cutoff for metric {metric} ({cutoff:.2}, got {actual:.2})"
            )?;
        }
    }
    if !failures.is_empty() {
        let failure_messages = format_cutoff_failures(&failures);
        bail!("Failed cutoffs for metrics: {failure_messages}");
    }

    info!("Evaluation finished");
    Ok(())
}

/// Checks if metrics meet their cutoff thresholds
///
/// Returns a vector of failures with (metric, cutoff, actual_value)
pub fn check_metric_cutoffs(
    report: &EvaluationReport,
    cutoffs: &[(Metric, f64)],
) -> Vec<(Metric, f64, f64)> {
    cutoffs
        .iter()
        .filter_map(|&(metric, cutoff)| {
            let actual = report.metric(metric);
            (actual < cutoff).then_some((metric, cutoff, actual))
        })
        .collect()
}

/// Formats a list of cutoff failures into a human-readable string
pub fn format_cutoff_failures(failures: &[(Metric, f64, f64)]) -> String {
    failures
        .iter()
        .map(|(metric, cutoff, actual)| format!("{metric} (cutoff: {cutoff:.2}, got: {actual:.2})"))
        .collect::<Vec<_>>()
        .join("\n")
}
