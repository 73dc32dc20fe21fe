#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::NamedTempFile;
use uplift_evaluations::{Args, EvaluationUpdate};

/// Path to a dataset under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}/tests/fixtures/{name}",
        std::env::var("CARGO_MANIFEST_DIR").unwrap()
    ))
}

/// Writes the given lines to a temporary JSONL dataset. The file is deleted on drop.
pub fn write_dataset(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

/// Builds CLI arguments for `dataset`, followed by any extra flags.
pub fn args_for(dataset: &Path, extra: &[&str]) -> Args {
    let dataset = dataset.to_str().unwrap();
    let mut argv = vec!["uplift-evaluations", "--dataset", dataset];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).unwrap()
}

/// Parses every line of JSONL output into an `EvaluationUpdate`.
pub fn parse_updates(output: &[u8]) -> Vec<EvaluationUpdate> {
    std::str::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}
