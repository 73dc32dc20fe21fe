use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uplift_core::ranking::TREATED;

/// A single subject: observed outcome, predicted uplift and treatment assignment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub outcome: f64,
    pub score: f64,
    pub treatment: u8,
}

/// Column-oriented view of a dataset, in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub outcome: Vec<f64>,
    pub score: Vec<f64>,
    pub treatment: Vec<u8>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.outcome.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcome.is_empty()
    }

    pub fn num_treated(&self) -> usize {
        self.treatment.iter().filter(|&&t| t == TREATED).count()
    }

    pub fn push(&mut self, observation: Observation) {
        self.outcome.push(observation.outcome);
        self.score.push(observation.score);
        self.treatment.push(observation.treatment);
    }

    /// Reads one JSON observation per line. Blank lines are skipped.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        reader
            .lines()
            .enumerate()
            .filter_map(|(index, line)| {
                let line_number = index + 1;
                let line = match line.with_context(|| format!("Failed to read line {line_number}"))
                {
                    Ok(line) => line,
                    Err(e) => return Some(Err(e)),
                };
                let line = line.trim();
                if line.is_empty() {
                    return None;
                }
                Some(
                    serde_json::from_str::<Observation>(line)
                        .with_context(|| format!("Invalid observation on line {line_number}")),
                )
            })
            .collect()
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading dataset");
        let file = File::open(path)
            .with_context(|| format!("Failed to open dataset at {}", path.display()))?;
        let dataset = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse dataset at {}", path.display()))?;
        debug!(
            num_datapoints = dataset.len(),
            num_treated = dataset.num_treated(),
            "Loaded dataset"
        );
        Ok(dataset)
    }
}

impl FromIterator<Observation> for Dataset {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        let mut dataset = Dataset::default();
        for observation in iter {
            dataset.push(observation);
        }
        dataset
    }
}
