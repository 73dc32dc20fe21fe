use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;
use uplift_core::{Average, TopK};

use crate::Args;

/// Name of the optional defaults file in the user's home directory.
pub const DEFAULTS_FILE_NAME: &str = ".uplift_eval_defaults.toml";

/// Fallback values for flags left unset on the command line.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EvalDefaults {
    pub dataset: Option<PathBuf>,
    pub k: Option<TopK>,
    pub average: Option<Average>,
}

impl EvalDefaults {
    /// Fills in every field of `args` that was not set explicitly.
    pub fn apply(self, args: &mut Args) {
        if args.dataset.is_none() {
            args.dataset = self.dataset;
        }
        if args.k.is_none() {
            args.k = self.k;
        }
        if args.average.is_none() {
            args.average = self.average;
        }
    }
}

/// Loads `~/.uplift_eval_defaults.toml`, if there is a home directory and the file exists.
pub fn load_eval_defaults() -> Result<Option<EvalDefaults>> {
    let Some(home) = dirs::home_dir() else {
        return Ok(None);
    };
    load_eval_defaults_from(&home.join(DEFAULTS_FILE_NAME))
}

pub fn load_eval_defaults_from(path: &Path) -> Result<Option<EvalDefaults>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read defaults file {}", path.display()))?;
    let defaults: EvalDefaults = toml::from_str(&content)
        .with_context(|| format!("Failed to parse defaults file {}", path.display()))?;
    debug!(path = %path.display(), ?defaults, "Loaded evaluation defaults");
    Ok(Some(defaults))
}
