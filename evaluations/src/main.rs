use anyhow::Result;
use clap::Parser;
use uplift_evaluations::{Args, config::load_eval_defaults, helpers::setup_logging, run_evaluation};
use uuid::Uuid;

fn main() -> Result<()> {
    let evaluation_run_id = Uuid::now_v7();
    let mut args = Args::parse();

    // Fill in any flags left unset from ~/.uplift_eval_defaults.toml
    let needs_defaults = args.dataset.is_none() || args.k.is_none() || args.average.is_none();
    if needs_defaults && let Some(defaults) = load_eval_defaults()? {
        defaults.apply(&mut args);
    }

    setup_logging(&args.format)?;
    let writer = std::io::stdout().lock();
    run_evaluation(args, evaluation_run_id, writer)
}
