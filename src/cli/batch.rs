use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use tracing::info;

use crate::batch::run_batch;
use crate::cli::RulesArgs;
use crate::model::locale::Locale;

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// CSV or TSV export with a `gene` column and backend marker columns (.gz allowed)
    #[arg(long)]
    input: PathBuf,

    /// Output directory
    #[arg(long)]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = Locale::En)]
    pub(crate) locale: Locale,
}

pub fn handle(rules: &RulesArgs, args: BatchArgs) -> anyhow::Result<()> {
    let registry = rules.load()?;

    let start = Instant::now();
    info!(input = %args.input.display(), "starting batch");
    let summary = run_batch(&registry, &args.input, &args.out, args.locale)?;
    info!(
        elapsed_ms = start.elapsed().as_millis(),
        rows = summary.rows,
        rules_version = %summary.rules_version,
        "finished batch"
    );
    Ok(())
}
