use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::engine::RuleRegistry;
use crate::rules::loader::{RuleLoadError, RuleSource, builtin_rule_sources, read_rule_sources};

mod batch;
mod genes;
mod interpret;
mod validate;

#[derive(Parser, Debug)]
#[command(
    name = "pgx-interpret",
    version,
    about = "Pharmacogenomic genotype interpretation"
)]
pub struct Cli {
    #[command(flatten)]
    rules: RulesArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Genes(genes::GenesArgs),
    Validate(validate::ValidateArgs),
    Interpret(interpret::InterpretArgs),
    Batch(batch::BatchArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RulesArgs {
    /// Rule directory replacing the built-in rule set
    #[arg(long, global = true)]
    rules: Option<PathBuf>,
}

impl RulesArgs {
    pub fn sources(&self) -> Result<Vec<RuleSource>, RuleLoadError> {
        match &self.rules {
            Some(dir) => read_rule_sources(dir),
            None => Ok(builtin_rule_sources()),
        }
    }

    pub fn load(&self) -> Result<RuleRegistry, RuleLoadError> {
        RuleRegistry::from_sources(&self.sources()?)
    }
}

impl Cli {
    pub fn dispatch(self) -> anyhow::Result<()> {
        match self.command {
            Command::Genes(args) => genes::handle(&self.rules, args),
            Command::Validate(args) => validate::handle(&self.rules, args),
            Command::Interpret(args) => interpret::handle(&self.rules, args),
            Command::Batch(args) => batch::handle(&self.rules, args),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/cli/mod.rs"]
mod tests;
