use std::collections::HashSet;

use clap::Args;
use tracing::{info, warn};

use crate::cli::RulesArgs;
use crate::engine::RuleSetVersion;
use crate::rules::loader::{
    RuleSource, builtin_rule_sources, compile_sources, default_rules_dir, fingerprint,
    read_rule_sources,
};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Check the compiled-in rule set even when an on-disk one is found
    #[arg(long)]
    builtin: bool,
}

pub fn handle(rules: &RulesArgs, args: ValidateArgs) -> anyhow::Result<()> {
    let sources = select_sources(rules, &args)?;
    let compiled = compile_sources(&sources)?;

    let mut seen = HashSet::new();
    let mut n_issues = 0usize;
    println!("source\tgene\tissue");
    for entry in &compiled {
        if !seen.insert(entry.gene_key.as_str()) {
            n_issues += 1;
            println!("{}\t{}\tgene declared twice", entry.source, entry.gene_key);
        }
        for issue in &entry.issues {
            n_issues += 1;
            println!("{}\t{}\t{}", entry.source, entry.gene_key, issue);
        }
    }

    let version = RuleSetVersion {
        fingerprint: fingerprint(&sources),
    };
    if n_issues > 0 {
        warn!(genes = compiled.len(), issues = n_issues, %version, "rule set rejected");
        anyhow::bail!("rule set has {n_issues} issue(s)");
    }
    info!(genes = compiled.len(), %version, "rule set valid");
    Ok(())
}

fn select_sources(rules: &RulesArgs, args: &ValidateArgs) -> anyhow::Result<Vec<RuleSource>> {
    if rules.rules.is_some() {
        return Ok(rules.sources()?);
    }
    let dir = default_rules_dir();
    if !args.builtin && dir.is_dir() {
        info!(dir = %dir.display(), "validating on-disk rule set");
        return Ok(read_rule_sources(&dir)?);
    }
    Ok(builtin_rule_sources())
}
