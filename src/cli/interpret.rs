use clap::Args;
use serde::Serialize;

use crate::cli::RulesArgs;
use crate::engine::{EngineError, interpret};
use crate::model::locale::Locale;
use crate::model::result::{InterpretationRequest, InterpretationResult, MarkerValues};
use crate::model::table::RuleTable;

#[derive(Args, Debug)]
pub struct InterpretArgs {
    /// Gene key or storage table name
    #[arg(long)]
    gene: String,

    /// Marker call as NAME=VALUE; NAME may be the marker name or its backend column
    #[arg(long = "marker", value_parser = parse_marker)]
    pub(crate) markers: Vec<(String, String)>,

    #[arg(long, value_enum, default_value_t = Locale::En)]
    pub(crate) locale: Locale,

    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Serialize)]
struct InterpretOutput<'a> {
    gene: &'a str,
    rules_version: String,
    locale: Locale,
    resolved: bool,
    #[serde(flatten)]
    result: &'a InterpretationResult,
}

pub fn handle(rules: &RulesArgs, args: InterpretArgs) -> anyhow::Result<()> {
    let registry = rules.load()?;
    let gene_key = registry
        .canonical_gene_key(&args.gene)
        .ok_or_else(|| EngineError::UnknownGene(args.gene.clone()))?;
    let table = registry.table(gene_key)?;
    let request = InterpretationRequest::new(gene_key, marker_values(table, &args.markers));
    let result = interpret(&registry, &request, args.locale)?;

    if args.json {
        let output = InterpretOutput {
            gene: gene_key,
            rules_version: registry.version().to_string(),
            locale: args.locale,
            resolved: result.is_resolved(),
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("gene\t{gene_key}");
    if !result.is_resolved() {
        println!("status\tunresolved");
        return Ok(());
    }
    println!("status\tresolved");
    for (label, value) in [
        ("genotype", &result.genotype_label),
        ("phenotype", &result.phenotype),
        ("recommendation", &result.recommendation),
    ] {
        println!("{label}\t{}", value.as_deref().unwrap_or_default());
    }
    Ok(())
}

pub(crate) fn parse_marker(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

// Backend column names are mapped onto marker names; anything else passes through.
fn marker_values(table: &RuleTable, pairs: &[(String, String)]) -> MarkerValues {
    pairs
        .iter()
        .map(|(name, value)| {
            let name = table
                .markers()
                .iter()
                .find(|m| &m.name == name || &m.column == name)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| name.clone());
            (name, value.clone())
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/cli/interpret.rs"]
mod tests;
