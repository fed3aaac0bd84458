use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::RulesArgs;
use crate::engine::EngineError;
use crate::model::table::{MatchKey, RuleTable};

#[derive(Args, Debug)]
pub struct GenesArgs {
    #[command(subcommand)]
    command: GenesCommand,
}

#[derive(Subcommand, Debug)]
enum GenesCommand {
    List,
    Show(GenesShowArgs),
    Dump(GenesDumpArgs),
}

#[derive(Args, Debug)]
pub struct GenesShowArgs {
    /// Gene key or storage table name
    #[arg(long)]
    gene: String,
}

#[derive(Args, Debug)]
pub struct GenesDumpArgs {
    /// Output directory
    #[arg(long)]
    out: PathBuf,
}

#[derive(Serialize)]
struct RulesManifest<'a> {
    version: String,
    genes: &'a [RuleTable],
}

pub fn handle(rules: &RulesArgs, args: GenesArgs) -> anyhow::Result<()> {
    match args.command {
        GenesCommand::List => list_genes(rules),
        GenesCommand::Show(args) => show_gene(rules, args),
        GenesCommand::Dump(args) => dump_genes(rules, args),
    }
}

fn list_genes(rules: &RulesArgs) -> anyhow::Result<()> {
    let registry = rules.load()?;
    println!("gene_key\tkind\tstorage_table\tn_markers\tn_rules");
    for table in registry.tables() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            table.gene_key(),
            table.kind().as_str(),
            table.info().storage_table,
            table.markers().len(),
            table.rules().len()
        );
    }
    Ok(())
}

fn show_gene(rules: &RulesArgs, args: GenesShowArgs) -> anyhow::Result<()> {
    let registry = rules.load()?;
    let gene_key = registry
        .canonical_gene_key(&args.gene)
        .ok_or_else(|| EngineError::UnknownGene(args.gene.clone()))?;
    let table = registry.table(gene_key)?;

    println!("marker\tcolumn\tallowed");
    for marker in table.markers() {
        println!(
            "{}\t{}\t{}",
            marker.name,
            marker.column,
            marker.allowed_values.join(",")
        );
    }
    println!();
    println!("rule_id\tmatch\tgenotype\tphenotype_key\trecommendation_key");
    for rule in table.rules() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            rule.id,
            render_match(&rule.match_key),
            rule.genotype_label,
            rule.phenotype.key,
            rule.recommendation.key
        );
    }
    Ok(())
}

fn render_match(key: &MatchKey) -> String {
    match key {
        MatchKey::Markers(values) => values
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(";"),
        MatchKey::Status { locus, status } => format!("{locus}={status}"),
    }
}

fn dump_genes(rules: &RulesArgs, args: GenesDumpArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.out)?;
    let registry = rules.load()?;
    let manifest = RulesManifest {
        version: registry.version().to_string(),
        genes: registry.tables(),
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    let path = args.out.join("rules_manifest.json");
    std::fs::write(path, json)?;
    Ok(())
}
