pub mod input;

use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::engine::{GenotypeMatcher, RuleRegistry, describe_resolution};
use crate::model::locale::Locale;
use crate::model::result::{InterpretationResult, MarkerValues};
use crate::model::table::{HlaStatus, RuleTable};

pub use input::{BatchRow, read_rows};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("input is missing required column '{0}'")]
    MissingColumn(String),
    #[error("gzip input requires the 'gz' feature: {0}")]
    GzipNotEnabled(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowState {
    Resolved,
    Unresolved,
    UnknownGene,
}

impl RowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowState::Resolved => "resolved",
            RowState::Unresolved => "unresolved",
            RowState::UnknownGene => "unknown_gene",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    pub line: usize,
    pub patient_id: Option<String>,
    /// Canonical gene key when known, the raw input otherwise.
    pub gene: String,
    pub state: RowState,
    pub result: InterpretationResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub tool: ToolSummary,
    pub rules_version: String,
    pub locale: Locale,
    pub rows: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub unknown_gene: usize,
    pub genes: BTreeMap<String, GeneSummary>,
    pub unknown_genes: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GeneSummary {
    pub resolved: usize,
    pub unresolved: usize,
    /// Counts per stable phenotype key.
    pub phenotypes: BTreeMap<String, usize>,
}

/// Interprets every row; unknown genes are counted, never fatal.
pub fn interpret_rows(
    registry: &RuleRegistry,
    rows: &[BatchRow],
    locale: Locale,
) -> (Vec<RowOutcome>, BatchSummary) {
    let mut outcomes = Vec::with_capacity(rows.len());
    let mut summary = BatchSummary {
        tool: ToolSummary {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        rules_version: registry.version().to_string(),
        locale,
        rows: rows.len(),
        resolved: 0,
        unresolved: 0,
        unknown_gene: 0,
        genes: BTreeMap::new(),
        unknown_genes: BTreeMap::new(),
    };

    for row in rows {
        let Some(table) = registry
            .canonical_gene_key(&row.gene)
            .and_then(|key| registry.table(key).ok())
        else {
            warn!(line = row.line, gene = %row.gene, "unknown gene in batch input");
            summary.unknown_gene += 1;
            *summary.unknown_genes.entry(row.gene.clone()).or_insert(0) += 1;
            outcomes.push(RowOutcome {
                line: row.line,
                patient_id: row.patient_id.clone(),
                gene: row.gene.clone(),
                state: RowState::UnknownGene,
                result: InterpretationResult::unresolved(),
            });
            continue;
        };

        let resolution = table.resolve(&marker_values_from_row(table, &row.columns));
        let gene_summary = summary
            .genes
            .entry(table.gene_key().to_string())
            .or_default();
        let (state, result) = if resolution.is_resolved() {
            let result = describe_resolution(&resolution, locale);
            summary.resolved += 1;
            gene_summary.resolved += 1;
            if let Some(key) = &result.phenotype_key {
                *gene_summary.phenotypes.entry(key.clone()).or_insert(0) += 1;
            }
            (RowState::Resolved, result)
        } else {
            summary.unresolved += 1;
            gene_summary.unresolved += 1;
            (RowState::Unresolved, InterpretationResult::unresolved())
        };
        outcomes.push(RowOutcome {
            line: row.line,
            patient_id: row.patient_id.clone(),
            gene: table.gene_key().to_string(),
            state,
            result,
        });
    }
    (outcomes, summary)
}

/// Export cells are untyped: empty cells are absent markers and status
/// calls are matched case-insensitively against the declared values.
pub fn marker_values_from_row(
    table: &RuleTable,
    columns: &BTreeMap<String, String>,
) -> MarkerValues {
    let mut values = MarkerValues::new();
    for marker in table.markers() {
        let Some(raw) = columns.get(&marker.column).filter(|v| !v.is_empty()) else {
            continue;
        };
        let value = match table {
            RuleTable::Categorical(_) => normalize_status(raw),
            RuleTable::MultiMarker(_) => raw.clone(),
        };
        values.insert(marker.name.clone(), value);
    }
    values
}

fn normalize_status(raw: &str) -> String {
    [HlaStatus::Positive, HlaStatus::Negative]
        .into_iter()
        .find(|status| raw.eq_ignore_ascii_case(status.as_str()))
        .map(|status| status.as_str().to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn run_batch(
    registry: &RuleRegistry,
    input: &Path,
    out_dir: &Path,
    locale: Locale,
) -> Result<BatchSummary, BatchError> {
    std::fs::create_dir_all(out_dir)?;
    let rows = read_rows(input)?;
    let (outcomes, summary) = interpret_rows(registry, &rows, locale);
    write_interpretations(out_dir, &outcomes)?;
    write_summary(out_dir, &summary)?;
    info!(
        rows = summary.rows,
        resolved = summary.resolved,
        unresolved = summary.unresolved,
        unknown_gene = summary.unknown_gene,
        "batch interpreted"
    );
    Ok(summary)
}

pub fn write_interpretations(out_dir: &Path, outcomes: &[RowOutcome]) -> Result<(), BatchError> {
    let path = out_dir.join("interpretations.tsv");
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    writeln!(
        writer,
        "line\tpatient_id\tgene\tstate\tgenotype\tphenotype_key\tphenotype\trecommendation"
    )?;
    for outcome in outcomes {
        let result = &outcome.result;
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            outcome.line,
            cell(outcome.patient_id.as_deref()),
            cell(Some(outcome.gene.as_str())),
            outcome.state.as_str(),
            cell(result.genotype_label.as_deref()),
            cell(result.phenotype_key.as_deref()),
            cell(result.phenotype.as_deref()),
            cell(result.recommendation.as_deref()),
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_summary(out_dir: &Path, summary: &BatchSummary) -> Result<(), BatchError> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(out_dir.join("summary.json"), json)?;
    Ok(())
}

// "." marks an empty field; tabs and newlines would break the row.
fn cell(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.replace(['\t', '\n', '\r'], " "),
        _ => ".".to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/batch/mod.rs"]
mod tests;
