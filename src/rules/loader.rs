use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crc::{CRC_64_ECMA_182, Crc};
use thiserror::Error;

use crate::model::table::RuleTable;
use crate::rules::compile::compile_gene;
use crate::rules::defs::GeneFile;
use crate::rules::validate::{IntegrityIssue, validate_table};

const CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_ECMA_182);

const BUILTIN_SOURCES: [(&str, &str); 7] = [
    ("cyp2c19.toml", include_str!("../../assets/genes/cyp2c19.toml")),
    ("cyp2c9.toml", include_str!("../../assets/genes/cyp2c9.toml")),
    ("cyp2d6.toml", include_str!("../../assets/genes/cyp2d6.toml")),
    ("cyp3a5.toml", include_str!("../../assets/genes/cyp3a5.toml")),
    ("hla_b.toml", include_str!("../../assets/genes/hla_b.toml")),
    ("tpmt.toml", include_str!("../../assets/genes/tpmt.toml")),
    ("vkorc1.toml", include_str!("../../assets/genes/vkorc1.toml")),
];

#[derive(Debug, Error)]
pub enum RuleLoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error in {file}: {source}")]
    Toml {
        file: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("no rule files found in {0}")]
    Empty(String),
    #[error("gene {gene} declared twice (second time in {file})")]
    DuplicateGene { gene: String, file: String },
    #[error("rule table {gene} failed validation with {} issue(s): {}", .issues.len(), join_issues(.issues))]
    Integrity {
        gene: String,
        issues: Vec<IntegrityIssue>,
    },
}

fn join_issues(issues: &[IntegrityIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone)]
pub struct RuleSource {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct CompiledGene {
    pub source: String,
    pub gene_key: String,
    pub table: Option<RuleTable>,
    pub issues: Vec<IntegrityIssue>,
}

pub fn builtin_rule_sources() -> Vec<RuleSource> {
    BUILTIN_SOURCES
        .iter()
        .map(|(name, text)| RuleSource {
            name: (*name).to_string(),
            text: (*text).to_string(),
        })
        .collect()
}

/// Reads every `*.toml` file in `dir`, sorted by file name.
pub fn read_rule_sources(dir: &Path) -> Result<Vec<RuleSource>, RuleLoadError> {
    let mut named = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "toml")
            && let Some(name) = path.file_name().and_then(|n| n.to_str())
        {
            named.push((name.to_string(), path));
        }
    }
    if named.is_empty() {
        return Err(RuleLoadError::Empty(dir.display().to_string()));
    }
    named.sort_by(|a, b| a.0.cmp(&b.0));

    named
        .into_iter()
        .map(|(name, path)| {
            let text = fs::read_to_string(&path)?;
            Ok::<_, RuleLoadError>(RuleSource { name, text })
        })
        .collect()
}

/// Parses and validates every source, keeping per-gene issues instead of failing.
pub fn compile_sources(sources: &[RuleSource]) -> Result<Vec<CompiledGene>, RuleLoadError> {
    let mut compiled = Vec::with_capacity(sources.len());
    for source in sources {
        let parsed: GeneFile = toml::from_str(&source.text).map_err(|e| RuleLoadError::Toml {
            file: source.name.clone(),
            source: e,
        })?;
        let gene_key = parsed.gene.key.clone();
        let entry = match compile_gene(parsed) {
            Ok(table) => {
                let issues = validate_table(&table);
                CompiledGene {
                    source: source.name.clone(),
                    gene_key,
                    table: Some(table),
                    issues,
                }
            }
            Err(issue) => CompiledGene {
                source: source.name.clone(),
                gene_key,
                table: None,
                issues: vec![issue],
            },
        };
        compiled.push(entry);
    }
    Ok(compiled)
}

/// Strict load: any validation issue or duplicate gene rejects the whole set.
pub fn load_tables(sources: &[RuleSource]) -> Result<Vec<RuleTable>, RuleLoadError> {
    let mut seen = HashSet::new();
    let mut tables = Vec::with_capacity(sources.len());
    for entry in compile_sources(sources)? {
        if !seen.insert(entry.gene_key.clone()) {
            return Err(RuleLoadError::DuplicateGene {
                gene: entry.gene_key,
                file: entry.source,
            });
        }
        match entry.table {
            Some(table) if entry.issues.is_empty() => tables.push(table),
            _ => {
                return Err(RuleLoadError::Integrity {
                    gene: entry.gene_key,
                    issues: entry.issues,
                });
            }
        }
    }
    Ok(tables)
}

pub fn fingerprint(sources: &[RuleSource]) -> u64 {
    let mut ordered: Vec<&RuleSource> = sources.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));
    let mut digest = CRC64.digest();
    for source in ordered {
        digest.update(source.name.as_bytes());
        digest.update(&[0]);
        digest.update(source.text.as_bytes());
        digest.update(&[0]);
    }
    digest.finalize()
}

// In-memory tables have no source text; their debug form is stable.
pub fn fingerprint_tables(tables: &[RuleTable]) -> u64 {
    let mut digest = CRC64.digest();
    for table in tables {
        digest.update(format!("{table:?}").as_bytes());
        digest.update(&[0]);
    }
    digest.finalize()
}

const RULES_SUBDIR: [&str; 2] = ["assets", "genes"];

/// First existing rules directory; the cwd-relative path when none exists.
pub fn default_rules_dir() -> PathBuf {
    let relative: PathBuf = RULES_SUBDIR.iter().collect();
    rules_dir_candidates(&relative)
        .into_iter()
        .find(|dir| dir.is_dir())
        .unwrap_or(relative)
}

/// Lookup order: cwd, crate manifest, next to the executable, one level above it.
fn rules_dir_candidates(relative: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![
        relative.to_path_buf(),
        Path::new(env!("CARGO_MANIFEST_DIR")).join(relative),
    ];
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        candidates.push(dir.join(relative));
        candidates.push(dir.join("..").join(relative));
    }
    candidates
}

#[cfg(test)]
#[path = "../../tests/src_inline/rules/loader.rs"]
mod tests;
