use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::engine::EngineError;
use crate::model::table::{GenotypeRule, Marker, RuleTable};
use crate::rules::loader::{
    RuleLoadError, RuleSource, builtin_rule_sources, fingerprint, fingerprint_tables, load_tables,
    read_rule_sources,
};
use crate::rules::validate::validate_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RuleSetVersion {
    pub fingerprint: u64,
}

impl fmt::Display for RuleSetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crc64:{:016x}", self.fingerprint)
    }
}

/// Read-only per-gene rule tables, in declaration order.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    tables: Vec<RuleTable>,
    by_key: HashMap<String, usize>,
    by_storage_table: HashMap<String, usize>,
    version: RuleSetVersion,
}

impl RuleRegistry {
    /// The rule set compiled into the binary from `assets/genes`.
    pub fn builtin() -> Result<Self, RuleLoadError> {
        Self::from_sources(&builtin_rule_sources())
    }

    pub fn from_dir(dir: &Path) -> Result<Self, RuleLoadError> {
        let sources = read_rule_sources(dir)?;
        Self::from_sources(&sources)
    }

    pub fn from_sources(sources: &[RuleSource]) -> Result<Self, RuleLoadError> {
        let tables = load_tables(sources)?;
        let version = RuleSetVersion {
            fingerprint: fingerprint(sources),
        };
        let registry = Self::assemble(tables, version);
        info!(
            genes = registry.len(),
            version = %registry.version,
            "rule tables loaded"
        );
        Ok(registry)
    }

    /// Builds a registry from already-compiled tables, applying the same validation.
    pub fn from_tables(tables: Vec<RuleTable>) -> Result<Self, RuleLoadError> {
        let mut seen = HashSet::new();
        for table in &tables {
            let gene = table.gene_key().to_string();
            if !seen.insert(gene.clone()) {
                return Err(RuleLoadError::DuplicateGene {
                    gene,
                    file: "<in-memory>".to_string(),
                });
            }
            let issues = validate_table(table);
            if !issues.is_empty() {
                return Err(RuleLoadError::Integrity { gene, issues });
            }
        }
        let version = RuleSetVersion {
            fingerprint: fingerprint_tables(&tables),
        };
        Ok(Self::assemble(tables, version))
    }

    fn assemble(tables: Vec<RuleTable>, version: RuleSetVersion) -> Self {
        let mut by_key = HashMap::with_capacity(tables.len());
        let mut by_storage_table = HashMap::with_capacity(tables.len());
        for (idx, table) in tables.iter().enumerate() {
            by_key.insert(table.gene_key().to_string(), idx);
            by_storage_table
                .entry(table.info().storage_table.clone())
                .or_insert(idx);
        }
        Self {
            tables,
            by_key,
            by_storage_table,
            version,
        }
    }

    pub fn table(&self, gene_key: &str) -> Result<&RuleTable, EngineError> {
        self.by_key
            .get(gene_key)
            .map(|&idx| &self.tables[idx])
            .ok_or_else(|| EngineError::UnknownGene(gene_key.to_string()))
    }

    pub fn get_markers(&self, gene_key: &str) -> Result<&[Marker], EngineError> {
        Ok(self.table(gene_key)?.markers())
    }

    pub fn get_rules(&self, gene_key: &str) -> Result<&[GenotypeRule], EngineError> {
        Ok(self.table(gene_key)?.rules())
    }

    pub fn tables(&self) -> &[RuleTable] {
        &self.tables
    }

    pub fn gene_keys(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.gene_key())
    }

    /// Maps a gene key or a backend table name (e.g. `HLA_B`) to the gene key.
    pub fn canonical_gene_key(&self, name: &str) -> Option<&str> {
        self.by_key
            .get(name)
            .or_else(|| self.by_storage_table.get(name))
            .map(|&idx| self.tables[idx].gene_key())
    }

    pub fn version(&self) -> RuleSetVersion {
        self.version
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/engine/registry.rs"]
mod tests;
