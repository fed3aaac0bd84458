use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::table::{HlaStatus, TableKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneHeaderDef {
    pub key: String,
    pub kind: TableKind,
    pub storage_table: String,
    #[serde(default)]
    pub drugs: Vec<String>,
    #[serde(default)]
    pub locus: Option<String>,
    #[serde(default)]
    pub locus_column: Option<String>,
    #[serde(default)]
    pub risk: Option<RiskDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskDef {
    #[serde(default)]
    pub reaction_types: Vec<String>,
    #[serde(default)]
    pub populations: Vec<String>,
    #[serde(default)]
    pub odds_ratio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub column: String,
    pub allowed: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextDef {
    pub key: String,
    pub default: String,
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub th: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDef {
    pub id: String,
    pub genotype: String,
    #[serde(default, rename = "match")]
    pub markers: BTreeMap<String, String>,
    #[serde(default)]
    pub status: Option<HlaStatus>,
    pub phenotype: TextDef,
    pub recommendation: TextDef,
    #[serde(default)]
    pub activity_score: Option<f32>,
    #[serde(default)]
    pub references: Vec<String>,
}

/// One `assets/genes/*.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneFile {
    pub gene: GeneHeaderDef,
    #[serde(default)]
    pub marker: Vec<MarkerDef>,
    #[serde(default)]
    pub rule: Vec<RuleDef>,
}
