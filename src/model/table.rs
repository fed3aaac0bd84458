use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::locale::KeyedText;
use crate::model::result::MarkerValues;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub description: String,
    /// Backend column holding this marker's call in the result store.
    pub column: String,
    pub allowed_values: Vec<String>,
}

impl Marker {
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values.iter().any(|v| v == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HlaStatus {
    Positive,
    Negative,
}

impl HlaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HlaStatus::Positive => "Positive",
            HlaStatus::Negative => "Negative",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Positive" => Some(HlaStatus::Positive),
            "Negative" => Some(HlaStatus::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for HlaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKey {
    /// Expected call per marker name; must cover every marker of the gene.
    Markers(BTreeMap<String, String>),
    Status { locus: String, status: HlaStatus },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenotypeRule {
    pub id: String,
    pub match_key: MatchKey,
    pub genotype_label: String,
    pub phenotype: KeyedText,
    pub recommendation: KeyedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_score: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    MultiMarker,
    Categorical,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::MultiMarker => "multi_marker",
            TableKind::Categorical => "categorical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneInfo {
    pub gene_key: String,
    pub storage_table: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drugs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiMarkerTable {
    pub info: GeneInfo,
    pub markers: Vec<Marker>,
    pub rules: Vec<GenotypeRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskInfo {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reaction_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub populations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odds_ratio: Option<String>,
}

/// Degenerate one-marker gene keyed by `(locus, status)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalTable {
    pub info: GeneInfo,
    pub locus: String,
    pub locus_column: String,
    pub status_marker: Marker,
    pub rules: Vec<GenotypeRule>,
    #[serde(default)]
    pub risk: RiskInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleTable {
    MultiMarker(MultiMarkerTable),
    Categorical(CategoricalTable),
}

impl RuleTable {
    pub fn kind(&self) -> TableKind {
        match self {
            RuleTable::MultiMarker(_) => TableKind::MultiMarker,
            RuleTable::Categorical(_) => TableKind::Categorical,
        }
    }

    pub fn info(&self) -> &GeneInfo {
        match self {
            RuleTable::MultiMarker(t) => &t.info,
            RuleTable::Categorical(t) => &t.info,
        }
    }

    pub fn gene_key(&self) -> &str {
        &self.info().gene_key
    }

    pub fn markers(&self) -> &[Marker] {
        match self {
            RuleTable::MultiMarker(t) => &t.markers,
            RuleTable::Categorical(t) => std::slice::from_ref(&t.status_marker),
        }
    }

    pub fn rules(&self) -> &[GenotypeRule] {
        match self {
            RuleTable::MultiMarker(t) => &t.rules,
            RuleTable::Categorical(t) => &t.rules,
        }
    }

    /// The marker input that a given rule expects, in request form.
    pub fn marker_values_for(&self, rule: &GenotypeRule) -> MarkerValues {
        match (&rule.match_key, self) {
            (MatchKey::Markers(expected), _) => expected.clone(),
            (MatchKey::Status { status, .. }, RuleTable::Categorical(t)) => {
                let mut values = MarkerValues::new();
                values.insert(t.status_marker.name.clone(), status.as_str().to_string());
                values
            }
            // shape mismatch; rejected by validation
            (MatchKey::Status { .. }, RuleTable::MultiMarker(_)) => MarkerValues::new(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/table.rs"]
mod tests;
