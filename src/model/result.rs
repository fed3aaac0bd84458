use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::table::GenotypeRule;

/// Marker name -> observed call, as collected by the entry form.
pub type MarkerValues = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationRequest {
    pub gene_key: String,
    #[serde(default)]
    pub marker_values: MarkerValues,
}

impl InterpretationRequest {
    pub fn new(gene_key: impl Into<String>, marker_values: MarkerValues) -> Self {
        Self {
            gene_key: gene_key.into(),
            marker_values,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    Resolved(&'a GenotypeRule),
    Unresolved,
}

impl<'a> Resolution<'a> {
    pub fn rule(&self) -> Option<&'a GenotypeRule> {
        match self {
            Resolution::Resolved(rule) => Some(rule),
            Resolution::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationResult {
    pub genotype_label: Option<String>,
    pub phenotype: Option<String>,
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phenotype_key: Option<String>,
}

impl InterpretationResult {
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self) -> bool {
        self.genotype_label.is_some()
    }
}
