use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::EngineError;
use crate::engine::registry::RuleRegistry;
use crate::model::result::{InterpretationResult, MarkerValues};
use crate::model::table::RuleTable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Reviewed,
    Rejected,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Pending => "pending",
            ResultStatus::Processing => "processing",
            ResultStatus::Completed => "completed",
            ResultStatus::Reviewed => "reviewed",
            ResultStatus::Rejected => "rejected",
        }
    }
}

/// Identifiers stamped by the caller, never by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIds {
    pub patient_id: i64,
    pub staff_id: i64,
    pub gene_id: i64,
}

/// Flat payload in the result store's naming; marker calls sit under their backend columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRecord {
    #[serde(rename = "Patient_Id")]
    pub patient_id: i64,
    pub staff_id: i64,
    #[serde(rename = "geneid", alias = "gene_id")]
    pub gene_id: i64,
    /// Workflow state; the HLA-B backend already owns the `status` column.
    #[serde(rename = "result_status", default)]
    pub status: ResultStatus,
    #[serde(rename = "Genotype", default)]
    pub genotype: Option<String>,
    #[serde(rename = "Predict_Pheno", default)]
    pub predict_pheno: Option<String>,
    #[serde(rename = "Recommend", default)]
    pub recommend: Option<String>,
    #[serde(flatten)]
    pub columns: BTreeMap<String, String>,
}

pub fn to_storage_payload(
    registry: &RuleRegistry,
    gene_key: &str,
    marker_values: &MarkerValues,
    result: &InterpretationResult,
    ids: CallerIds,
) -> Result<StorageRecord, EngineError> {
    let table = registry.table(gene_key)?;
    Ok(StorageRecord {
        patient_id: ids.patient_id,
        staff_id: ids.staff_id,
        gene_id: ids.gene_id,
        status: ResultStatus::Pending,
        genotype: result.genotype_label.clone(),
        predict_pheno: result.phenotype.clone(),
        recommend: result.recommendation.clone(),
        columns: columns_from_marker_values(table, marker_values),
    })
}

pub fn from_storage_record(
    registry: &RuleRegistry,
    gene_key: &str,
    record: &StorageRecord,
) -> Result<MarkerValues, EngineError> {
    let table = registry.table(gene_key)?;
    Ok(marker_values_from_columns(table, &record.columns))
}

/// Values are copied verbatim; a marker absent from the input has no column.
pub fn columns_from_marker_values(
    table: &RuleTable,
    marker_values: &MarkerValues,
) -> BTreeMap<String, String> {
    let mut columns = BTreeMap::new();
    if let RuleTable::Categorical(t) = table {
        columns.insert(t.locus_column.clone(), t.locus.clone());
    }
    for marker in table.markers() {
        if let Some(value) = marker_values.get(&marker.name) {
            columns.insert(marker.column.clone(), value.clone());
        }
    }
    columns
}

/// Exact inverse of `columns_from_marker_values`; an empty value stays empty.
pub fn marker_values_from_columns(
    table: &RuleTable,
    columns: &BTreeMap<String, String>,
) -> MarkerValues {
    table
        .markers()
        .iter()
        .filter_map(|marker| {
            columns
                .get(&marker.column)
                .map(|value| (marker.name.clone(), value.clone()))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/storage/record.rs"]
mod tests;
