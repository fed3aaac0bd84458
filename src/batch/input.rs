use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use crate::batch::BatchError;

pub const GENE_COLUMN: &str = "gene";
pub const PATIENT_COLUMN: &str = "patient_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    pub line: usize,
    pub patient_id: Option<String>,
    pub gene: String,
    pub columns: BTreeMap<String, String>,
}

pub fn open_reader(path: &Path) -> Result<Box<dyn io::BufRead>, BatchError> {
    let file = std::fs::File::open(path)?;
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        #[cfg(feature = "gz")]
        {
            let decoder = flate2::read::GzDecoder::new(file);
            return Ok(Box::new(io::BufReader::new(decoder)));
        }
        #[cfg(not(feature = "gz"))]
        {
            return Err(BatchError::GzipNotEnabled(path.to_path_buf()));
        }
    }
    Ok(Box::new(io::BufReader::new(file)))
}

/// Tab-separated when the name (minus any `.gz`) ends in `.tsv`, comma otherwise.
pub fn detect_delimiter(path: &Path) -> u8 {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let stem = name.strip_suffix(".gz").unwrap_or(&name);
    if stem.ends_with(".tsv") || stem.ends_with(".txt") {
        b'\t'
    } else {
        b','
    }
}

pub fn read_rows(path: &Path) -> Result<Vec<BatchRow>, BatchError> {
    let reader = open_reader(path)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(path))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let gene_idx = headers
        .iter()
        .position(|h| h == GENE_COLUMN)
        .ok_or_else(|| BatchError::MissingColumn(GENE_COLUMN.to_string()))?;
    let patient_idx = headers.iter().position(|h| h == PATIENT_COLUMN);

    let mut rows = Vec::new();
    for (offset, record) in csv_reader.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = offset + 2;
        let gene = record.get(gene_idx).unwrap_or_default().to_string();
        let patient_id = patient_idx
            .and_then(|idx| record.get(idx))
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string());
        let mut columns = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if idx == gene_idx || Some(idx) == patient_idx {
                continue;
            }
            if let Some(value) = record.get(idx) {
                columns.insert(header.to_string(), value.to_string());
            }
        }
        rows.push(BatchRow {
            line,
            patient_id,
            gene,
            columns,
        });
    }
    Ok(rows)
}

#[cfg(test)]
#[path = "../../tests/src_inline/batch/input.rs"]
mod tests;
