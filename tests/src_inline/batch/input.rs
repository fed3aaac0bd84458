use super::*;
use std::io::Write;

#[test]
fn delimiter_follows_the_extension() {
    assert_eq!(detect_delimiter(Path::new("rows.tsv")), b'\t');
    assert_eq!(detect_delimiter(Path::new("rows.TSV.gz")), b'\t');
    assert_eq!(detect_delimiter(Path::new("rows.csv")), b',');
    assert_eq!(detect_delimiter(Path::new("rows.csv.gz")), b',');
}

#[test]
fn reads_gene_patient_and_marker_columns() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rows.csv");
    std::fs::write(
        &path,
        "patient_id,gene,TPMTx3C_719A\nP1,TPMT,A/A\n,TPMT, A/G \n",
    )
    .expect("write");

    let rows = read_rows(&path).expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].line, 2);
    assert_eq!(rows[0].patient_id.as_deref(), Some("P1"));
    assert_eq!(rows[0].gene, "TPMT");
    assert_eq!(
        rows[0].columns.get("TPMTx3C_719A").map(String::as_str),
        Some("A/A")
    );
    assert!(!rows[0].columns.contains_key(GENE_COLUMN));
    assert_eq!(rows[1].patient_id, None);
    assert_eq!(
        rows[1].columns.get("TPMTx3C_719A").map(String::as_str),
        Some("A/G")
    );
}

#[test]
fn missing_gene_column_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rows.tsv");
    std::fs::write(&path, "patient_id\tTPMTx3C_719A\nP1\tA/A\n").expect("write");
    let err = read_rows(&path).unwrap_err();
    assert!(matches!(err, BatchError::MissingColumn(ref c) if c == GENE_COLUMN));
}

#[cfg(feature = "gz")]
#[test]
fn reads_gzipped_tsv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rows.tsv.gz");
    let file = std::fs::File::create(&path).expect("create");
    let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    encoder
        .write_all(b"gene\tHLA_Gene\tstatus\nHLA_B\tHLA-B*15:02\tpositive\n")
        .expect("write");
    encoder.finish().expect("finish");

    let rows = read_rows(&path).expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].gene, "HLA_B");
    assert_eq!(rows[0].columns.get("status").map(String::as_str), Some("positive"));
}
