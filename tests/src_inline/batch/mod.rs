use super::*;

fn registry() -> RuleRegistry {
    RuleRegistry::builtin().expect("builtin")
}

fn row(line: usize, gene: &str, columns: &[(&str, &str)]) -> BatchRow {
    BatchRow {
        line,
        patient_id: Some(format!("P{line}")),
        gene: gene.to_string(),
        columns: columns
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

#[test]
fn rows_are_classified_and_counted() {
    let registry = registry();
    let rows = vec![
        row(2, "TPMT", &[("TPMTx3C_719A", "A/A")]),
        row(3, "HLA_B", &[("HLA_Gene", "HLA-B*15:02"), ("status", "positive")]),
        row(4, "CYP2C19", &[("CYPx2_681G", "G/A"), ("CYPx3_636G", "G/G")]),
        row(5, "FAKE_GENE", &[]),
    ];
    let (outcomes, summary) = interpret_rows(&registry, &rows, Locale::En);

    let states: Vec<RowState> = outcomes.iter().map(|o| o.state).collect();
    assert_eq!(
        states,
        vec![
            RowState::Resolved,
            RowState::Resolved,
            RowState::Unresolved,
            RowState::UnknownGene
        ]
    );
    assert_eq!(outcomes[1].gene, "HLA-B*15:02");
    assert_eq!(
        outcomes[1].result.phenotype_key.as_deref(),
        Some("carrier_high_risk")
    );

    assert_eq!(summary.rows, 4);
    assert_eq!(summary.resolved, 2);
    assert_eq!(summary.unresolved, 1);
    assert_eq!(summary.unknown_gene, 1);
    assert_eq!(summary.unknown_genes.get("FAKE_GENE"), Some(&1));
    assert_eq!(summary.genes["TPMT"].phenotypes.get("poor_metabolizer"), Some(&1));
    assert_eq!(summary.genes["CYP2C19"].unresolved, 1);
    assert_eq!(summary.rules_version, registry.version().to_string());
}

#[test]
fn export_cells_are_normalized_on_ingestion() {
    let registry = registry();
    let hla = registry.table("HLA-B*15:02").expect("table");
    let columns: BTreeMap<String, String> = [
        ("HLA_Gene".to_string(), "HLA-B*15:02".to_string()),
        ("status".to_string(), "NEGATIVE".to_string()),
    ]
    .into();
    let values = marker_values_from_row(hla, &columns);
    assert_eq!(
        values.get("HLA-B*15:02 status").map(String::as_str),
        Some("Negative")
    );

    let tpmt = registry.table("TPMT").expect("table");
    let empty: BTreeMap<String, String> = [("TPMTx3C_719A".to_string(), String::new())].into();
    assert!(marker_values_from_row(tpmt, &empty).is_empty());

    let unknown: BTreeMap<String, String> = [("status".to_string(), "unknown".to_string())].into();
    assert_eq!(
        marker_values_from_row(hla, &unknown)
            .get("HLA-B*15:02 status")
            .map(String::as_str),
        Some("unknown")
    );
}

#[test]
fn unknown_genes_never_get_a_gene_entry() {
    let registry = registry();
    let rows = vec![row(2, "NOPE", &[]), row(3, "nope", &[("TPMTx3C_719A", "A/A")])];
    let (outcomes, summary) = interpret_rows(&registry, &rows, Locale::En);
    assert!(outcomes.iter().all(|o| o.state == RowState::UnknownGene));
    assert!(summary.genes.is_empty());
    assert_eq!(summary.unknown_gene, 2);
    assert_eq!(
        summary.unknown_genes.values().sum::<usize>(),
        summary.unknown_gene
    );
}

#[test]
fn run_batch_writes_tsv_and_summary() {
    let registry = registry();
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("export.csv");
    std::fs::write(
        &input,
        "patient_id,gene,TPMTx3C_719A,CYP3A5x3_6986A\n17,TPMT,A/G,\n18,CYP3A5,,G/G\n19,NOPE,,\n",
    )
    .expect("write");
    let out = dir.path().join("out");

    let summary = run_batch(&registry, &input, &out, Locale::Th).expect("batch");
    assert_eq!(summary.resolved, 2);
    assert_eq!(summary.unknown_gene, 1);

    let tsv = std::fs::read_to_string(out.join("interpretations.tsv")).expect("tsv");
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("line\tpatient_id\tgene\tstate"));
    assert!(lines[1].starts_with("2\t17\tTPMT\tresolved\t*1/*3C\tintermediate_metabolizer\t"));
    assert!(lines[3].starts_with("4\t19\tNOPE\tunknown_gene\t.\t.\t.\t."));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("summary.json")).expect("json"))
            .expect("parse");
    assert_eq!(json["locale"], "th");
    assert_eq!(json["genes"]["CYP3A5"]["phenotypes"]["poor_metabolizer"], 1);
}

#[test]
fn empty_cells_render_as_dots() {
    assert_eq!(cell(None), ".");
    assert_eq!(cell(Some("")), ".");
    assert_eq!(cell(Some("a\tb")), "a b");
}
