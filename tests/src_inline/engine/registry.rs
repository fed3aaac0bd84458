use super::*;
use crate::model::locale::{KeyedText, LocalizedText};
use crate::model::table::{GeneInfo, MatchKey, MultiMarkerTable};

fn tiny_table(key: &str) -> RuleTable {
    let text = |k: &str| KeyedText {
        key: k.to_string(),
        text: LocalizedText::plain(k),
    };
    RuleTable::MultiMarker(MultiMarkerTable {
        info: GeneInfo {
            gene_key: key.to_string(),
            storage_table: format!("{key}_TABLE"),
            drugs: Vec::new(),
        },
        markers: vec![Marker {
            name: "m".to_string(),
            description: String::new(),
            column: "m_col".to_string(),
            allowed_values: vec!["A/A".to_string()],
        }],
        rules: vec![GenotypeRule {
            id: "r".to_string(),
            match_key: MatchKey::Markers([("m".to_string(), "A/A".to_string())].into()),
            genotype_label: "*1/*1".to_string(),
            phenotype: text("nm"),
            recommendation: text("standard"),
            activity_score: None,
            references: Vec::new(),
        }],
    })
}

#[test]
fn builtin_registry_exposes_every_gene() {
    let registry = RuleRegistry::builtin().expect("builtin");
    assert_eq!(registry.len(), 7);
    assert!(!registry.is_empty());
    for key in registry.gene_keys() {
        assert!(!registry.get_markers(key).expect("markers").is_empty());
        assert!(!registry.get_rules(key).expect("rules").is_empty());
    }
}

#[test]
fn marker_order_is_declaration_order() {
    let registry = RuleRegistry::builtin().expect("builtin");
    let names: Vec<&str> = registry
        .get_markers("CYP2C19")
        .expect("markers")
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "CYP2C19*2 (681G>A)",
            "CYP2C19*3 (636G>A)",
            "CYP2C19*17 (-806C>T)"
        ]
    );
}

#[test]
fn unknown_gene_is_an_error() {
    let registry = RuleRegistry::builtin().expect("builtin");
    assert_eq!(
        registry.get_markers("FAKE_GENE").unwrap_err(),
        EngineError::UnknownGene("FAKE_GENE".to_string())
    );
    assert!(registry.get_rules("FAKE_GENE").is_err());
}

#[test]
fn storage_table_names_resolve_to_gene_keys() {
    let registry = RuleRegistry::builtin().expect("builtin");
    assert_eq!(registry.canonical_gene_key("HLA_B"), Some("HLA-B*15:02"));
    assert_eq!(registry.canonical_gene_key("HLA-B*15:02"), Some("HLA-B*15:02"));
    assert_eq!(registry.canonical_gene_key("TPMT"), Some("TPMT"));
    assert_eq!(registry.canonical_gene_key("hla_b"), None);
}

#[test]
fn version_is_stable_and_formatted() {
    let first = RuleRegistry::builtin().expect("builtin");
    let second = RuleRegistry::builtin().expect("builtin");
    assert_eq!(first.version(), second.version());
    let shown = first.version().to_string();
    assert!(shown.starts_with("crc64:"));
    assert_eq!(shown.len(), "crc64:".len() + 16);
}

#[test]
fn from_tables_validates_and_rejects_duplicates() {
    let registry = RuleRegistry::from_tables(vec![tiny_table("X")]).expect("registry");
    assert_eq!(registry.canonical_gene_key("X_TABLE"), Some("X"));

    let err = RuleRegistry::from_tables(vec![tiny_table("X"), tiny_table("X")]).unwrap_err();
    assert!(matches!(err, RuleLoadError::DuplicateGene { .. }));

    let mut broken = tiny_table("Y");
    if let RuleTable::MultiMarker(t) = &mut broken {
        t.markers[0].allowed_values.clear();
    }
    let err = RuleRegistry::from_tables(vec![broken]).unwrap_err();
    assert!(matches!(err, RuleLoadError::Integrity { .. }));
}

#[test]
fn from_dir_matches_builtin_when_files_match() {
    let dir = tempfile::tempdir().expect("tempdir");
    for source in builtin_rule_sources() {
        std::fs::write(dir.path().join(&source.name), &source.text).expect("write");
    }
    let on_disk = RuleRegistry::from_dir(dir.path()).expect("from dir");
    let builtin = RuleRegistry::builtin().expect("builtin");
    assert_eq!(on_disk.version(), builtin.version());
    assert_eq!(on_disk.tables(), builtin.tables());
}
