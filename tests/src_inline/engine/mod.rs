use super::*;
use crate::model::result::MarkerValues;

#[test]
fn interpret_chains_match_and_describe() {
    let registry = RuleRegistry::builtin().expect("builtin");
    let mut values = MarkerValues::new();
    values.insert("CYP3A5*3 (6986A>G)".to_string(), "G/G".to_string());
    let request = InterpretationRequest::new("CYP3A5", values);

    let result = interpret(&registry, &request, Locale::En).expect("known gene");
    assert_eq!(result.genotype_label.as_deref(), Some("*3/*3"));
    assert_eq!(result.phenotype_key.as_deref(), Some("poor_metabolizer"));
}

#[test]
fn interpret_unresolved_is_not_an_error() {
    let registry = RuleRegistry::builtin().expect("builtin");
    let request = InterpretationRequest::new("CYP3A5", MarkerValues::new());
    let result = interpret(&registry, &request, Locale::Th).expect("known gene");
    assert_eq!(result, InterpretationResult::unresolved());
}

#[test]
fn interpret_unknown_gene_fails() {
    let registry = RuleRegistry::builtin().expect("builtin");
    let request = InterpretationRequest::new("FAKE_GENE", MarkerValues::new());
    let err = interpret(&registry, &request, Locale::En).unwrap_err();
    assert_eq!(err.to_string(), "unknown gene: FAKE_GENE");
}
