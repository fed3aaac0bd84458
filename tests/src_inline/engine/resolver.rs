use super::*;
use crate::engine::RuleRegistry;

fn hla_positive(registry: &RuleRegistry) -> &GenotypeRule {
    registry
        .get_rules("HLA-B*15:02")
        .expect("rules")
        .iter()
        .find(|r| r.id == "HLA_B_1502_POS")
        .expect("positive rule")
}

#[test]
fn describe_uses_locale_text_with_default_fallback() {
    let registry = RuleRegistry::builtin().expect("builtin");
    let rule = hla_positive(&registry);

    let en = describe(rule, Locale::En);
    assert_eq!(en.genotype_label.as_deref(), Some("HLA-B*15:02 positive"));
    assert_eq!(
        en.recommendation.as_deref(),
        Some("Avoid carbamazepine and oxcarbazepine; high risk of SJS/TEN")
    );
    assert_eq!(en.phenotype_key.as_deref(), Some("carrier_high_risk"));

    let th = describe(rule, Locale::Th);
    assert_eq!(th.genotype_label, en.genotype_label);
    assert_ne!(th.recommendation, en.recommendation);
    assert_eq!(th.phenotype_key, en.phenotype_key);
}

#[test]
fn describe_is_idempotent() {
    let registry = RuleRegistry::builtin().expect("builtin");
    for table in registry.tables() {
        for rule in table.rules() {
            for &locale in Locale::ordered() {
                assert_eq!(describe(rule, locale), describe(rule, locale));
            }
        }
    }
}

#[test]
fn unresolved_describes_to_null_fields() {
    let result = describe_resolution(&Resolution::Unresolved, Locale::Th);
    assert_eq!(result, InterpretationResult::unresolved());
    assert!(result.genotype_label.is_none());
    assert!(result.phenotype.is_none());
    assert!(result.recommendation.is_none());
    assert!(!result.is_resolved());

    let json = serde_json::to_value(&result).expect("json");
    assert!(json["genotype_label"].is_null());
    assert!(json.get("phenotype_key").is_none());
}
