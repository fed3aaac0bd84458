use crate::model::locale::Locale;
use crate::model::result::{InterpretationResult, Resolution};
use crate::model::table::GenotypeRule;

pub fn describe(rule: &GenotypeRule, locale: Locale) -> InterpretationResult {
    InterpretationResult {
        genotype_label: Some(rule.genotype_label.clone()),
        phenotype: Some(rule.phenotype.text.get(locale).to_string()),
        recommendation: Some(rule.recommendation.text.get(locale).to_string()),
        phenotype_key: Some(rule.phenotype.key.clone()),
    }
}

/// Total over both resolution states; `Unresolved` yields all-null fields.
pub fn describe_resolution(resolution: &Resolution<'_>, locale: Locale) -> InterpretationResult {
    match resolution {
        Resolution::Resolved(rule) => describe(rule, locale),
        Resolution::Unresolved => InterpretationResult::unresolved(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/engine/resolver.rs"]
mod tests;
