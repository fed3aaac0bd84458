use std::collections::HashSet;

use thiserror::Error;

use crate::model::table::{
    CategoricalTable, GenotypeRule, HlaStatus, MatchKey, Marker, MultiMarkerTable, RuleTable,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityIssue {
    #[error("gene declares no markers")]
    NoMarkers,
    #[error("duplicate marker name: {0}")]
    DuplicateMarker(String),
    #[error("duplicate backend column: {0}")]
    DuplicateColumn(String),
    #[error("marker {0} has no allowed values")]
    EmptyAllowedValues(String),
    #[error("marker {marker} lists allowed value {value} twice")]
    DuplicateAllowedValue { marker: String, value: String },
    #[error("duplicate rule id: {0}")]
    DuplicateRuleId(String),
    #[error("rule {rule} references unknown marker {marker}")]
    RuleUnknownMarker { rule: String, marker: String },
    #[error("rule {rule} does not constrain marker {marker}")]
    RuleMissingMarker { rule: String, marker: String },
    #[error("rule {rule} expects {value} for marker {marker}, which is not an allowed value")]
    RuleValueNotAllowed {
        rule: String,
        marker: String,
        value: String,
    },
    #[error("rule {0} uses a match key of the wrong shape for this gene")]
    RuleShapeMismatch(String),
    #[error("categorical gene must declare exactly one status marker, found {0}")]
    CategoricalMarkerCount(usize),
    #[error("categorical gene is missing its locus label")]
    MissingLocus,
    #[error("categorical gene is missing its locus column")]
    MissingLocusColumn,
    #[error("status marker allows {0}, which is not Positive or Negative")]
    UnknownStatusValue(String),
    #[error("rule {rule} keys on locus {locus}, expected {expected}")]
    LocusMismatch {
        rule: String,
        locus: String,
        expected: String,
    },
    #[error("rule {rule} keys on status {status}, which the status marker does not allow")]
    StatusNotAllowed { rule: String, status: String },
    #[error("rules {first} and {second} match the same input")]
    AmbiguousMatch { first: String, second: String },
}

pub fn validate_table(table: &RuleTable) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();
    check_markers(table.markers(), &mut issues);
    check_rule_ids(table, &mut issues);
    match table {
        RuleTable::MultiMarker(t) => check_multi(t, &mut issues),
        RuleTable::Categorical(t) => check_categorical(t, &mut issues),
    }
    issues
}

fn check_markers(markers: &[Marker], issues: &mut Vec<IntegrityIssue>) {
    if markers.is_empty() {
        issues.push(IntegrityIssue::NoMarkers);
    }
    let mut names = HashSet::new();
    let mut columns = HashSet::new();
    for marker in markers {
        if !names.insert(marker.name.as_str()) {
            issues.push(IntegrityIssue::DuplicateMarker(marker.name.clone()));
        }
        if !columns.insert(marker.column.as_str()) {
            issues.push(IntegrityIssue::DuplicateColumn(marker.column.clone()));
        }
        if marker.allowed_values.is_empty() {
            issues.push(IntegrityIssue::EmptyAllowedValues(marker.name.clone()));
        }
        let mut seen = HashSet::new();
        for value in &marker.allowed_values {
            if !seen.insert(value.as_str()) {
                issues.push(IntegrityIssue::DuplicateAllowedValue {
                    marker: marker.name.clone(),
                    value: value.clone(),
                });
            }
        }
    }
}

fn check_rule_ids(table: &RuleTable, issues: &mut Vec<IntegrityIssue>) {
    let mut ids = HashSet::new();
    for rule in table.rules() {
        if !ids.insert(rule.id.as_str()) {
            issues.push(IntegrityIssue::DuplicateRuleId(rule.id.clone()));
        }
    }
}

fn check_multi(table: &MultiMarkerTable, issues: &mut Vec<IntegrityIssue>) {
    for rule in &table.rules {
        let MatchKey::Markers(expected) = &rule.match_key else {
            issues.push(IntegrityIssue::RuleShapeMismatch(rule.id.clone()));
            continue;
        };
        for name in expected.keys() {
            if !table.markers.iter().any(|m| &m.name == name) {
                issues.push(IntegrityIssue::RuleUnknownMarker {
                    rule: rule.id.clone(),
                    marker: name.clone(),
                });
            }
        }
        for marker in &table.markers {
            match expected.get(&marker.name) {
                None => issues.push(IntegrityIssue::RuleMissingMarker {
                    rule: rule.id.clone(),
                    marker: marker.name.clone(),
                }),
                Some(value) if !marker.allows(value) => {
                    issues.push(IntegrityIssue::RuleValueNotAllowed {
                        rule: rule.id.clone(),
                        marker: marker.name.clone(),
                        value: value.clone(),
                    })
                }
                Some(_) => {}
            }
        }
    }
    check_ambiguity(&table.rules, issues);
}

fn check_categorical(table: &CategoricalTable, issues: &mut Vec<IntegrityIssue>) {
    if table.locus.is_empty() {
        issues.push(IntegrityIssue::MissingLocus);
    }
    if table.locus_column.is_empty() {
        issues.push(IntegrityIssue::MissingLocusColumn);
    }
    for value in &table.status_marker.allowed_values {
        if HlaStatus::parse(value).is_none() {
            issues.push(IntegrityIssue::UnknownStatusValue(value.clone()));
        }
    }
    for rule in &table.rules {
        let MatchKey::Status { locus, status } = &rule.match_key else {
            issues.push(IntegrityIssue::RuleShapeMismatch(rule.id.clone()));
            continue;
        };
        if locus != &table.locus {
            issues.push(IntegrityIssue::LocusMismatch {
                rule: rule.id.clone(),
                locus: locus.clone(),
                expected: table.locus.clone(),
            });
        }
        if !table.status_marker.allows(status.as_str()) {
            issues.push(IntegrityIssue::StatusNotAllowed {
                rule: rule.id.clone(),
                status: status.as_str().to_string(),
            });
        }
    }
    check_ambiguity(&table.rules, issues);
}

// Match keys are exact, so two rules collide only when their keys are equal.
fn check_ambiguity(rules: &[GenotypeRule], issues: &mut Vec<IntegrityIssue>) {
    for (i, first) in rules.iter().enumerate() {
        for second in &rules[i + 1..] {
            if first.match_key == second.match_key {
                issues.push(IntegrityIssue::AmbiguousMatch {
                    first: first.id.clone(),
                    second: second.id.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/rules/validate.rs"]
mod tests;
