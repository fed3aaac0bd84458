use tracing::{debug, warn};

use crate::engine::EngineError;
use crate::engine::registry::RuleRegistry;
use crate::model::result::{MarkerValues, Resolution};
use crate::model::table::{
    CategoricalTable, GenotypeRule, HlaStatus, MatchKey, MultiMarkerTable, RuleTable,
};

/// Exact-match lookup of a rule for a marker-value mapping.
///
/// Incomplete, unknown or out-of-domain input is `Unresolved`, never an error,
/// since entry forms call this on every selection change.
pub trait GenotypeMatcher {
    fn resolve(&self, values: &MarkerValues) -> Resolution<'_>;
}

impl GenotypeMatcher for MultiMarkerTable {
    fn resolve(&self, values: &MarkerValues) -> Resolution<'_> {
        let gene = self.info.gene_key.as_str();
        if let Some(unknown) = values
            .keys()
            .find(|name| !self.markers.iter().any(|m| &m.name == *name))
        {
            debug!(gene, marker = %unknown, "unresolved: unknown marker");
            return Resolution::Unresolved;
        }
        for marker in &self.markers {
            match values.get(&marker.name) {
                None => {
                    debug!(gene, marker = %marker.name, "unresolved: marker missing");
                    return Resolution::Unresolved;
                }
                Some(value) if !marker.allows(value) => {
                    debug!(gene, marker = %marker.name, value = %value, "unresolved: value not allowed");
                    return Resolution::Unresolved;
                }
                Some(_) => {}
            }
        }

        let matches: Vec<&GenotypeRule> = self
            .rules
            .iter()
            .filter(|rule| match &rule.match_key {
                MatchKey::Markers(expected) => self
                    .markers
                    .iter()
                    .all(|m| expected.get(&m.name) == values.get(&m.name)),
                MatchKey::Status { .. } => false,
            })
            .collect();
        first_declared(gene, matches)
    }
}

impl GenotypeMatcher for CategoricalTable {
    fn resolve(&self, values: &MarkerValues) -> Resolution<'_> {
        let gene = self.info.gene_key.as_str();
        if values.len() != 1 {
            debug!(gene, provided = values.len(), "unresolved: expected a single status");
            return Resolution::Unresolved;
        }
        let Some(raw) = values.get(&self.status_marker.name) else {
            debug!(gene, "unresolved: status marker missing");
            return Resolution::Unresolved;
        };
        let status = match HlaStatus::parse(raw) {
            Some(status) if self.status_marker.allows(raw) => status,
            _ => {
                debug!(gene, value = %raw, "unresolved: status not allowed");
                return Resolution::Unresolved;
            }
        };

        let matches: Vec<&GenotypeRule> = self
            .rules
            .iter()
            .filter(|rule| match &rule.match_key {
                MatchKey::Status { locus, status: s } => locus == &self.locus && *s == status,
                MatchKey::Markers(_) => false,
            })
            .collect();
        first_declared(gene, matches)
    }
}

impl GenotypeMatcher for RuleTable {
    fn resolve(&self, values: &MarkerValues) -> Resolution<'_> {
        match self {
            RuleTable::MultiMarker(t) => t.resolve(values),
            RuleTable::Categorical(t) => t.resolve(values),
        }
    }
}

/// Resolves against the registry; only an unregistered gene is an error.
pub fn resolve<'a>(
    registry: &'a RuleRegistry,
    gene_key: &str,
    values: &MarkerValues,
) -> Result<Resolution<'a>, EngineError> {
    Ok(registry.table(gene_key)?.resolve(values))
}

// More than one match is a rule-table defect; the first declared rule wins.
fn first_declared<'a>(gene: &str, matches: Vec<&'a GenotypeRule>) -> Resolution<'a> {
    if matches.len() > 1 {
        let ids: Vec<&str> = matches.iter().map(|r| r.id.as_str()).collect();
        warn!(
            gene,
            issue = "ambiguous_match",
            rules = %ids.join(","),
            chosen = ids[0],
            "rule table data integrity: multiple rules match"
        );
    }
    match matches.into_iter().next() {
        Some(rule) => Resolution::Resolved(rule),
        None => {
            debug!(gene, "unresolved: no rule for combination");
            Resolution::Unresolved
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/engine/matcher.rs"]
mod tests;
