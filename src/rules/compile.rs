use crate::model::locale::{KeyedText, LocalizedText};
use crate::model::table::{
    CategoricalTable, GeneInfo, GenotypeRule, MatchKey, Marker, MultiMarkerTable, RiskInfo,
    RuleTable, TableKind,
};
use crate::rules::defs::{GeneFile, MarkerDef, RuleDef, TextDef};
use crate::rules::validate::IntegrityIssue;

/// Structural translation only; semantic checks live in `validate_table`.
pub fn compile_gene(file: GeneFile) -> Result<RuleTable, IntegrityIssue> {
    let GeneFile { gene, marker, rule } = file;
    let info = GeneInfo {
        gene_key: gene.key.clone(),
        storage_table: gene.storage_table,
        drugs: gene.drugs,
    };
    let markers: Vec<Marker> = marker.into_iter().map(compile_marker).collect();

    match gene.kind {
        TableKind::MultiMarker => {
            let rules = rule
                .into_iter()
                .map(|r| compile_rule(r, &gene.key))
                .collect();
            Ok(RuleTable::MultiMarker(MultiMarkerTable {
                info,
                markers,
                rules,
            }))
        }
        TableKind::Categorical => {
            let locus = gene.locus.ok_or(IntegrityIssue::MissingLocus)?;
            let locus_column = gene.locus_column.ok_or(IntegrityIssue::MissingLocusColumn)?;
            if markers.len() != 1 {
                return Err(IntegrityIssue::CategoricalMarkerCount(markers.len()));
            }
            let status_marker = markers
                .into_iter()
                .next()
                .ok_or(IntegrityIssue::CategoricalMarkerCount(0))?;
            let rules = rule.into_iter().map(|r| compile_rule(r, &locus)).collect();
            let risk = gene
                .risk
                .map(|r| RiskInfo {
                    reaction_types: r.reaction_types,
                    populations: r.populations,
                    odds_ratio: r.odds_ratio,
                })
                .unwrap_or_default();
            Ok(RuleTable::Categorical(CategoricalTable {
                info,
                locus,
                locus_column,
                status_marker,
                rules,
                risk,
            }))
        }
    }
}

fn compile_marker(def: MarkerDef) -> Marker {
    Marker {
        name: def.name,
        description: def.description,
        column: def.column,
        allowed_values: def.allowed,
    }
}

// A rule keyed by `status` binds to `locus`; anything else is a marker key.
fn compile_rule(def: RuleDef, locus: &str) -> GenotypeRule {
    let match_key = match def.status {
        Some(status) if def.markers.is_empty() => MatchKey::Status {
            locus: locus.to_string(),
            status,
        },
        _ => MatchKey::Markers(def.markers),
    };
    GenotypeRule {
        id: def.id,
        match_key,
        genotype_label: def.genotype,
        phenotype: compile_text(def.phenotype),
        recommendation: compile_text(def.recommendation),
        activity_score: def.activity_score,
        references: def.references,
    }
}

fn compile_text(def: TextDef) -> KeyedText {
    KeyedText {
        key: def.key,
        text: LocalizedText {
            default: def.default,
            en: def.en,
            th: def.th,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/rules/compile.rs"]
mod tests;
