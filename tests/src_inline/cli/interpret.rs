use super::*;
use crate::engine::RuleRegistry;

#[test]
fn column_names_map_onto_marker_names() {
    let registry = RuleRegistry::builtin().expect("builtin");
    let table = registry.table("CYP2C9").expect("table");
    let pairs = vec![
        ("CYP2C9x2_430C".to_string(), "C/T".to_string()),
        ("unrelated".to_string(), "x".to_string()),
    ];
    let values = marker_values(table, &pairs);
    let first = &table.markers()[0];
    assert_eq!(first.column, "CYP2C9x2_430C");
    assert_eq!(values.get(&first.name).map(String::as_str), Some("C/T"));
    assert_eq!(values.get("unrelated").map(String::as_str), Some("x"));
}
