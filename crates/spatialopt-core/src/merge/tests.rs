use std::collections::BTreeSet;

use proptest::prelude::*;

use super::*;

fn layer(kind: CoverageKind, facility_type: &str, cover: &[(&str, &str, f64)]) -> CoverageStore {
    let mut store = CoverageStore::new(kind);
    store.add_demand("A", 10.0, 10.0).unwrap();
    store.add_demand("B", 5.0, 5.0).unwrap();
    for (demand_id, facility_id, value) in cover {
        let declared = store
            .facilities
            .get(facility_type)
            .is_some_and(|ids| ids.iter().any(|id| id.as_str() == *facility_id));
        if !declared {
            store.add_facility(facility_type, *facility_id).unwrap();
        }
        store.cover(demand_id, facility_type, facility_id, *value).unwrap();
    }
    store
}

fn facility_set(store: &CoverageStore) -> BTreeSet<(String, String)> {
    store
        .facilities
        .iter()
        .flat_map(|(t, ids)| ids.iter().map(move |id| (t.clone(), id.clone())))
        .collect()
}

#[test]
fn test_merge_unions_facilities_and_coverage() {
    let first = layer(CoverageKind::Binary, "F", &[("A", "f1", 1.0)]);
    let second = layer(CoverageKind::Binary, "G", &[("B", "g1", 1.0), ("A", "g2", 1.0)]);

    let merged = merge_coverages(vec![first, second]).unwrap();

    assert_eq!(merged.facilities.len(), 2);
    assert_eq!(merged.facilities["G"], vec!["g1".to_string(), "g2".to_string()]);
    let a = merged.demand["A"].facility_coverage().unwrap();
    assert!(a["F"].contains_key("f1"));
    assert!(a["G"].contains_key("g2"));
    assert!(merged.demand["B"].facility_coverage().unwrap()["G"].contains_key("g1"));
}

#[test]
fn test_merge_keeps_first_serviceable_demand() {
    let mut first = layer(CoverageKind::Partial, "F", &[("A", "f1", 3.0)]);
    first.demand["A"].serviceable_demand = 3.0;
    first.recompute_totals();
    let second = layer(CoverageKind::Partial, "G", &[("A", "g1", 7.0)]);

    let merged = merge_coverages(vec![first, second]).unwrap();

    assert_eq!(merged.demand["A"].serviceable_demand, 3.0);
    assert_eq!(merged.total_serviceable_demand, 8.0);
}

#[test]
fn test_merge_colliding_values_last_writer_wins() {
    let mut first = layer(CoverageKind::Partial, "F", &[("A", "f1", 2.0)]);
    let mut second = layer(CoverageKind::Partial, "G", &[("A", "g1", 1.0)]);
    // both coverages carry an entry for (F, f1) on unit A
    second.cover("A", "F", "f1", 4.0).unwrap();
    first.cover("A", "G", "g1", 6.0).unwrap();

    let forward = merge_coverages(vec![first.clone(), second.clone()]).unwrap();
    let backward = merge_coverages(vec![second, first]).unwrap();

    assert_eq!(forward.demand["A"].facility_coverage().unwrap()["F"]["f1"], 4.0);
    assert_eq!(backward.demand["A"].facility_coverage().unwrap()["F"]["f1"], 2.0);
    assert_eq!(forward.demand["A"].facility_coverage().unwrap()["G"]["g1"], 1.0);
    assert_eq!(backward.demand["A"].facility_coverage().unwrap()["G"]["g1"], 6.0);
}

#[test]
fn test_merge_rejects_duplicate_facility_type() {
    let first = layer(CoverageKind::Binary, "F", &[("A", "f1", 1.0)]);
    let second = layer(CoverageKind::Binary, "F", &[("B", "f2", 1.0)]);

    let err = merge_coverages(vec![first, second]).unwrap_err();
    assert!(matches!(err, SpatialOptError::Conflict(_)));
}

#[test]
fn test_merge_rejects_mismatched_demand_ids() {
    let first = layer(CoverageKind::Binary, "F", &[("A", "f1", 1.0)]);
    let mut second = layer(CoverageKind::Binary, "G", &[("A", "g1", 1.0)]);
    second.add_demand("C", 1.0, 1.0).unwrap();

    let err = merge_coverages(vec![first, second]).unwrap_err();
    assert!(matches!(err, SpatialOptError::Validation(_)));
}

#[test]
fn test_merge_rejects_mixed_types() {
    let first = layer(CoverageKind::Binary, "F", &[("A", "f1", 1.0)]);
    let second = layer(CoverageKind::Partial, "G", &[("A", "g1", 2.0)]);

    let err = merge_coverages(vec![first, second]).unwrap_err();
    assert!(matches!(err, SpatialOptError::Range(_)));
}

#[test]
fn test_merge_rejects_empty_and_traumah_input() {
    assert!(matches!(
        merge_coverages(Vec::new()),
        Err(SpatialOptError::Validation(_))
    ));
    let traumah = CoverageStore::new(CoverageKind::Traumah);
    assert!(matches!(
        merge_coverages(vec![traumah]),
        Err(SpatialOptError::Range(_))
    ));
}

#[test]
fn test_update_serviceable_demand() {
    let store = layer(CoverageKind::Partial, "F", &[("A", "f1", 3.0)]);
    let mut values = IndexMap::new();
    values.insert("B".to_string(), 1.5);
    values.insert("A".to_string(), 4.0);

    let updated = update_serviceable_demand(store, &values).unwrap();

    assert_eq!(updated.demand["A"].serviceable_demand, 4.0);
    assert_eq!(updated.demand["B"].serviceable_demand, 1.5);
    assert_eq!(updated.total_serviceable_demand, 5.5);
}

#[test]
fn test_update_serviceable_demand_from_other_coverage() {
    let store = layer(CoverageKind::Binary, "F", &[("A", "f1", 1.0)]);
    let mut source = layer(CoverageKind::Binary, "G", &[]);
    source.demand["A"].serviceable_demand = 9.0;
    source.demand["B"].serviceable_demand = 0.0;

    let updated = update_serviceable_demand(store, &source.serviceable_demand_map()).unwrap();
    assert_eq!(updated.total_serviceable_demand, 9.0);
}

#[test]
fn test_update_serviceable_demand_lookup_errors() {
    let store = layer(CoverageKind::Binary, "F", &[]);
    let mut values = IndexMap::new();
    values.insert("A".to_string(), 1.0);
    let err = update_serviceable_demand(store.clone(), &values).unwrap_err();
    assert!(matches!(err, SpatialOptError::Lookup(msg) if msg.contains("'B'")));

    values.insert("B".to_string(), 1.0);
    values.insert("Z".to_string(), 1.0);
    let err = update_serviceable_demand(store, &values).unwrap_err();
    assert!(matches!(err, SpatialOptError::Lookup(msg) if msg.contains("'Z'")));
}

proptest! {
    #[test]
    fn prop_merged_facility_set_is_order_independent(
        left in proptest::collection::btree_set("[a-e]", 0..4),
        right in proptest::collection::btree_set("[a-e]", 0..4),
    ) {
        let build = |facility_type: &str, ids: &BTreeSet<String>| {
            let mut store = CoverageStore::new(CoverageKind::Binary);
            store.add_demand("A", 1.0, 1.0).unwrap();
            for id in ids {
                store.add_facility(facility_type, id.as_str()).unwrap();
                store.cover("A", facility_type, id, 1.0).unwrap();
            }
            store
        };
        // empty facility lists still declare their type
        let mut first = build("F", &left);
        first.facilities.entry("F".to_string()).or_default();
        let mut second = build("G", &right);
        second.facilities.entry("G".to_string()).or_default();

        let forward = merge_coverages(vec![first.clone(), second.clone()]).unwrap();
        let backward = merge_coverages(vec![second, first]).unwrap();

        prop_assert_eq!(facility_set(&forward), facility_set(&backward));
        prop_assert_eq!(facility_set(&forward).len(), left.len() + right.len());
    }
}
