use super::*;
use crate::coverage::CoverageType;

fn binary_store() -> CoverageStore {
    let mut store = CoverageStore::new(CoverageKind::Binary);
    store.add_demand("A", 10.0, 10.0).unwrap();
    store.add_demand("B", 5.0, 0.0).unwrap();
    store.add_facility("F", "f1").unwrap();
    store.cover("A", "F", "f1", 1.0).unwrap();
    store
}

#[test]
fn test_accepts_allowed_type() {
    let store = binary_store();
    assert!(validate_coverage(&store, &[CoverageMode::Coverage], &[CoverageKind::Binary]).is_ok());
}

#[test]
fn test_rejects_type_outside_allowed_set() {
    let store = binary_store();
    let err = validate_coverage(&store, &[CoverageMode::Coverage], &[CoverageKind::Partial])
        .unwrap_err();
    assert!(matches!(err, SpatialOptError::Range(_)));
}

#[test]
fn test_rejects_mode_outside_allowed_set() {
    let mut store = binary_store();
    store.coverage_type = CoverageType {
        mode: CoverageMode::ServiceableDemand,
        kind: CoverageKind::Binary,
    };
    let err = validate_coverage(&store, &[CoverageMode::Coverage], &[CoverageKind::Binary])
        .unwrap_err();
    assert!(matches!(err, SpatialOptError::Range(msg) if msg.contains("serviceableDemand")));
}

#[test]
fn test_rejects_undeclared_facility() {
    let mut store = binary_store();
    store.cover("B", "F", "ghost", 1.0).unwrap();
    let err = validate_coverage(&store, &[CoverageMode::Coverage], &[CoverageKind::Binary])
        .unwrap_err();
    assert!(matches!(err, SpatialOptError::Schema(msg) if msg.contains("ghost")));
}

#[test]
fn test_rejects_duplicate_facility_declaration() {
    let mut store = binary_store();
    store.facilities["F"].push("f1".to_string());
    let err = validate_coverage(&store, &[CoverageMode::Coverage], &[CoverageKind::Binary])
        .unwrap_err();
    assert!(matches!(err, SpatialOptError::Schema(_)));
}

#[test]
fn test_rejects_non_unit_binary_value() {
    let mut store = binary_store();
    if let UnitCoverage::Facility(map) = &mut store.demand["A"].coverage {
        map["F"]["f1"] = 0.0;
    }
    let err = validate_coverage(&store, &[CoverageMode::Coverage], &[CoverageKind::Binary])
        .unwrap_err();
    assert!(matches!(err, SpatialOptError::Schema(_)));
}

#[test]
fn test_rejects_negative_partial_value() {
    let mut store = CoverageStore::new(CoverageKind::Partial);
    store.add_demand("A", 10.0, 8.0).unwrap();
    store.add_facility("F", "f1").unwrap();
    store.cover("A", "F", "f1", -2.0).unwrap();
    let err = validate_coverage(&store, &[CoverageMode::Coverage], &[CoverageKind::Partial])
        .unwrap_err();
    assert!(matches!(err, SpatialOptError::Schema(_)));
}

#[test]
fn test_traumah_references_checked() {
    let mut store = CoverageStore::new(CoverageKind::Traumah);
    store.add_demand("1", 10.0, 0.0).unwrap();
    store.add_facility(crate::TRAUMA_CENTER, "t1").unwrap();
    store.cover_ground("1", "t1").unwrap();
    assert!(
        validate_coverage(&store, &[CoverageMode::Coverage], &[CoverageKind::Traumah]).is_ok()
    );

    store.cover_air("1", "a9", "t1").unwrap();
    let err = validate_coverage(&store, &[CoverageMode::Coverage], &[CoverageKind::Traumah])
        .unwrap_err();
    assert!(matches!(err, SpatialOptError::Schema(msg) if msg.contains("a9")));
}

fn partial_store(demand: f64, serviceable: f64, value: f64) -> CoverageStore {
    let mut store = CoverageStore::new(CoverageKind::Partial);
    store.add_demand("A", demand, serviceable).unwrap();
    store.add_facility("F", "f1").unwrap();
    store.cover("A", "F", "f1", value).unwrap();
    store
}

#[test]
fn test_partial_value_bounded_by_serviceable_demand() {
    let accepted = partial_store(10.0, 8.0, 8.0);
    assert!(
        validate_coverage(&accepted, &[CoverageMode::Coverage], &[CoverageKind::Partial]).is_ok()
    );

    let over = partial_store(10.0, 8.0, 8.5);
    let err = validate_coverage(&over, &[CoverageMode::Coverage], &[CoverageKind::Partial])
        .unwrap_err();
    assert!(matches!(err, SpatialOptError::Schema(msg) if msg.contains("serviceable")));
}

#[test]
fn test_partial_serviceable_bounded_by_demand() {
    let store = partial_store(10.0, 12.0, 1.0);
    let err = validate_coverage(&store, &[CoverageMode::Coverage], &[CoverageKind::Partial])
        .unwrap_err();
    assert!(matches!(err, SpatialOptError::Schema(msg) if msg.contains("exceeds its demand")));
}

#[test]
fn test_partial_bounds_tolerate_rounding() {
    let store = partial_store(10.0, 0.3, 0.1 + 0.2);
    assert!(
        validate_coverage(&store, &[CoverageMode::Coverage], &[CoverageKind::Partial]).is_ok()
    );
}
