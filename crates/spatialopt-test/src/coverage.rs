//! Coverage fixtures.
//!
//! Every fixture is a fully consistent [`CoverageStore`]: facilities are
//! declared before they are referenced and totals match the demand units.

use spatialopt_core::{CoverageKind, CoverageStore, AIR_DEPOT, TRAUMA_CENTER};

/// Demand `{A: 10, B: 5}`; facility type `F` with one facility `f1`
/// covering only A.
pub fn single_facility() -> CoverageStore {
    let mut coverage = CoverageStore::new(CoverageKind::Binary);
    coverage
        .add_demand("A", 10.0, 10.0)
        .expect("fresh demand id");
    coverage.add_demand("B", 5.0, 0.0).expect("fresh demand id");
    coverage.add_facility("F", "f1").expect("fresh facility id");
    coverage.cover("A", "F", "f1", 1.0).expect("declared ids");
    coverage
}

/// Six demand units (total demand 100) served by two facility types.
///
/// | Facility | Covers |
/// |---|---|
/// | fire/s1 | d1, d2 |
/// | fire/s2 | d2, d3, d4 |
/// | fire/s3 | d5 |
/// | ems/e1 | d5, d6 |
/// | ems/e2 | d1, d4 |
pub fn two_layer_binary() -> CoverageStore {
    let mut coverage = CoverageStore::new(CoverageKind::Binary);
    for (id, demand) in [
        ("d1", 10.0),
        ("d2", 20.0),
        ("d3", 15.0),
        ("d4", 5.0),
        ("d5", 30.0),
        ("d6", 20.0),
    ] {
        coverage.add_demand(id, demand, demand).expect("fresh demand id");
    }
    let layout: [(&str, &str, &[&str]); 5] = [
        ("fire", "s1", &["d1", "d2"]),
        ("fire", "s2", &["d2", "d3", "d4"]),
        ("fire", "s3", &["d5"]),
        ("ems", "e1", &["d5", "d6"]),
        ("ems", "e2", &["d1", "d4"]),
    ];
    for (facility_type, id, covered) in layout {
        coverage.add_facility(facility_type, id).expect("fresh facility id");
        for demand_id in covered {
            coverage
                .cover(demand_id, facility_type, id, 1.0)
                .expect("declared ids");
        }
    }
    coverage
}

/// Demand A covered by `F/f1` and `F/f2`, B covered by `F/f1` only, C covered
/// by `F/f3` only.
pub fn backup_layout() -> CoverageStore {
    let mut coverage = CoverageStore::new(CoverageKind::Binary);
    coverage.add_demand("A", 10.0, 10.0).expect("fresh demand id");
    coverage.add_demand("B", 6.0, 6.0).expect("fresh demand id");
    coverage.add_demand("C", 3.0, 3.0).expect("fresh demand id");
    for id in ["f1", "f2", "f3"] {
        coverage.add_facility("F", id).expect("fresh facility id");
    }
    for (demand_id, id) in [("A", "f1"), ("A", "f2"), ("B", "f1"), ("C", "f3")] {
        coverage.cover(demand_id, "F", id, 1.0).expect("declared ids");
    }
    coverage
}

/// Partial coverage: A (demand 10, serviceable 8) receives 4 from `F/f1`
/// and 2.5 from `F/f2`; B (demand 6, serviceable 6) receives 6 from `F/f2`.
pub fn partial_layer() -> CoverageStore {
    let mut coverage = CoverageStore::new(CoverageKind::Partial);
    coverage.add_demand("A", 10.0, 8.0).expect("fresh demand id");
    coverage.add_demand("B", 6.0, 6.0).expect("fresh demand id");
    coverage.add_facility("F", "f1").expect("fresh facility id");
    coverage.add_facility("F", "f2").expect("fresh facility id");
    coverage.cover("A", "F", "f1", 4.0).expect("declared ids");
    coverage.cover("A", "F", "f2", 2.5).expect("declared ids");
    coverage.cover("B", "F", "f2", 6.0).expect("declared ids");
    coverage
}

/// Two air depots, three trauma centers and four demand units.
///
/// | Unit | Demand | Ground | Air pairs |
/// |---|---|---|---|
/// | 1 | 40 | t1 | |
/// | 2 | 25 | | a1-t2 |
/// | 3 | 20 | t3 | a2-t1 |
/// | 4 | 15 | | a1-t3, a2-t2 |
pub fn traumah_network() -> CoverageStore {
    let mut coverage = CoverageStore::new(CoverageKind::Traumah);
    for id in ["a1", "a2"] {
        coverage.add_facility(AIR_DEPOT, id).expect("fresh facility id");
    }
    for id in ["t1", "t2", "t3"] {
        coverage
            .add_facility(TRAUMA_CENTER, id)
            .expect("fresh facility id");
    }
    for (id, demand) in [("1", 40.0), ("2", 25.0), ("3", 20.0), ("4", 15.0)] {
        coverage.add_demand(id, demand, 0.0).expect("fresh demand id");
    }
    coverage.cover_ground("1", "t1").expect("declared ids");
    coverage.cover_air("2", "a1", "t2").expect("declared ids");
    coverage.cover_ground("3", "t3").expect("declared ids");
    coverage.cover_air("3", "a2", "t1").expect("declared ids");
    coverage.cover_air("4", "a1", "t3").expect("declared ids");
    coverage.cover_air("4", "a2", "t2").expect("declared ids");
    coverage
}
