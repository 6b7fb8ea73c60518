//! Merging facility layers and the distance-matrix MCLP workflow.

use indexmap::IndexMap;
use spatialopt::prelude::*;
use spatialopt::{
    build_mclp, build_mclp_cc, merge_coverages, update_serviceable_demand, DistanceRecord,
    Solution, SolverError, VarKey,
};
use spatialopt_test::ExhaustiveSolver;

fn layer(kind: CoverageKind, facility_type: &str, id: &str, covers: &[(&str, f64)]) -> CoverageStore {
    let mut coverage = CoverageStore::new(kind);
    coverage.add_demand("A", 10.0, 4.0).unwrap();
    coverage.add_demand("B", 5.0, 5.0).unwrap();
    coverage.add_facility(facility_type, id).unwrap();
    for (demand_id, value) in covers {
        coverage.cover(demand_id, facility_type, id, *value).unwrap();
    }
    coverage
}

#[test]
fn test_merged_layers_solve_together() {
    let merged = merge_coverages(vec![
        layer(CoverageKind::Binary, "F", "f1", &[("A", 1.0)]),
        layer(CoverageKind::Binary, "G", "g1", &[("B", 1.0)]),
    ])
    .unwrap();
    assert_eq!(merged.facilities.len(), 2);

    let mut both = build_mclp(&merged, &FacilityCaps::total(2), &BuildOptions::default()).unwrap();
    assert_eq!(both.solve(&mut ExhaustiveSolver::default()), SolveStatus::Optimal);
    assert_eq!(both.objective_value(), Some(15.0));
    assert_eq!(both.selected_ids("F", 1.0), vec!["f1"]);
    assert_eq!(both.selected_ids("G", 1.0), vec!["g1"]);

    let caps = FacilityCaps::total(2).with_type("F", 0);
    let mut no_f = build_mclp(&merged, &caps, &BuildOptions::default()).unwrap();
    assert_eq!(no_f.solve(&mut ExhaustiveSolver::default()), SolveStatus::Optimal);
    assert_eq!(no_f.objective_value(), Some(5.0));
    assert!(no_f.selected_ids("F", 1.0).is_empty());
}

#[test]
fn test_merged_partial_layers_take_dissolved_serviceable_demand() {
    let merged = merge_coverages(vec![
        layer(CoverageKind::Partial, "F", "f1", &[("A", 3.0)]),
        layer(CoverageKind::Partial, "G", "g1", &[("A", 2.0), ("B", 5.0)]),
    ])
    .unwrap();
    // merging keeps the first layer's serviceable demand
    assert_eq!(merged.total_serviceable_demand, 9.0);

    let mut dissolved = IndexMap::new();
    dissolved.insert("A".to_string(), 5.0);
    dissolved.insert("B".to_string(), 5.0);
    let updated = update_serviceable_demand(merged, &dissolved).unwrap();
    assert_eq!(updated.total_serviceable_demand, 10.0);

    let options = BuildOptions::new().with_serviceable_demand(true);
    let problem = build_mclp_cc(&updated, &FacilityCaps::total(2), &options).unwrap();
    assert_eq!(problem.objective.coefficient(&VarKey::demand("A")), 5.0);

    let row = problem.constraint("DA").unwrap();
    assert_eq!(row.expr.coefficient(&VarKey::facility("F", "f1")), 3.0);
    assert_eq!(row.expr.coefficient(&VarKey::facility("G", "g1")), 2.0);
}

#[test]
fn test_merge_rejects_mixed_kinds() {
    let err = merge_coverages(vec![
        layer(CoverageKind::Binary, "F", "f1", &[("A", 1.0)]),
        layer(CoverageKind::Partial, "G", "g1", &[("B", 5.0)]),
    ])
    .unwrap_err();
    assert!(matches!(err, SpatialOptError::Range(_)));
}

fn distance_rows() -> Vec<DistanceRecord> {
    vec![
        DistanceRecord::new("1", "A", 10.0, 100.0),
        DistanceRecord::new("1", "B", 20.0, 900.0),
        DistanceRecord::new("2", "B", 20.0, 200.0),
        DistanceRecord::new("2", "C", 5.0, 300.0),
        DistanceRecord::new("3", "C", 5.0, 50.0),
        DistanceRecord::new("3", "A", 10.0, 800.0),
    ]
}

#[test]
fn test_distance_workflow_report() {
    let mut solver = ExhaustiveSolver::default();
    let report = solve_mclp_from_distances(&distance_rows(), 500.0, 1, None, &mut solver).unwrap();

    assert_eq!(report.status, SolveStatus::Optimal);
    assert_eq!(report.number_facility, 1);
    assert_eq!(report.number_facility_chosen, 1);
    assert_eq!(report.facility_ids_chosen, vec!["2"]);
    assert_eq!(report.total_demand, 35.0);
    assert!((report.percent_demand_coverage - 25.0 / 35.0 * 100.0).abs() < 1e-9);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "optimal");
    assert_eq!(json["facility_ids_chosen"][0], "2");
}

#[test]
fn test_distance_workflow_full_coverage() {
    let mut solver = ExhaustiveSolver::default();
    let report =
        solve_mclp_from_distances(&distance_rows(), 500.0, 3, Some("clinic"), &mut solver).unwrap();

    assert_eq!(report.number_facility, 3);
    assert!(report.number_facility_chosen <= 3);
    assert!((report.percent_demand_coverage - 100.0).abs() < 1e-9);
}

struct BrokenSolver;

impl Solver for BrokenSolver {
    fn solve(&mut self, _problem: &Problem) -> Result<Solution, SolverError> {
        Err(SolverError::Failed("license expired".to_string()))
    }
}

#[test]
fn test_distance_workflow_reports_failed_solve() {
    let report =
        solve_mclp_from_distances(&distance_rows(), 500.0, 1, None, &mut BrokenSolver).unwrap();

    assert_eq!(report.status, SolveStatus::Undefined);
    assert!(report.facility_ids_chosen.is_empty());
    assert_eq!(report.percent_demand_coverage, 0.0);
    assert_eq!(report.total_demand, 35.0);
}

#[test]
fn test_distance_workflow_rejects_bad_distance() {
    let err = solve_mclp_from_distances(
        &distance_rows(),
        f64::NAN,
        1,
        None,
        &mut ExhaustiveSolver::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SpatialOptError::Range(_)));
}
