//! TRAUMAH: joint siting of trauma centers and air depots.
//!
//! A demand unit is covered directly by a trauma center within ground
//! reach, or by an air depot / trauma center pair within helicopter reach
//! when both members of the pair are sited. Each distinct pair gets one
//! binary variable `ADTCPair{sep}{ad}{sep}{tc}` bounded above by both of its
//! members, shared by every demand unit listing the pair.

use indexmap::IndexSet;
use spatialopt_core::{CoverageStore, Result, AIR_DEPOT, TRAUMA_CENTER};

use super::{finish, prepare, BuildOptions, ModelFamily};
use crate::problem::{Constraint, LinearExpr, Problem, Relation, Sense, VarKey, VarSpec};

/// Number of facilities of each echelon to site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraumahCounts {
    pub air_depots: u64,
    pub trauma_centers: u64,
}

impl TraumahCounts {
    pub fn new(air_depots: u64, trauma_centers: u64) -> Self {
        Self {
            air_depots,
            trauma_centers,
        }
    }
}

/// Builds a TRAUMAH model siting exactly `counts.air_depots` air depots and
/// `counts.trauma_centers` trauma centers.
///
/// Counts are equality rows `NumAirDepot` and `NumTraumaCenter`: asking for
/// more facilities than the coverage declares is infeasible.
///
/// # Example
///
/// ```
/// use spatialopt_core::{CoverageKind, CoverageStore};
/// use spatialopt_models::{build_traumah, BuildOptions, TraumahCounts, VarKey};
///
/// let mut coverage = CoverageStore::new(CoverageKind::Traumah);
/// coverage.add_facility("AirDepot", "a1").unwrap();
/// coverage.add_facility("TraumaCenter", "t1").unwrap();
/// coverage.add_demand("1", 40.0, 0.0).unwrap();
/// coverage.cover_air("1", "a1", "t1").unwrap();
///
/// let problem = build_traumah(&coverage, TraumahCounts::new(1, 1), &BuildOptions::default()).unwrap();
/// assert!(problem.variables.contains_key(&VarKey::pair("a1", "t1")));
/// assert!(problem.constraint("LinkAD$a1$t1").is_some());
/// ```
pub fn build_traumah(
    coverage: &CoverageStore,
    counts: TraumahCounts,
    options: &BuildOptions,
) -> Result<Problem> {
    let family = ModelFamily::Traumah;
    prepare(family, coverage, options)?;

    let mut problem = Problem::new("TRAUMAH", Sense::Maximize, options.delineator.as_str());
    for demand_id in coverage.demand.keys() {
        problem.add_variable(VarKey::demand(demand_id.as_str()), VarSpec::binary());
    }

    let declared = |facility_type: &str| -> LinearExpr {
        coverage
            .facilities
            .get(facility_type)
            .into_iter()
            .flatten()
            .map(|id| (VarKey::facility(facility_type, id.as_str()), 1.0))
            .collect()
    };
    let depots = declared(AIR_DEPOT);
    let centers = declared(TRAUMA_CENTER);
    for (key, _) in depots.terms().chain(centers.terms()) {
        problem.add_variable(key.clone(), VarSpec::binary());
    }

    let mut pairs: IndexSet<(&str, &str)> = IndexSet::new();
    for unit in coverage.demand.values() {
        if let Some(lists) = unit.traumah_coverage() {
            for pair in &lists.air {
                pairs.insert((pair.air_depot.as_str(), pair.trauma_center.as_str()));
            }
        }
    }
    for (air_depot, trauma_center) in &pairs {
        problem.add_variable(VarKey::pair(*air_depot, *trauma_center), VarSpec::binary());
    }

    for (demand_id, unit) in &coverage.demand {
        let y = VarKey::demand(demand_id.as_str());
        problem
            .objective
            .add_term(y.clone(), unit.weight(options.use_serviceable_demand));

        let mut expr = LinearExpr::new();
        if let Some(lists) = unit.traumah_coverage() {
            for ground in &lists.ground {
                expr.add_term(VarKey::facility(TRAUMA_CENTER, ground.trauma_center.as_str()), 1.0);
            }
            for pair in &lists.air {
                expr.add_term(
                    VarKey::pair(pair.air_depot.as_str(), pair.trauma_center.as_str()),
                    1.0,
                );
            }
        }
        expr.add_term(y, -1.0);
        problem.add_constraint(Constraint::named(
            format!("D{}", demand_id),
            expr,
            Relation::Ge,
            0.0,
        ));
    }

    for (air_depot, trauma_center) in &pairs {
        let pair = VarKey::pair(*air_depot, *trauma_center);
        for (prefix, member) in [
            ("LinkAD", VarKey::facility(AIR_DEPOT, *air_depot)),
            ("LinkTC", VarKey::facility(TRAUMA_CENTER, *trauma_center)),
        ] {
            problem.add_constraint(Constraint::named(
                format!(
                    "{}{d}{}{d}{}",
                    prefix,
                    air_depot,
                    trauma_center,
                    d = options.delineator
                ),
                LinearExpr::new()
                    .with_term(pair.clone(), 1.0)
                    .with_term(member, -1.0),
                Relation::Le,
                0.0,
            ));
        }
    }

    problem.add_constraint(Constraint::named(
        format!("Num{}", AIR_DEPOT),
        depots,
        Relation::Eq,
        counts.air_depots as f64,
    ));
    problem.add_constraint(Constraint::named(
        format!("Num{}", TRAUMA_CENTER),
        centers,
        Relation::Eq,
        counts.trauma_centers as f64,
    ));

    finish(family, problem, options)
}
