//! Maximal covering (MCLP) over binary coverage and its complementary
//! coverage variant (MCLP-CC) over partial coverage.

use spatialopt_core::{CoverageStore, FacilityCaps, Result};

use super::{
    add_cap_constraints, add_facility_variables, covering_expr, finish, prepare, BuildOptions,
    ModelFamily,
};
use crate::problem::{Constraint, LinearExpr, Problem, Relation, Sense, VarKey, VarSpec};

/// Builds a maximal covering model.
///
/// Maximizes the weight of covered demand units using at most `caps.total`
/// facilities, and at most `caps.for_type(t)` facilities of each declared
/// type `t`. A demand unit counts as covered once any selected facility
/// covers it.
///
/// # Errors
///
/// Schema or range errors from coverage validation; nothing is built then.
///
/// # Example
///
/// ```
/// use spatialopt_core::{CoverageKind, CoverageStore, FacilityCaps};
/// use spatialopt_models::{build_mclp, BuildOptions, Sense};
///
/// let mut coverage = CoverageStore::new(CoverageKind::Binary);
/// coverage.add_demand("A", 10.0, 10.0).unwrap();
/// coverage.add_facility("F", "f1").unwrap();
/// coverage.cover("A", "F", "f1", 1.0).unwrap();
///
/// let problem = build_mclp(&coverage, &FacilityCaps::total(1), &BuildOptions::default()).unwrap();
/// assert_eq!(problem.name, "MCLP");
/// assert_eq!(problem.sense, Sense::Maximize);
/// assert!(problem.constraint("DA").is_some());
/// assert!(problem.constraint("NumTotalFacilities").is_some());
/// ```
pub fn build_mclp(
    coverage: &CoverageStore,
    caps: &FacilityCaps,
    options: &BuildOptions,
) -> Result<Problem> {
    build_maximal(ModelFamily::Mclp, coverage, caps, options)
}

/// Builds a maximal covering model over partial coverage.
///
/// Demand variables are continuous: each unit contributes the coverage
/// amount of the selected facilities, bounded by its own weight.
pub fn build_mclp_cc(
    coverage: &CoverageStore,
    caps: &FacilityCaps,
    options: &BuildOptions,
) -> Result<Problem> {
    build_maximal(ModelFamily::MclpCc, coverage, caps, options)
}

fn build_maximal(
    family: ModelFamily,
    coverage: &CoverageStore,
    caps: &FacilityCaps,
    options: &BuildOptions,
) -> Result<Problem> {
    prepare(family, coverage, options)?;
    let partial = family == ModelFamily::MclpCc;
    let demand_spec = if partial {
        VarSpec::non_negative_continuous()
    } else {
        VarSpec::binary()
    };

    let mut problem = Problem::new("MCLP", Sense::Maximize, options.delineator.as_str());
    for demand_id in coverage.demand.keys() {
        problem.add_variable(VarKey::demand(demand_id.as_str()), demand_spec);
    }
    add_facility_variables(&mut problem, coverage, VarSpec::binary());

    problem.objective = coverage
        .demand
        .iter()
        .map(|(demand_id, unit)| {
            (
                VarKey::demand(demand_id.as_str()),
                unit.weight(options.use_serviceable_demand),
            )
        })
        .collect();

    for (demand_id, unit) in &coverage.demand {
        let y = VarKey::demand(demand_id.as_str());
        let mut expr = covering_expr(unit, partial);
        expr.add_term(y.clone(), -1.0);
        problem.add_constraint(Constraint::named(
            format!("D{}", demand_id),
            expr,
            Relation::Ge,
            0.0,
        ));
        if partial {
            problem.add_constraint(Constraint::unnamed(
                LinearExpr::new().with_term(y, 1.0),
                Relation::Le,
                unit.weight(options.use_serviceable_demand),
            ));
        }
    }
    add_cap_constraints(&mut problem, coverage, caps);

    finish(family, problem, options)
}
