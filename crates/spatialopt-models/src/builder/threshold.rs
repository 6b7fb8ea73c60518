//! Coverage threshold models: the fewest facilities covering at least
//! `psi` percent of total demand.

use spatialopt_core::{CoverageStore, Result, SpatialOptError};

use super::{
    add_facility_variables, all_facilities, check_psi, covering_expr, finish, prepare,
    BuildOptions, ModelFamily,
};
use crate::problem::{Constraint, LinearExpr, Problem, Relation, Sense, VarKey, VarSpec};

/// Name of the global coverage row of [`build_cc_threshold`].
pub const THRESHOLD_ROW: &str = "Threshold";

/// Builds a threshold model over binary coverage.
///
/// The global row is `Σ (100 / W) · wᵢ · yᵢ >= psi` where `W` is the total
/// weight of all demand units.
///
/// # Errors
///
/// - Schema or range errors from coverage validation.
/// - [`SpatialOptError::Range`] if `psi` is not a number in `[0, 100]` or the
///   total weight is not positive.
pub fn build_threshold(
    coverage: &CoverageStore,
    psi: f64,
    options: &BuildOptions,
) -> Result<Problem> {
    build(ModelFamily::Threshold, coverage, psi, options)
}

/// Builds a complementary coverage threshold model over partial coverage.
///
/// Demand variables hold covered amounts, so the global row is
/// `Σ (100 / W) · yᵢ >= psi` without a per-unit weight factor. The row is
/// named [`THRESHOLD_ROW`].
pub fn build_cc_threshold(
    coverage: &CoverageStore,
    psi: f64,
    options: &BuildOptions,
) -> Result<Problem> {
    build(ModelFamily::CcThreshold, coverage, psi, options)
}

fn build(
    family: ModelFamily,
    coverage: &CoverageStore,
    psi: f64,
    options: &BuildOptions,
) -> Result<Problem> {
    prepare(family, coverage, options)?;
    check_psi(psi)?;
    let total_weight = coverage.total_weight(options.use_serviceable_demand);
    if total_weight <= 0.0 {
        return Err(SpatialOptError::Range(format!(
            "total demand weight must be positive, got {}",
            total_weight
        )));
    }
    let scale = 100.0 / total_weight;
    let partial = family == ModelFamily::CcThreshold;
    let demand_spec = if partial {
        VarSpec::non_negative_continuous()
    } else {
        VarSpec::binary()
    };

    let mut problem = Problem::new("ThresholdModel", Sense::Minimize, options.delineator.as_str());
    for demand_id in coverage.demand.keys() {
        problem.add_variable(VarKey::demand(demand_id.as_str()), demand_spec);
    }
    add_facility_variables(&mut problem, coverage, VarSpec::binary());
    problem.objective = all_facilities(coverage);

    let mut global = LinearExpr::new();
    for (demand_id, unit) in &coverage.demand {
        let y = VarKey::demand(demand_id.as_str());
        let weight = unit.weight(options.use_serviceable_demand);
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
                LinearExpr::new().with_term(y.clone(), 1.0),
                Relation::Le,
                weight,
            ));
            global.add_term(y, scale);
        } else {
            global.add_term(y, scale * weight);
        }
    }

    let global = if partial {
        Constraint::named(THRESHOLD_ROW, global, Relation::Ge, psi)
    } else {
        Constraint::unnamed(global, Relation::Ge, psi)
    };
    problem.add_constraint(global);

    finish(family, problem, options)
}
