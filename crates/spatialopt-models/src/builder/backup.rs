//! Backup covering (BCLP): rewards demand units covered at least twice.

use spatialopt_core::{CoverageStore, FacilityCaps, Result};

use super::{
    add_cap_constraints, add_facility_variables, covering_expr, finish, prepare, BuildOptions,
    ModelFamily,
};
use crate::problem::{Constraint, Problem, Relation, Sense, VarKey, VarSpec};

/// Builds a backup covering model.
///
/// Each demand unit gets an indicator `U{sep}{id}` and the row
/// `Σ covering facilities − uᵢ >= 1`, so `uᵢ = 1` needs two covering
/// facilities. Facility variables are non-negative integers; the caps bound
/// how many are sited.
///
/// Every demand unit must be covered at least once, so a unit without any
/// covering facility makes the model infeasible.
pub fn build_backup(
    coverage: &CoverageStore,
    caps: &FacilityCaps,
    options: &BuildOptions,
) -> Result<Problem> {
    let family = ModelFamily::Backup;
    prepare(family, coverage, options)?;

    let mut problem = Problem::new("BCLP", Sense::Maximize, options.delineator.as_str());
    for demand_id in coverage.demand.keys() {
        problem.add_variable(VarKey::backup(demand_id.as_str()), VarSpec::binary());
    }
    add_facility_variables(&mut problem, coverage, VarSpec::non_negative_integer());

    for (demand_id, unit) in &coverage.demand {
        let u = VarKey::backup(demand_id.as_str());
        problem
            .objective
            .add_term(u.clone(), unit.weight(options.use_serviceable_demand));

        let mut expr = covering_expr(unit, false);
        expr.add_term(u, -1.0);
        problem.add_constraint(Constraint::named(
            format!("D{}", demand_id),
            expr,
            Relation::Ge,
            1.0,
        ));
    }
    add_cap_constraints(&mut problem, coverage, caps);

    finish(family, problem, options)
}
