//! Location set covering (LSCP).

use spatialopt_core::{CoverageStore, Result};

use super::{
    add_facility_variables, all_facilities, covering_expr, finish, prepare, BuildOptions,
    ModelFamily,
};
use crate::problem::{Constraint, Problem, Relation, Sense, VarSpec};

/// Builds a set covering model: the fewest facilities covering every demand
/// unit.
///
/// The model has only facility variables. A demand unit without covering
/// facilities yields the row `D{id}: 0 >= 1`, which is infeasible.
pub fn build_lscp(coverage: &CoverageStore, options: &BuildOptions) -> Result<Problem> {
    let family = ModelFamily::Lscp;
    prepare(family, coverage, options)?;

    let mut problem = Problem::new("LSCP", Sense::Minimize, options.delineator.as_str());
    add_facility_variables(&mut problem, coverage, VarSpec::binary());
    problem.objective = all_facilities(coverage);

    for (demand_id, unit) in &coverage.demand {
        problem.add_constraint(Constraint::named(
            format!("D{}", demand_id),
            covering_expr(unit, false),
            Relation::Ge,
            1.0,
        ));
    }

    finish(family, problem, options)
}
