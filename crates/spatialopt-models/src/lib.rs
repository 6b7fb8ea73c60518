//! SpatialOpt Models - Covering-model formulations
//!
//! Turns a validated [`CoverageStore`](spatialopt_core::CoverageStore) into an
//! abstract linear optimization [`Problem`]:
//! - Builders for MCLP, MCLP-CC, LSCP, Threshold, CC-Threshold, backup
//!   coverage and TRAUMAH
//! - CPLEX LP export for handing a model to an external solver
//! - The [`Solver`] seam, solve status handling and result extraction
//!
//! Building is a pure function of its inputs; no state is shared between
//! calls.

pub mod builder;
pub mod extract;
pub mod problem;
pub mod solver;

pub use builder::{
    build_backup, build_cc_threshold, build_lscp, build_mclp, build_mclp_cc, build_threshold,
    build_traumah, BuildOptions, ModelFamily, TraumahCounts, DEFAULT_DELINEATOR, THRESHOLD_ROW,
    TOTAL_FACILITIES_ROW,
};
pub use extract::extract_ids;
pub use problem::{
    Constraint, LinearExpr, Problem, Relation, Sense, SolveStatus, VarKey, VarKind, VarSpec,
    BACKUP_PREFIX, DEMAND_PREFIX,
};
pub use solver::{Solution, Solver, SolverError};
