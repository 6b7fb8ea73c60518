//! The seam to an external optimization engine.

use thiserror::Error;
use tracing::{info, warn};

use crate::problem::{Problem, SolveStatus};

/// What a solver reports for a problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: SolveStatus,
    /// Variable values by solver-facing name, in the solver's order.
    pub values: Vec<(String, f64)>,
}

impl Solution {
    pub fn new(status: SolveStatus, values: Vec<(String, f64)>) -> Self {
        Self { status, values }
    }

    pub fn infeasible() -> Self {
        Self::new(SolveStatus::Infeasible, Vec::new())
    }
}

/// Solver failure.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("unsupported problem: {0}")]
    Unsupported(String),

    #[error("problem too large: {0}")]
    TooLarge(String),

    #[error("solver failed: {0}")]
    Failed(String),
}

/// An optimization engine.
///
/// Implementations solve synchronously. Infeasibility is a [`Solution`]
/// status, not an error.
pub trait Solver {
    fn solve(&mut self, problem: &Problem) -> Result<Solution, SolverError>;
}

impl<S: Solver + ?Sized> Solver for &mut S {
    fn solve(&mut self, problem: &Problem) -> Result<Solution, SolverError> {
        (**self).solve(problem)
    }
}

impl Problem {
    /// Solves the problem with `solver` and records the outcome.
    ///
    /// A solver error is never returned: it is logged and the status becomes
    /// [`SolveStatus::Undefined`]. Callers inspect the returned status before
    /// extracting results.
    pub fn solve<S: Solver + ?Sized>(&mut self, solver: &mut S) -> SolveStatus {
        match solver.solve(self) {
            Ok(solution) => {
                self.status = solution.status;
                self.record(solution.values);
                info!(
                    event = "problem_solved",
                    problem = %self.name,
                    status = %self.status,
                    objective = self.objective_value().unwrap_or(0.0),
                );
            }
            Err(err) => {
                warn!(
                    event = "solver_failed",
                    problem = %self.name,
                    error = %err,
                );
                self.status = SolveStatus::Undefined;
                self.record(Vec::new());
            }
        }
        self.status
    }
}
