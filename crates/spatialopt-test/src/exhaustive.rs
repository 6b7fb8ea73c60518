//! A brute-force reference solver for small pure-integer problems.
//!
//! Enumerates every assignment of the integer variables and keeps the first
//! optimum found. Good enough to check covering models with a handful of
//! facilities without an external MIP engine.
//!
//! # Example
//!
//! ```
//! use spatialopt_core::FacilityCaps;
//! use spatialopt_models::{build_mclp, BuildOptions, SolveStatus};
//! use spatialopt_test::{coverage, ExhaustiveSolver};
//!
//! let coverage = coverage::single_facility();
//! let mut problem = build_mclp(&coverage, &FacilityCaps::total(1), &BuildOptions::default()).unwrap();
//!
//! assert_eq!(problem.solve(&mut ExhaustiveSolver::default()), SolveStatus::Optimal);
//! assert_eq!(problem.objective_value(), Some(10.0));
//! ```

use indexmap::IndexMap;
use spatialopt_models::{Problem, Sense, Solution, SolveStatus, Solver, SolverError, VarKey};

const TOLERANCE: f64 = 1e-9;

/// Brute-force solver configuration.
#[derive(Debug, Clone)]
pub struct ExhaustiveSolver {
    /// Upper bound used for integer variables without one.
    pub unbounded_upper: i64,
    /// Maximum number of assignments to enumerate.
    pub assignment_limit: u64,
}

impl Default for ExhaustiveSolver {
    fn default() -> Self {
        Self {
            unbounded_upper: 3,
            assignment_limit: 1 << 20,
        }
    }
}

impl ExhaustiveSolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn domains(&self, problem: &Problem) -> Result<Vec<(i64, i64)>, SolverError> {
        let mut domains = Vec::with_capacity(problem.variables.len());
        let mut assignments: u64 = 1;
        for (key, spec) in &problem.variables {
            if !spec.integer {
                return Err(SolverError::Unsupported(format!(
                    "continuous variable '{}'",
                    problem.variable_name(key)
                )));
            }
            let lower = spec.lower.ceil() as i64;
            let upper = spec
                .upper
                .map(|upper| upper.floor() as i64)
                .unwrap_or(self.unbounded_upper);
            let size = (upper - lower + 1).max(0) as u64;
            assignments = assignments.saturating_mul(size);
            domains.push((lower, upper));
        }
        if assignments > self.assignment_limit {
            return Err(SolverError::TooLarge(format!(
                "{} assignments exceed the limit of {}",
                assignments, self.assignment_limit
            )));
        }
        Ok(domains)
    }
}

impl Solver for ExhaustiveSolver {
    fn solve(&mut self, problem: &Problem) -> Result<Solution, SolverError> {
        let domains = self.domains(problem)?;
        if domains.iter().any(|(lower, upper)| lower > upper) {
            return Ok(Solution::infeasible());
        }

        let mut current: Vec<i64> = domains.iter().map(|(lower, _)| *lower).collect();
        let mut assignment: IndexMap<VarKey, f64> = problem
            .variables
            .keys()
            .zip(&current)
            .map(|(key, value)| (key.clone(), *value as f64))
            .collect();
        let mut best: Option<(f64, Vec<i64>)> = None;

        'enumerate: loop {
            for (i, value) in current.iter().enumerate() {
                assignment[i] = *value as f64;
            }
            if problem.is_feasible(&assignment, TOLERANCE) {
                let objective = problem
                    .objective
                    .evaluate(|key| assignment.get(key).copied().unwrap_or(0.0));
                let improves = match &best {
                    None => true,
                    Some((incumbent, _)) => match problem.sense {
                        Sense::Maximize => objective > incumbent + TOLERANCE,
                        Sense::Minimize => objective < incumbent - TOLERANCE,
                    },
                };
                if improves {
                    best = Some((objective, current.clone()));
                }
            }

            let mut position = 0;
            loop {
                if position == current.len() {
                    break 'enumerate;
                }
                if current[position] < domains[position].1 {
                    current[position] += 1;
                    break;
                }
                current[position] = domains[position].0;
                position += 1;
            }
        }

        let Some((_, values)) = best else {
            return Ok(Solution::infeasible());
        };
        let reported = problem
            .variables
            .keys()
            .zip(values)
            .map(|(key, value)| (problem.variable_name(key), value as f64))
            .collect();
        Ok(Solution::new(SolveStatus::Optimal, reported))
    }
}
