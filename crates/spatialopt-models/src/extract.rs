//! Reading chosen facilities back out of a solved problem.

use indexmap::IndexMap;
use spatialopt_core::{FacilityId, FacilityType};

use crate::problem::{Problem, VarKey};

/// Ids of the facilities of `facility_type` whose solved value is at least
/// `threshold`.
///
/// Reported variable names are split on `delineator`; a name matches when its
/// first token equals `facility_type`, and its second token is the id. Ids
/// come back in the order the solver reported the variables. An unsolved or
/// failed problem reports nothing and yields an empty list.
///
/// ```
/// use spatialopt_models::{extract_ids, Problem, Sense, Solution, SolveStatus, Solver, SolverError};
///
/// struct Reported;
/// impl Solver for Reported {
///     fn solve(&mut self, _: &Problem) -> Result<Solution, SolverError> {
///         Ok(Solution::new(SolveStatus::Optimal, vec![
///             ("F$f2".to_string(), 1.0),
///             ("Y$A".to_string(), 1.0),
///             ("F$f1".to_string(), 0.0),
///         ]))
///     }
/// }
///
/// let mut problem = Problem::new("MCLP", Sense::Maximize, "$");
/// problem.solve(&mut Reported);
/// assert_eq!(extract_ids(&problem, "F", 1.0, "$"), vec!["f2"]);
/// ```
pub fn extract_ids(
    problem: &Problem,
    facility_type: &str,
    threshold: f64,
    delineator: &str,
) -> Vec<FacilityId> {
    if delineator.is_empty() {
        return Vec::new();
    }
    problem
        .reported()
        .iter()
        .filter(|(_, value)| *value >= threshold)
        .filter_map(|(name, _)| {
            let mut tokens = name.split(delineator);
            match (tokens.next(), tokens.next()) {
                (Some(first), Some(id)) if first == facility_type => Some(id.to_string()),
                _ => None,
            }
        })
        .collect()
}

impl Problem {
    /// [`extract_ids`] with the problem's own delineator.
    pub fn selected_ids(&self, facility_type: &str, threshold: f64) -> Vec<FacilityId> {
        extract_ids(self, facility_type, threshold, &self.delineator)
    }

    /// Chosen facilities of every type, keyed by facility type in variable
    /// declaration order.
    pub fn selection(&self, threshold: f64) -> IndexMap<FacilityType, Vec<FacilityId>> {
        let mut selection: IndexMap<FacilityType, Vec<FacilityId>> = IndexMap::new();
        for key in self.variables.keys() {
            let VarKey::Facility { facility_type, id } = key else {
                continue;
            };
            if self.value_of(key).is_some_and(|value| value >= threshold) {
                selection
                    .entry(facility_type.clone())
                    .or_default()
                    .push(id.clone());
            }
        }
        selection
    }
}
