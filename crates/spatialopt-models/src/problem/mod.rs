//! Abstract linear optimization problem produced by the model builders.
//!
//! Variables are identified by a structured [`VarKey`]. Composite string names
//! (`"{facilityType}{sep}{facilityId}"`, `"Y{sep}{demandId}"`) only exist at the
//! solver boundary: in LP export, in [`Solution`](crate::Solution) values and in
//! result extraction.

mod lp;

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use spatialopt_core::{DemandId, FacilityId, FacilityType, AD_TC_PAIR};

/// Prefix of demand coverage variables.
pub const DEMAND_PREFIX: &str = "Y";

/// Prefix of backup coverage indicator variables.
pub const BACKUP_PREFIX: &str = "U";

/// Identity of a decision variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VarKey {
    /// Whether facility `id` of `facility_type` is sited.
    Facility {
        facility_type: FacilityType,
        id: FacilityId,
    },
    /// Coverage of a demand unit.
    Demand { id: DemandId },
    /// Backup coverage indicator of a demand unit.
    Backup { id: DemandId },
    /// Both members of an air depot / trauma center pair are sited.
    Pair {
        air_depot: FacilityId,
        trauma_center: FacilityId,
    },
}

/// Role of a variable in a covering model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Facility,
    Demand,
    Auxiliary,
}

impl VarKey {
    pub fn facility(facility_type: impl Into<FacilityType>, id: impl Into<FacilityId>) -> Self {
        VarKey::Facility {
            facility_type: facility_type.into(),
            id: id.into(),
        }
    }

    pub fn demand(id: impl Into<DemandId>) -> Self {
        VarKey::Demand { id: id.into() }
    }

    pub fn backup(id: impl Into<DemandId>) -> Self {
        VarKey::Backup { id: id.into() }
    }

    pub fn pair(air_depot: impl Into<FacilityId>, trauma_center: impl Into<FacilityId>) -> Self {
        VarKey::Pair {
            air_depot: air_depot.into(),
            trauma_center: trauma_center.into(),
        }
    }

    pub fn kind(&self) -> VarKind {
        match self {
            VarKey::Facility { .. } => VarKind::Facility,
            VarKey::Demand { .. } | VarKey::Backup { .. } => VarKind::Demand,
            VarKey::Pair { .. } => VarKind::Auxiliary,
        }
    }

    /// Composes the solver-facing variable name.
    ///
    /// ```
    /// use spatialopt_models::VarKey;
    ///
    /// assert_eq!(VarKey::facility("F", "f1").name("$"), "F$f1");
    /// assert_eq!(VarKey::demand("A").name("$"), "Y$A");
    /// assert_eq!(VarKey::pair("a1", "t2").name("$"), "ADTCPair$a1$t2");
    /// ```
    pub fn name(&self, delineator: &str) -> String {
        match self {
            VarKey::Facility { facility_type, id } => {
                format!("{}{}{}", facility_type, delineator, id)
            }
            VarKey::Demand { id } => format!("{}{}{}", DEMAND_PREFIX, delineator, id),
            VarKey::Backup { id } => format!("{}{}{}", BACKUP_PREFIX, delineator, id),
            VarKey::Pair {
                air_depot,
                trauma_center,
            } => format!(
                "{}{}{}{}{}",
                AD_TC_PAIR, delineator, air_depot, delineator, trauma_center
            ),
        }
    }
}

/// Domain of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarSpec {
    pub lower: f64,
    /// `None` means unbounded above.
    pub upper: Option<f64>,
    pub integer: bool,
}

impl VarSpec {
    pub fn binary() -> Self {
        Self {
            lower: 0.0,
            upper: Some(1.0),
            integer: true,
        }
    }

    pub fn non_negative_integer() -> Self {
        Self {
            lower: 0.0,
            upper: None,
            integer: true,
        }
    }

    pub fn non_negative_continuous() -> Self {
        Self {
            lower: 0.0,
            upper: None,
            integer: false,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.integer && self.lower == 0.0 && self.upper == Some(1.0)
    }

    /// Returns true if `value` lies in the domain, within `tolerance`.
    pub fn admits(&self, value: f64, tolerance: f64) -> bool {
        if value < self.lower - tolerance {
            return false;
        }
        if self.upper.is_some_and(|upper| value > upper + tolerance) {
            return false;
        }
        !self.integer || (value - value.round()).abs() <= tolerance
    }
}

/// A linear combination of variables.
///
/// Adding a term for a variable already present accumulates its coefficient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: IndexMap<VarKey, f64>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_term(&mut self, key: VarKey, coefficient: f64) {
        *self.terms.entry(key).or_insert(0.0) += coefficient;
    }

    pub fn with_term(mut self, key: VarKey, coefficient: f64) -> Self {
        self.add_term(key, coefficient);
        self
    }

    pub fn terms(&self) -> impl Iterator<Item = (&VarKey, f64)> {
        self.terms.iter().map(|(key, coefficient)| (key, *coefficient))
    }

    pub fn coefficient(&self, key: &VarKey) -> f64 {
        self.terms.get(key).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression, reading each variable's value from `value`.
    pub fn evaluate<F>(&self, value: F) -> f64
    where
        F: Fn(&VarKey) -> f64,
    {
        self.terms
            .iter()
            .map(|(key, coefficient)| coefficient * value(key))
            .sum()
    }
}

impl FromIterator<(VarKey, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarKey, f64)>>(iter: I) -> Self {
        let mut expr = LinearExpr::new();
        for (key, coefficient) in iter {
            expr.add_term(key, coefficient);
        }
        expr
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

impl Relation {
    fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Relation::Le => lhs <= rhs + tolerance,
            Relation::Ge => lhs >= rhs - tolerance,
            Relation::Eq => (lhs - rhs).abs() <= tolerance,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Le => write!(f, "<="),
            Relation::Ge => write!(f, ">="),
            Relation::Eq => write!(f, "="),
        }
    }
}

/// A row `expr relation rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Row name; unnamed rows get a positional name on export.
    pub name: Option<String>,
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    pub fn named(name: impl Into<String>, expr: LinearExpr, relation: Relation, rhs: f64) -> Self {
        Self {
            name: Some(name.into()),
            expr,
            relation,
            rhs,
        }
    }

    pub fn unnamed(expr: LinearExpr, relation: Relation, rhs: f64) -> Self {
        Self {
            name: None,
            expr,
            relation,
            rhs,
        }
    }

    pub fn is_satisfied<F>(&self, value: F, tolerance: f64) -> bool
    where
        F: Fn(&VarKey) -> f64,
    {
        self.relation
            .holds(self.expr.evaluate(value), self.rhs, tolerance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Outcome of solving a problem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    #[default]
    NotSolved,
    Optimal,
    Infeasible,
    Unbounded,
    /// The solver failed or gave no usable answer.
    Undefined,
}

impl SolveStatus {
    pub fn is_optimal(self) -> bool {
        self == SolveStatus::Optimal
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::NotSolved => write!(f, "Not Solved"),
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::Unbounded => write!(f, "Unbounded"),
            SolveStatus::Undefined => write!(f, "Undefined"),
        }
    }
}

/// A covering model ready to hand to a solver.
///
/// After [`Problem::solve`], [`Problem::status`] holds the outcome and
/// [`Problem::reported`] the `(name, value)` pairs in the order the solver
/// reported them.
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    pub sense: Sense,
    pub delineator: String,
    pub variables: IndexMap<VarKey, VarSpec>,
    pub objective: LinearExpr,
    pub constraints: Vec<Constraint>,
    pub(crate) status: SolveStatus,
    reported: Vec<(String, f64)>,
    values: HashMap<String, f64>,
}

impl Problem {
    pub fn new(name: impl Into<String>, sense: Sense, delineator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sense,
            delineator: delineator.into(),
            variables: IndexMap::new(),
            objective: LinearExpr::new(),
            constraints: Vec::new(),
            status: SolveStatus::NotSolved,
            reported: Vec::new(),
            values: HashMap::new(),
        }
    }

    pub fn add_variable(&mut self, key: VarKey, spec: VarSpec) {
        self.variables.insert(key, spec);
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|c| c.name.as_deref() == Some(name))
    }

    pub fn variable_name(&self, key: &VarKey) -> String {
        key.name(&self.delineator)
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn reported(&self) -> &[(String, f64)] {
        &self.reported
    }

    /// Replaces the reported values. A name reported twice keeps its first
    /// value.
    pub(crate) fn record(&mut self, reported: Vec<(String, f64)>) {
        self.values.clear();
        self.values.reserve(reported.len());
        for (name, value) in &reported {
            self.values.entry(name.clone()).or_insert(*value);
        }
        self.reported = reported;
    }

    /// Solved value of the variable named `name`.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Solved value of the variable `key`.
    pub fn value_of(&self, key: &VarKey) -> Option<f64> {
        self.value(&self.variable_name(key))
    }

    /// Objective evaluated at the reported values, or `None` before a
    /// successful solve.
    pub fn objective_value(&self) -> Option<f64> {
        if self.reported.is_empty() {
            return None;
        }
        Some(
            self.objective
                .evaluate(|key| self.value_of(key).unwrap_or(0.0)),
        )
    }

    /// Checks a candidate assignment against variable domains and rows.
    ///
    /// Variables missing from `assignment` are read as `0`.
    pub fn is_feasible(&self, assignment: &IndexMap<VarKey, f64>, tolerance: f64) -> bool {
        let value = |key: &VarKey| assignment.get(key).copied().unwrap_or(0.0);
        self.variables
            .iter()
            .all(|(key, spec)| spec.admits(value(key), tolerance))
            && self
                .constraints
                .iter()
                .all(|c| c.is_satisfied(value, tolerance))
    }
}
