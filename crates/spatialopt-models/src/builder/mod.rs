//! Covering-model formulations.
//!
//! Each family has one `build_*` function taking a [`CoverageStore`], the
//! family's parameters and [`BuildOptions`]. Every builder validates the
//! coverage before creating a single variable, never mutates it, and writes
//! the model as an LP file when [`BuildOptions::export_path`] is set.
//!
//! | Family | Coverage | Problem name |
//! |---|---|---|
//! | [`build_mclp`] | coverage / binary | `MCLP` |
//! | [`build_mclp_cc`] | coverage / partial | `MCLP` |
//! | [`build_threshold`] | coverage / binary | `ThresholdModel` |
//! | [`build_cc_threshold`] | coverage / partial | `ThresholdModel` |
//! | [`build_backup`] | coverage / binary | `BCLP` |
//! | [`build_lscp`] | coverage / binary | `LSCP` |
//! | [`build_traumah`] | coverage / traumah | `TRAUMAH` |

mod backup;
mod lscp;
mod mclp;
mod threshold;
mod traumah;

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use spatialopt_core::{
    validate_coverage, CoverageKind, CoverageMode, CoverageStore, DemandUnit, FacilityCaps,
    Result, SpatialOptError, AD_TC_PAIR,
};
use tracing::{debug, info};

use crate::problem::{
    Constraint, LinearExpr, Problem, Relation, VarKey, VarSpec, BACKUP_PREFIX, DEMAND_PREFIX,
};

pub use backup::build_backup;
pub use lscp::build_lscp;
pub use mclp::{build_mclp, build_mclp_cc};
pub use threshold::{build_cc_threshold, build_threshold, THRESHOLD_ROW};
pub use traumah::{build_traumah, TraumahCounts};

/// Default separator between the parts of a variable name.
pub const DEFAULT_DELINEATOR: &str = "$";

/// Name of the row limiting the overall number of facilities.
pub const TOTAL_FACILITIES_ROW: &str = "NumTotalFacilities";

/// Options shared by every model family.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Separator composing variable names, `$` by default.
    pub delineator: String,
    /// Weight demand units by serviceable demand instead of demand.
    pub use_serviceable_demand: bool,
    /// Write the model in LP format to this file.
    pub export_path: Option<PathBuf>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            delineator: DEFAULT_DELINEATOR.to_string(),
            use_serviceable_demand: false,
            export_path: None,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delineator(mut self, delineator: impl Into<String>) -> Self {
        self.delineator = delineator.into();
        self
    }

    pub fn with_serviceable_demand(mut self, enabled: bool) -> Self {
        self.use_serviceable_demand = enabled;
        self
    }

    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = Some(path.into());
        self
    }
}

/// The covering-model families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    Mclp,
    MclpCc,
    Threshold,
    CcThreshold,
    Backup,
    Lscp,
    Traumah,
}

impl ModelFamily {
    /// The coverage type the family is formulated over.
    pub fn coverage_kind(self) -> CoverageKind {
        match self {
            ModelFamily::Mclp | ModelFamily::Threshold | ModelFamily::Backup | ModelFamily::Lscp => {
                CoverageKind::Binary
            }
            ModelFamily::MclpCc | ModelFamily::CcThreshold => CoverageKind::Partial,
            ModelFamily::Traumah => CoverageKind::Traumah,
        }
    }

    /// Name prefixes of the non-facility variables the family creates.
    ///
    /// A facility type spelled like one of them would compose the same
    /// variable names.
    pub fn reserved_prefixes(self) -> &'static [&'static str] {
        match self {
            ModelFamily::Mclp
            | ModelFamily::MclpCc
            | ModelFamily::Threshold
            | ModelFamily::CcThreshold => &[DEMAND_PREFIX],
            ModelFamily::Backup => &[BACKUP_PREFIX],
            ModelFamily::Lscp => &[],
            ModelFamily::Traumah => &[DEMAND_PREFIX, AD_TC_PAIR],
        }
    }

    fn has_caps(self) -> bool {
        matches!(
            self,
            ModelFamily::Mclp | ModelFamily::MclpCc | ModelFamily::Backup
        )
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelFamily::Mclp => "MCLP",
            ModelFamily::MclpCc => "MCLP-CC",
            ModelFamily::Threshold => "Threshold",
            ModelFamily::CcThreshold => "CC-Threshold",
            ModelFamily::Backup => "Backup",
            ModelFamily::Lscp => "LSCP",
            ModelFamily::Traumah => "TRAUMAH",
        };
        write!(f, "{}", name)
    }
}

/// Validates `coverage` for `family` and the variable naming contract.
fn prepare(family: ModelFamily, coverage: &CoverageStore, options: &BuildOptions) -> Result<()> {
    debug!(
        event = "model_build_started",
        family = %family,
        demand_count = coverage.demand.len(),
        facility_count = coverage.facility_count(),
    );
    validate_coverage(coverage, &[CoverageMode::Coverage], &[family.coverage_kind()])?;
    check_delineator(coverage, &options.delineator)?;
    check_facility_types(family, coverage)
}

/// Rejects facility types whose variables or cap rows would share names
/// with the family's own.
fn check_facility_types(family: ModelFamily, coverage: &CoverageStore) -> Result<()> {
    for facility_type in coverage.facilities.keys() {
        if family.reserved_prefixes().contains(&facility_type.as_str()) {
            return Err(SpatialOptError::Schema(format!(
                "facility type '{}' is reserved by the {} model",
                facility_type, family
            )));
        }
        if family.has_caps() && format!("Num{}", facility_type) == TOTAL_FACILITIES_ROW {
            return Err(SpatialOptError::Schema(format!(
                "facility type '{}' clashes with the {} row",
                facility_type, TOTAL_FACILITIES_ROW
            )));
        }
    }
    Ok(())
}

/// Rejects ids that would make composed variable names ambiguous.
fn check_delineator(coverage: &CoverageStore, delineator: &str) -> Result<()> {
    if delineator.is_empty() {
        return Err(SpatialOptError::Range(
            "delineator must not be empty".to_string(),
        ));
    }
    let facility_ids = coverage
        .facilities
        .iter()
        .flat_map(|(facility_type, ids)| std::iter::once(facility_type).chain(ids));
    for id in coverage.demand.keys().chain(facility_ids) {
        if id.contains(delineator) {
            return Err(SpatialOptError::Schema(format!(
                "identifier '{}' contains the delineator '{}'",
                id, delineator
            )));
        }
    }
    Ok(())
}

/// Checks a coverage percentage.
fn check_psi(psi: f64) -> Result<()> {
    if !psi.is_finite() || !(0.0..=100.0).contains(&psi) {
        return Err(SpatialOptError::Range(format!(
            "psi must be a percentage between 0 and 100, got {}",
            psi
        )));
    }
    Ok(())
}

/// Adds one variable per declared facility, in declaration order.
fn add_facility_variables(problem: &mut Problem, coverage: &CoverageStore, spec: VarSpec) {
    for (facility_type, ids) in &coverage.facilities {
        for id in ids {
            problem.add_variable(VarKey::facility(facility_type.as_str(), id.as_str()), spec);
        }
    }
}

/// Sum of every declared facility variable.
fn all_facilities(coverage: &CoverageStore) -> LinearExpr {
    coverage
        .facilities
        .iter()
        .flat_map(|(facility_type, ids)| {
            ids.iter()
                .map(move |id| (VarKey::facility(facility_type.as_str(), id.as_str()), 1.0))
        })
        .collect()
}

/// Sum of the facility variables covering a demand unit, weighted by their
/// coverage values when `weighted`.
fn covering_expr(unit: &DemandUnit, weighted: bool) -> LinearExpr {
    unit.covering()
        .map(|(facility_type, id, value)| {
            let coefficient = if weighted { value } else { 1.0 };
            (VarKey::facility(facility_type.as_str(), id.as_str()), coefficient)
        })
        .collect()
}

/// Adds the `NumTotalFacilities` row and a `Num{type}` row per declared
/// facility type with a cap.
fn add_cap_constraints(problem: &mut Problem, coverage: &CoverageStore, caps: &FacilityCaps) {
    problem.add_constraint(Constraint::named(
        TOTAL_FACILITIES_ROW,
        all_facilities(coverage),
        Relation::Le,
        caps.total as f64,
    ));
    for (facility_type, ids) in &coverage.facilities {
        let Some(cap) = caps.for_type(facility_type) else {
            continue;
        };
        let expr = ids
            .iter()
            .map(|id| (VarKey::facility(facility_type.as_str(), id.as_str()), 1.0))
            .collect();
        problem.add_constraint(Constraint::named(
            format!("Num{}", facility_type),
            expr,
            Relation::Le,
            cap as f64,
        ));
    }
}

/// Logs the finished model and exports it if requested.
fn finish(family: ModelFamily, problem: Problem, options: &BuildOptions) -> Result<Problem> {
    check_unique_names(&problem)?;
    if let Some(path) = &options.export_path {
        problem.write_lp(path)?;
    }
    info!(
        event = "model_built",
        family = %family,
        problem = %problem.name,
        variable_count = problem.variables.len(),
        constraint_count = problem.constraints.len(),
    );
    Ok(problem)
}

/// Every variable and named row must reach the solver under its own name.
fn check_unique_names(problem: &Problem) -> Result<()> {
    let mut variables = HashSet::with_capacity(problem.variables.len());
    for key in problem.variables.keys() {
        let name = problem.variable_name(key);
        if !variables.insert(name.clone()) {
            return Err(SpatialOptError::Schema(format!(
                "variable name '{}' is composed twice",
                name
            )));
        }
    }
    let mut rows = HashSet::new();
    for name in problem.constraints.iter().filter_map(|c| c.name.as_deref()) {
        if !rows.insert(name) {
            return Err(SpatialOptError::Schema(format!(
                "constraint name '{}' is used twice",
                name
            )));
        }
    }
    Ok(())
}
