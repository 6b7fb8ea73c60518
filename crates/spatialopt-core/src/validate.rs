//! Coverage validation.
//!
//! Each model family accepts only certain coverage modes and types. Validation
//! runs before any variable is created, so a rejected coverage never yields a
//! partial model.

use std::collections::HashSet;

use crate::coverage::{CoverageKind, CoverageMode, CoverageStore, UnitCoverage};
use crate::error::{Result, SpatialOptError};

/// Validates a coverage for a model family.
///
/// # Errors
///
/// - [`SpatialOptError::Range`] if the coverage mode or type is not one of
///   `modes` / `types`.
/// - [`SpatialOptError::Schema`] if the coverage references an undeclared
///   facility, declares a facility twice, or holds a coverage value the
///   type does not allow. Partial values must satisfy
///   `0 <= value <= serviceableDemand <= demand`, up to rounding.
///
/// # Example
///
/// ```
/// use spatialopt_core::{validate_coverage, CoverageKind, CoverageMode, CoverageStore};
///
/// let coverage = CoverageStore::new(CoverageKind::Partial);
/// assert!(validate_coverage(&coverage, &[CoverageMode::Coverage], &[CoverageKind::Partial]).is_ok());
/// assert!(validate_coverage(&coverage, &[CoverageMode::Coverage], &[CoverageKind::Binary]).is_err());
/// ```
pub fn validate_coverage(
    coverage: &CoverageStore,
    modes: &[CoverageMode],
    types: &[CoverageKind],
) -> Result<()> {
    validate_coverage_type(coverage, modes, types)?;
    check_integrity(coverage)
}

/// Checks only the `{mode, type}` discriminant against the accepted sets.
///
/// Used where references may legitimately point outside the coverage, such
/// as the inputs of a merge.
pub fn validate_coverage_type(
    coverage: &CoverageStore,
    modes: &[CoverageMode],
    types: &[CoverageKind],
) -> Result<()> {
    let coverage_type = coverage.coverage_type;
    if !types.contains(&coverage_type.kind) {
        return Err(SpatialOptError::Range(format!(
            "expected types {:?}, got type '{}'",
            types, coverage_type.kind
        )));
    }
    if !modes.contains(&coverage_type.mode) {
        return Err(SpatialOptError::Range(format!(
            "expected modes {:?}, got mode '{}'",
            modes, coverage_type.mode
        )));
    }
    Ok(())
}

fn check_integrity(coverage: &CoverageStore) -> Result<()> {
    let mut declared: HashSet<(&str, &str)> = HashSet::new();
    for (facility_type, ids) in &coverage.facilities {
        for id in ids {
            if !declared.insert((facility_type.as_str(), id.as_str())) {
                return Err(SpatialOptError::Schema(format!(
                    "facility '{}' declared twice in facility type '{}'",
                    id, facility_type
                )));
            }
        }
    }

    let binary = coverage.coverage_type.kind == CoverageKind::Binary;
    let partial = coverage.coverage_type.kind == CoverageKind::Partial;
    for (demand_id, unit) in &coverage.demand {
        if partial && exceeds(unit.serviceable_demand, unit.demand) {
            return Err(SpatialOptError::Schema(format!(
                "serviceable demand {} of '{}' exceeds its demand {}",
                unit.serviceable_demand, demand_id, unit.demand
            )));
        }
        match &unit.coverage {
            UnitCoverage::Facility(_) => {
                for (facility_type, facility_id, value) in unit.covering() {
                    require_declared(&declared, facility_type, facility_id, demand_id)?;
                    if binary && value != 1.0 {
                        return Err(SpatialOptError::Schema(format!(
                            "binary coverage of '{}' by '{}' must be 1, got {}",
                            demand_id, facility_id, value
                        )));
                    }
                    if !value.is_finite() || value < 0.0 {
                        return Err(SpatialOptError::Schema(format!(
                            "coverage of '{}' by '{}' must be a non-negative number, got {}",
                            demand_id, facility_id, value
                        )));
                    }
                    if partial && exceeds(value, unit.serviceable_demand) {
                        return Err(SpatialOptError::Schema(format!(
                            "coverage {} of '{}' by '{}' exceeds its serviceable demand {}",
                            value, demand_id, facility_id, unit.serviceable_demand
                        )));
                    }
                }
            }
            UnitCoverage::Traumah(lists) => {
                for ground in &lists.ground {
                    require_declared(
                        &declared,
                        crate::TRAUMA_CENTER,
                        &ground.trauma_center,
                        demand_id,
                    )?;
                }
                for pair in &lists.air {
                    require_declared(&declared, crate::AIR_DEPOT, &pair.air_depot, demand_id)?;
                    require_declared(
                        &declared,
                        crate::TRAUMA_CENTER,
                        &pair.trauma_center,
                        demand_id,
                    )?;
                }
            }
        }
    }
    Ok(())
}

// Analyzer output carries float noise from area ratios.
fn exceeds(value: f64, bound: f64) -> bool {
    value > bound + 1e-9 * bound.abs().max(1.0)
}

fn require_declared<'a>(
    declared: &HashSet<(&'a str, &'a str)>,
    facility_type: &'a str,
    facility_id: &'a str,
    demand_id: &str,
) -> Result<()> {
    if declared.contains(&(facility_type, facility_id)) {
        Ok(())
    } else {
        Err(SpatialOptError::Schema(format!(
            "demand unit '{}' references undeclared facility '{}' of type '{}'",
            demand_id, facility_id, facility_type
        )))
    }
}

#[cfg(test)]
mod tests;
