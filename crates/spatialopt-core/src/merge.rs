//! Combining coverages and overwriting serviceable demand.
//!
//! Siting several facility layers at once starts from one coverage per layer.
//! [`merge_coverages`] unions them into a single coverage over the same demand
//! units. Merging never recomputes serviceable demand: a merged partial
//! coverage needs an externally dissolved service area, applied afterwards
//! with [`update_serviceable_demand`].

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::info;

use crate::coverage::{CoverageKind, CoverageMode, CoverageStore, DemandId, UnitCoverage};
use crate::error::{Result, SpatialOptError};
use crate::validate::validate_coverage_type;

/// Merges coverages of the same type into one.
///
/// The result starts as the first coverage. Each later coverage adds its
/// facility types and unions its per-unit coverage maps into the result; a
/// colliding `(facility type, facility id)` entry takes the later value.
/// Facility sets are therefore independent of input order, coverage values
/// are not.
///
/// # Errors
///
/// - [`SpatialOptError::Validation`] if `coverages` is empty or the inputs
///   do not share the same demand ids.
/// - [`SpatialOptError::Conflict`] if two inputs declare the same facility type.
/// - [`SpatialOptError::Range`] if an input is not a `coverage`-mode coverage
///   of the first input's type, or is a `traumah` coverage.
pub fn merge_coverages(coverages: Vec<CoverageStore>) -> Result<CoverageStore> {
    let Some(first) = coverages.first() else {
        return Err(SpatialOptError::Validation(
            "no coverages to merge".to_string(),
        ));
    };
    let kind = first.kind();
    if kind == CoverageKind::Traumah {
        return Err(SpatialOptError::Range(
            "traumah coverages cannot be merged".to_string(),
        ));
    }

    let mut facility_types: HashSet<&str> = HashSet::new();
    for coverage in &coverages {
        validate_coverage_type(coverage, &[CoverageMode::Coverage], &[kind])?;
        for facility_type in coverage.facilities.keys() {
            if !facility_types.insert(facility_type.as_str()) {
                return Err(SpatialOptError::Conflict(format!(
                    "facility type '{}' appears in more than one coverage",
                    facility_type
                )));
            }
        }
    }

    let expected: HashSet<&DemandId> = first.demand.keys().collect();
    for coverage in &coverages[1..] {
        let keys: HashSet<&DemandId> = coverage.demand.keys().collect();
        if keys != expected {
            return Err(SpatialOptError::Validation(
                "coverages do not share the same demand ids".to_string(),
            ));
        }
    }

    let input_count = coverages.len();
    let mut inputs = coverages.into_iter();
    let mut merged = inputs.next().ok_or_else(|| {
        SpatialOptError::Validation("no coverages to merge".to_string())
    })?;

    for coverage in inputs {
        merged.facilities.extend(coverage.facilities);

        for (demand_id, unit) in coverage.demand {
            let UnitCoverage::Facility(incoming) = unit.coverage else {
                continue;
            };
            let Some(target) = merged.demand.get_mut(&demand_id) else {
                continue;
            };
            if let UnitCoverage::Facility(existing) = &mut target.coverage {
                for (facility_type, facilities) in incoming {
                    existing.entry(facility_type).or_default().extend(facilities);
                }
            }
        }
    }

    info!(
        event = "coverages_merged",
        input_count,
        kind = %kind,
        facility_types = merged.facilities.len(),
        demand_count = merged.demand.len(),
    );
    Ok(merged)
}

/// Overwrites each unit's serviceable demand and recomputes the total.
///
/// `values` must be keyed by exactly the coverage's demand ids;
/// [`CoverageStore::serviceable_demand_map`] produces it from another
/// coverage over the same units.
///
/// # Errors
///
/// Returns [`SpatialOptError::Lookup`] if the demand ids differ. The coverage
/// is consumed either way; on error no value has been changed.
pub fn update_serviceable_demand(
    mut coverage: CoverageStore,
    values: &IndexMap<DemandId, f64>,
) -> Result<CoverageStore> {
    if let Some(missing) = coverage.demand.keys().find(|id| !values.contains_key(*id)) {
        return Err(SpatialOptError::Lookup(format!(
            "no serviceable demand for demand unit '{}'",
            missing
        )));
    }
    if let Some(unknown) = values.keys().find(|id| !coverage.demand.contains_key(*id)) {
        return Err(SpatialOptError::Lookup(format!(
            "serviceable demand given for unknown demand unit '{}'",
            unknown
        )));
    }

    let mut total = 0.0;
    for (demand_id, unit) in coverage.demand.iter_mut() {
        let value = values[demand_id];
        unit.serviceable_demand = value;
        total += value;
    }
    coverage.total_serviceable_demand = total;

    info!(
        event = "serviceable_demand_updated",
        demand_count = coverage.demand.len(),
        total_serviceable_demand = total,
    );
    Ok(coverage)
}

#[cfg(test)]
mod tests;
