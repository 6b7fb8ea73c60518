//! Binary coverage from a precomputed facility/demand distance matrix.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::coverage::{CoverageKind, CoverageStore, DemandUnit, UnitCoverage};
use crate::error::{Result, SpatialOptError};

/// Facility type used when none is given.
pub const DEFAULT_FACILITY_TYPE: &str = "facility";

/// One row of a pairwise facility/demand distance matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceRecord {
    pub facility_id: String,
    pub demand_id: String,
    /// Demand weight of the demand unit; repeated on every row of that unit.
    pub demand: f64,
    pub distance: f64,
}

impl DistanceRecord {
    pub fn new(
        facility_id: impl Into<String>,
        demand_id: impl Into<String>,
        demand: f64,
        distance: f64,
    ) -> Self {
        Self {
            facility_id: facility_id.into(),
            demand_id: demand_id.into(),
            demand,
            distance,
        }
    }
}

/// Builds a binary coverage from distance rows.
///
/// A facility covers a demand unit when their distance is at most
/// `distance_threshold`. A unit covered by any facility has its full demand
/// serviceable. Demand units and facilities keep the order of their first row.
///
/// # Errors
///
/// Returns a range error if the threshold is not a finite number.
///
/// # Example
///
/// ```
/// use spatialopt_core::{binary_coverage_from_distances, DistanceRecord};
///
/// let rows = vec![
///     DistanceRecord::new("f1", "A", 10.0, 120.0),
///     DistanceRecord::new("f1", "B", 5.0, 900.0),
/// ];
/// let coverage = binary_coverage_from_distances(&rows, 500.0, None).unwrap();
///
/// assert_eq!(coverage.total_demand, 15.0);
/// assert_eq!(coverage.total_serviceable_demand, 10.0);
/// assert!(coverage.demand["B"].is_uncovered());
/// ```
pub fn binary_coverage_from_distances(
    records: &[DistanceRecord],
    distance_threshold: f64,
    facility_type: Option<&str>,
) -> Result<CoverageStore> {
    if !distance_threshold.is_finite() {
        return Err(SpatialOptError::Range(format!(
            "distance threshold must be a finite number, got {}",
            distance_threshold
        )));
    }
    let facility_type = facility_type.unwrap_or(DEFAULT_FACILITY_TYPE).to_string();

    let mut store = CoverageStore::new(CoverageKind::Binary);
    let mut facility_ids: Vec<String> = Vec::new();
    for record in records {
        if !facility_ids.contains(&record.facility_id) {
            facility_ids.push(record.facility_id.clone());
        }
        store
            .demand
            .entry(record.demand_id.clone())
            .or_insert_with(|| {
                let mut unit = DemandUnit::new(record.demand, 0.0);
                let mut map = IndexMap::new();
                map.insert(facility_type.clone(), IndexMap::new());
                unit.coverage = UnitCoverage::Facility(map);
                unit
            });
    }
    store.facilities.insert(facility_type.clone(), facility_ids);

    for record in records.iter().filter(|r| r.distance <= distance_threshold) {
        if let Some(unit) = store.demand.get_mut(&record.demand_id) {
            unit.serviceable_demand = unit.demand;
        }
        store.cover(&record.demand_id, &facility_type, &record.facility_id, 1.0)?;
    }
    store.recompute_totals();

    info!(
        event = "distance_coverage_generated",
        rows = records.len(),
        demand_count = store.demand.len(),
        facility_count = store.facility_count(),
        total_demand = store.total_demand,
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        let rows = vec![
            DistanceRecord::new("1", "A", 10.0, 500.0),
            DistanceRecord::new("2", "A", 10.0, 501.0),
        ];
        let coverage = binary_coverage_from_distances(&rows, 500.0, Some("station")).unwrap();

        let map = coverage.demand["A"].facility_coverage().unwrap();
        assert_eq!(map["station"].len(), 1);
        assert_eq!(map["station"]["1"], 1.0);
        assert_eq!(coverage.facilities["station"], vec!["1", "2"]);
    }

    #[test]
    fn test_totals_and_default_type() {
        let rows = vec![
            DistanceRecord::new("f1", "A", 10.0, 1.0),
            DistanceRecord::new("f2", "A", 10.0, 2.0),
            DistanceRecord::new("f2", "B", 4.0, 50.0),
        ];
        let coverage = binary_coverage_from_distances(&rows, 10.0, None).unwrap();

        assert_eq!(coverage.version, "1");
        assert!(coverage.facilities.contains_key(DEFAULT_FACILITY_TYPE));
        assert_eq!(coverage.total_demand, 14.0);
        assert_eq!(coverage.total_serviceable_demand, 10.0);
        assert_eq!(coverage.demand["B"].serviceable_demand, 0.0);
    }

    #[test]
    fn test_rejects_nan_threshold() {
        let err = binary_coverage_from_distances(&[], f64::NAN, None).unwrap_err();
        assert!(matches!(err, SpatialOptError::Range(_)));
    }
}
