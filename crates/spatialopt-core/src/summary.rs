//! Coverage achieved by a set of chosen facilities.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::coverage::{
    CoverageKind, CoverageStore, FacilityId, FacilityType, UnitCoverage, AIR_DEPOT, TRAUMA_CENTER,
};

/// How much demand a selection of facilities covers.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSummary {
    /// Number of facilities in the selection.
    pub facilities_chosen: usize,
    /// Summed weight of all demand units.
    pub total_demand: f64,
    /// Summed weight covered by the selection.
    pub covered_demand: f64,
}

impl CoverageSummary {
    /// Evaluates `selection` (chosen ids per facility type) against `coverage`.
    ///
    /// Binary and TRAUMAH units count fully once covered. A partial unit
    /// contributes the summed coverage values of the chosen facilities, capped
    /// at the unit's weight.
    ///
    /// # Example
    ///
    /// ```
    /// use indexmap::IndexMap;
    /// use spatialopt_core::{CoverageKind, CoverageStore, CoverageSummary};
    ///
    /// let mut coverage = CoverageStore::new(CoverageKind::Binary);
    /// coverage.add_demand("A", 10.0, 10.0).unwrap();
    /// coverage.add_demand("B", 5.0, 0.0).unwrap();
    /// coverage.add_facility("F", "f1").unwrap();
    /// coverage.cover("A", "F", "f1", 1.0).unwrap();
    ///
    /// let mut selection = IndexMap::new();
    /// selection.insert("F".to_string(), vec!["f1".to_string()]);
    /// let summary = CoverageSummary::evaluate(&coverage, &selection, false);
    ///
    /// assert_eq!(summary.covered_demand, 10.0);
    /// assert!((summary.percent_covered() - 66.666).abs() < 0.01);
    /// ```
    pub fn evaluate(
        coverage: &CoverageStore,
        selection: &IndexMap<FacilityType, Vec<FacilityId>>,
        use_serviceable_demand: bool,
    ) -> Self {
        let chosen: HashSet<(&str, &str)> = selection
            .iter()
            .flat_map(|(facility_type, ids)| {
                ids.iter().map(move |id| (facility_type.as_str(), id.as_str()))
            })
            .collect();
        let is_chosen = |facility_type: &str, id: &str| chosen.contains(&(facility_type, id));

        let mut covered_demand = 0.0;
        for unit in coverage.demand.values() {
            let weight = unit.weight(use_serviceable_demand);
            covered_demand += match (&unit.coverage, coverage.kind()) {
                (UnitCoverage::Facility(_), CoverageKind::Partial) => {
                    let served: f64 = unit
                        .covering()
                        .filter(|(t, id, _)| is_chosen(t, id))
                        .map(|(_, _, value)| value)
                        .sum();
                    served.min(weight)
                }
                (UnitCoverage::Facility(_), _) => {
                    if unit.covering().any(|(t, id, _)| is_chosen(t, id)) {
                        weight
                    } else {
                        0.0
                    }
                }
                (UnitCoverage::Traumah(lists), _) => {
                    let by_ground = lists
                        .ground
                        .iter()
                        .any(|g| is_chosen(TRAUMA_CENTER, &g.trauma_center));
                    let by_air = lists.air.iter().any(|pair| {
                        is_chosen(AIR_DEPOT, &pair.air_depot)
                            && is_chosen(TRAUMA_CENTER, &pair.trauma_center)
                    });
                    if by_ground || by_air {
                        weight
                    } else {
                        0.0
                    }
                }
            };
        }

        Self {
            facilities_chosen: chosen.len(),
            total_demand: coverage.total_weight(use_serviceable_demand),
            covered_demand,
        }
    }

    /// Returns the covered share of total demand in percent.
    pub fn percent_covered(&self) -> f64 {
        if self.total_demand > 0.0 {
            100.0 * self.covered_demand / self.total_demand
        } else {
            0.0
        }
    }
}
