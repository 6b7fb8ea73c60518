//! Facility-count limits for the maximal and backup covering models.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::coverage::FacilityType;

/// Number of facilities a model may site, overall and per facility type.
///
/// Serializes as a flat map whose `total` key is the overall limit, e.g.
/// `{"total": 5, "fire_stations": 2}`.
///
/// # Example
///
/// ```
/// use spatialopt_core::FacilityCaps;
///
/// let caps = FacilityCaps::total(5).with_type("fire_stations", 2);
/// assert_eq!(caps.total, 5);
/// assert_eq!(caps.for_type("fire_stations"), Some(2));
/// assert_eq!(caps.for_type("total"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityCaps {
    /// Maximum number of facilities over all types.
    pub total: u64,
    /// Maximum number of facilities of individual types.
    #[serde(flatten)]
    pub per_type: IndexMap<FacilityType, u64>,
}

impl FacilityCaps {
    /// Creates caps limiting only the total number of facilities.
    pub fn total(total: u64) -> Self {
        Self {
            total,
            per_type: IndexMap::new(),
        }
    }

    /// Adds a limit for one facility type.
    pub fn with_type(mut self, facility_type: impl Into<FacilityType>, cap: u64) -> Self {
        self.per_type.insert(facility_type.into(), cap);
        self
    }

    /// Returns the limit for `facility_type`, if one is set.
    ///
    /// `"total"` is never a facility type.
    pub fn for_type(&self, facility_type: &str) -> Option<u64> {
        if facility_type == "total" {
            return None;
        }
        self.per_type.get(facility_type).copied()
    }
}
