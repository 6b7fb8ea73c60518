//! The coverage relationship between demand units and candidate facilities.
//!
//! A [`CoverageStore`] is produced by an external analysis step (service areas,
//! distance matrices) and read by every model builder. The `{mode, type}`
//! discriminant is a closed set: unknown values are rejected when the store
//! is parsed, never at the point of use.

mod wire;


use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpatialOptError};

/// Identifier of a demand unit.
pub type DemandId = String;

/// Name of a facility layer, e.g. `"AirDepot"` or `"facility_service_areas"`.
pub type FacilityType = String;

/// Identifier of a facility within its facility type.
pub type FacilityId = String;

/// Per facility type, the facilities covering one demand unit and the
/// coverage value each contributes.
pub type FacilityCoverage = IndexMap<FacilityType, IndexMap<FacilityId, f64>>;

/// Facility type of TRAUMAH air depots.
pub const AIR_DEPOT: &str = "AirDepot";

/// Facility type of TRAUMAH trauma centers.
pub const TRAUMA_CENTER: &str = "TraumaCenter";

/// Key of the air depot / trauma center pair list in TRAUMAH coverage.
pub const AD_TC_PAIR: &str = "ADTCPair";

/// What the coverage values describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverageMode {
    /// Facility-to-demand coverage relationships.
    Coverage,
    /// Serviceable demand only, used as an update source.
    ServiceableDemand,
}

impl fmt::Display for CoverageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageMode::Coverage => write!(f, "coverage"),
            CoverageMode::ServiceableDemand => write!(f, "serviceableDemand"),
        }
    }
}

/// How a facility covers a demand unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageKind {
    /// A facility covers a demand unit entirely; values are always `1`.
    Binary,
    /// A facility covers a portion of a demand unit's demand.
    Partial,
    /// Ground coverage by trauma centers, air coverage by depot/center pairs.
    Traumah,
}

impl fmt::Display for CoverageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageKind::Binary => write!(f, "binary"),
            CoverageKind::Partial => write!(f, "partial"),
            CoverageKind::Traumah => write!(f, "traumah"),
        }
    }
}

/// The `{mode, type}` discriminant of a coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoverageType {
    pub mode: CoverageMode,
    #[serde(rename = "type")]
    pub kind: CoverageKind,
}

impl CoverageType {
    /// Creates a `coverage`-mode discriminant of the given kind.
    pub fn coverage(kind: CoverageKind) -> Self {
        Self {
            mode: CoverageMode::Coverage,
            kind,
        }
    }
}

/// A trauma center reachable from a demand unit by ground transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroundCover {
    #[serde(rename = "TraumaCenter")]
    pub trauma_center: FacilityId,
}

/// An air depot / trauma center pair whose helicopter route serves a demand
/// unit within the distance budget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AirPair {
    #[serde(rename = "TraumaCenter")]
    pub trauma_center: FacilityId,
    #[serde(rename = "AirDepot")]
    pub air_depot: FacilityId,
}

/// Two-echelon coverage of one demand unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraumahCoverage {
    #[serde(rename = "TraumaCenter", default)]
    pub ground: Vec<GroundCover>,
    #[serde(rename = "ADTCPair", default)]
    pub air: Vec<AirPair>,
}

impl TraumahCoverage {
    /// Returns true if neither a trauma center nor a pair serves the unit.
    pub fn is_empty(&self) -> bool {
        self.ground.is_empty() && self.air.is_empty()
    }
}

/// Coverage of one demand unit, shaped by the store's [`CoverageKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitCoverage {
    /// Binary or partial coverage keyed by facility type and id.
    Facility(FacilityCoverage),
    /// TRAUMAH ground and air coverage lists.
    Traumah(TraumahCoverage),
}

impl Default for UnitCoverage {
    fn default() -> Self {
        UnitCoverage::Facility(IndexMap::new())
    }
}

/// A demand unit and the facilities covering it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandUnit {
    pub area: f64,
    pub demand: f64,
    #[serde(rename = "serviceableDemand")]
    pub serviceable_demand: f64,
    #[serde(default)]
    pub coverage: UnitCoverage,
}

impl DemandUnit {
    /// Creates an uncovered demand unit.
    pub fn new(demand: f64, serviceable_demand: f64) -> Self {
        Self {
            area: 0.0,
            demand,
            serviceable_demand,
            coverage: UnitCoverage::default(),
        }
    }

    /// Returns the objective/threshold weight of this unit.
    pub fn weight(&self, use_serviceable_demand: bool) -> f64 {
        if use_serviceable_demand {
            self.serviceable_demand
        } else {
            self.demand
        }
    }

    /// Returns the binary/partial coverage map, if this unit has one.
    pub fn facility_coverage(&self) -> Option<&FacilityCoverage> {
        match &self.coverage {
            UnitCoverage::Facility(map) => Some(map),
            UnitCoverage::Traumah(_) => None,
        }
    }

    /// Returns the TRAUMAH coverage lists, if this unit has them.
    pub fn traumah_coverage(&self) -> Option<&TraumahCoverage> {
        match &self.coverage {
            UnitCoverage::Traumah(traumah) => Some(traumah),
            UnitCoverage::Facility(_) => None,
        }
    }

    /// Iterates `(facility type, facility id, coverage value)` over the
    /// binary/partial coverage of this unit. Empty for TRAUMAH units.
    pub fn covering(&self) -> impl Iterator<Item = (&FacilityType, &FacilityId, f64)> {
        self.facility_coverage()
            .into_iter()
            .flat_map(|map| map.iter())
            .flat_map(|(facility_type, facilities)| {
                facilities
                    .iter()
                    .map(move |(id, value)| (facility_type, id, *value))
            })
    }

    /// Returns true if no facility of any type covers this unit.
    pub fn is_uncovered(&self) -> bool {
        match &self.coverage {
            UnitCoverage::Facility(map) => map.values().all(|facilities| facilities.is_empty()),
            UnitCoverage::Traumah(traumah) => traumah.is_empty(),
        }
    }
}

/// The complete coverage relationship consumed by the model builders.
///
/// `total_demand` and `total_serviceable_demand` are aggregates over
/// `demand`; operations changing the underlying values keep them in sync,
/// plain field mutation does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageStore {
    pub version: String,
    #[serde(rename = "type")]
    pub coverage_type: CoverageType,
    pub demand: IndexMap<DemandId, DemandUnit>,
    pub facilities: IndexMap<FacilityType, Vec<FacilityId>>,
    #[serde(rename = "totalDemand")]
    pub total_demand: f64,
    #[serde(rename = "totalServiceableDemand")]
    pub total_serviceable_demand: f64,
}

impl CoverageStore {
    /// Creates an empty `coverage`-mode store of the given kind.
    pub fn new(kind: CoverageKind) -> Self {
        Self {
            version: "1".to_string(),
            coverage_type: CoverageType::coverage(kind),
            demand: IndexMap::new(),
            facilities: IndexMap::new(),
            total_demand: 0.0,
            total_serviceable_demand: 0.0,
        }
    }

    /// Returns the coverage kind.
    pub fn kind(&self) -> CoverageKind {
        self.coverage_type.kind
    }

    /// Declares a facility. Fails with a schema error on a duplicate id.
    pub fn add_facility(
        &mut self,
        facility_type: impl Into<FacilityType>,
        id: impl Into<FacilityId>,
    ) -> Result<()> {
        let facility_type = facility_type.into();
        let id = id.into();
        let ids = self.facilities.entry(facility_type.clone()).or_default();
        if ids.contains(&id) {
            return Err(SpatialOptError::Schema(format!(
                "duplicate facility '{}' in facility type '{}'",
                id, facility_type
            )));
        }
        ids.push(id);
        Ok(())
    }

    /// Adds an uncovered demand unit and updates both totals.
    ///
    /// Fails with a schema error if the id already exists.
    pub fn add_demand(
        &mut self,
        id: impl Into<DemandId>,
        demand: f64,
        serviceable_demand: f64,
    ) -> Result<()> {
        let id = id.into();
        if self.demand.contains_key(&id) {
            return Err(SpatialOptError::Schema(format!("duplicate demand unit '{}'", id)));
        }
        let mut unit = DemandUnit::new(demand, serviceable_demand);
        if self.kind() == CoverageKind::Traumah {
            unit.coverage = UnitCoverage::Traumah(TraumahCoverage::default());
        }
        self.demand.insert(id, unit);
        self.total_demand += demand;
        self.total_serviceable_demand += serviceable_demand;
        Ok(())
    }

    /// Records that `facility_id` covers `demand_id` with `value`.
    ///
    /// Binary coverages record `1` regardless of `value`; absence means
    /// "not covered".
    pub fn cover(
        &mut self,
        demand_id: &str,
        facility_type: &str,
        facility_id: &str,
        value: f64,
    ) -> Result<()> {
        let binary = self.kind() == CoverageKind::Binary;
        let unit = self.unit_mut(demand_id)?;
        match &mut unit.coverage {
            UnitCoverage::Facility(map) => {
                let value = if binary { 1.0 } else { value };
                map.entry(facility_type.to_string())
                    .or_default()
                    .insert(facility_id.to_string(), value);
                Ok(())
            }
            UnitCoverage::Traumah(_) => Err(SpatialOptError::Schema(format!(
                "demand unit '{}' holds traumah coverage",
                demand_id
            ))),
        }
    }

    /// Records that a trauma center serves `demand_id` by ground.
    pub fn cover_ground(&mut self, demand_id: &str, trauma_center: &str) -> Result<()> {
        let traumah = self.traumah_mut(demand_id)?;
        traumah.ground.push(GroundCover {
            trauma_center: trauma_center.to_string(),
        });
        Ok(())
    }

    /// Records that the `air_depot`/`trauma_center` pair serves `demand_id` by air.
    pub fn cover_air(&mut self, demand_id: &str, air_depot: &str, trauma_center: &str) -> Result<()> {
        let traumah = self.traumah_mut(demand_id)?;
        traumah.air.push(AirPair {
            trauma_center: trauma_center.to_string(),
            air_depot: air_depot.to_string(),
        });
        Ok(())
    }

    /// Recomputes `total_demand` and `total_serviceable_demand` from the units.
    pub fn recompute_totals(&mut self) {
        self.total_demand = self.demand.values().map(|unit| unit.demand).sum();
        self.total_serviceable_demand =
            self.demand.values().map(|unit| unit.serviceable_demand).sum();
    }

    /// Returns the summed weight of all demand units.
    pub fn total_weight(&self, use_serviceable_demand: bool) -> f64 {
        self.demand
            .values()
            .map(|unit| unit.weight(use_serviceable_demand))
            .sum()
    }

    /// Returns the serviceable demand of every unit, keyed by demand id.
    ///
    /// This is the shape [`update_serviceable_demand`](crate::update_serviceable_demand)
    /// consumes.
    pub fn serviceable_demand_map(&self) -> IndexMap<DemandId, f64> {
        self.demand
            .iter()
            .map(|(id, unit)| (id.clone(), unit.serviceable_demand))
            .collect()
    }

    /// Returns the number of declared facilities over all types.
    pub fn facility_count(&self) -> usize {
        self.facilities.values().map(Vec::len).sum()
    }

    fn unit_mut(&mut self, demand_id: &str) -> Result<&mut DemandUnit> {
        self.demand
            .get_mut(demand_id)
            .ok_or_else(|| SpatialOptError::Schema(format!("unknown demand unit '{}'", demand_id)))
    }

    fn traumah_mut(&mut self, demand_id: &str) -> Result<&mut TraumahCoverage> {
        let unit = self.unit_mut(demand_id)?;
        match &mut unit.coverage {
            UnitCoverage::Traumah(traumah) => Ok(traumah),
            UnitCoverage::Facility(_) => Err(SpatialOptError::Schema(format!(
                "demand unit '{}' does not hold traumah coverage",
                demand_id
            ))),
        }
    }
}
