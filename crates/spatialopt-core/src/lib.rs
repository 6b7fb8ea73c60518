//! SpatialOpt Core - Coverage data model for facility-location covering problems
//!
//! This crate provides the data every covering model is built from:
//! - [`CoverageStore`]: demand units, facilities and the coverage relationship
//! - Validation of coverage mode/type against a model family
//! - Merging of coverages over disjoint facility types
//! - Serviceable-demand updates, distance-matrix coverage and coverage summaries
//!
//! # Example
//!
//! ```
//! use spatialopt_core::{CoverageKind, CoverageMode, CoverageStore};
//!
//! let coverage = CoverageStore::from_json_str(r#"{
//!     "version": "1",
//!     "type": {"mode": "coverage", "type": "binary"},
//!     "demand": {
//!         "A": {"area": 0, "demand": 10, "serviceableDemand": 10, "coverage": {"F": {"f1": 1}}},
//!         "B": {"area": 0, "demand": 5, "serviceableDemand": 0, "coverage": {"F": {}}}
//!     },
//!     "facilities": {"F": ["f1"]},
//!     "totalDemand": 15,
//!     "totalServiceableDemand": 10
//! }"#).unwrap();
//!
//! assert_eq!(coverage.coverage_type.mode, CoverageMode::Coverage);
//! assert_eq!(coverage.coverage_type.kind, CoverageKind::Binary);
//! assert_eq!(coverage.demand.len(), 2);
//! ```

pub mod caps;
pub mod coverage;
pub mod distance;
pub mod error;
pub mod merge;
pub mod summary;
pub mod validate;

pub use caps::FacilityCaps;
pub use coverage::{
    AirPair, CoverageKind, CoverageMode, CoverageStore, CoverageType, DemandId, DemandUnit,
    FacilityCoverage, FacilityId, FacilityType, GroundCover, TraumahCoverage, UnitCoverage,
    AD_TC_PAIR, AIR_DEPOT, TRAUMA_CENTER,
};
pub use distance::{binary_coverage_from_distances, DistanceRecord, DEFAULT_FACILITY_TYPE};
pub use error::{Result, SpatialOptError};
pub use merge::{merge_coverages, update_serviceable_demand};
pub use summary::CoverageSummary;
pub use validate::{validate_coverage, validate_coverage_type};
