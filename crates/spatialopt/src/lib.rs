//! SpatialOpt - Facility-location covering models in Rust
//!
//! Build maximal covering, set covering, threshold, backup and TRAUMAH models
//! from a coverage relationship, hand them to a solver, and read the chosen
//! facilities back.
//!
//! # Example
//!
//! ```rust
//! use spatialopt::prelude::*;
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
//! let config = ModelConfig::from_toml_str(r#"
//!     [model]
//!     type = "mclp"
//!     [model.caps]
//!     total = 1
//! "#).unwrap();
//!
//! let problem = build_model(&coverage, &config).unwrap();
//! assert_eq!(problem.name, "MCLP");
//! assert_eq!(problem.status(), SolveStatus::NotSolved);
//! ```

pub use spatialopt_core::{
    binary_coverage_from_distances, merge_coverages, update_serviceable_demand,
    validate_coverage, validate_coverage_type, CoverageKind, CoverageMode, CoverageStore,
    CoverageSummary, CoverageType, DemandUnit, DistanceRecord, FacilityCaps, Result,
    SpatialOptError,
};

pub use spatialopt_config::{ConfigError, ModelConfig, ModelKindConfig};

pub use spatialopt_models::{
    build_backup, build_cc_threshold, build_lscp, build_mclp, build_mclp_cc, build_threshold,
    build_traumah, extract_ids, BuildOptions, ModelFamily, Problem, Sense, Solution, SolveStatus,
    Solver, SolverError, TraumahCounts, VarKey,
};

mod model;
pub use model::{build_model, load_config, selected_facilities};

pub mod workflow;
pub use workflow::{solve_mclp_from_distances, MclpReport};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{
        build_model, load_config, selected_facilities, solve_mclp_from_distances, MclpReport,
    };
    pub use super::{
        CoverageKind, CoverageMode, CoverageStore, CoverageSummary, FacilityCaps,
        SpatialOptError,
    };
    pub use super::{ModelConfig, ModelKindConfig};
    pub use super::{BuildOptions, ModelFamily, Problem, SolveStatus, Solver};
}
