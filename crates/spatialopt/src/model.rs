//! Config-driven model building.

use std::path::Path;

use indexmap::IndexMap;
use spatialopt_config::{ConfigError, ModelConfig, ModelKindConfig};
use spatialopt_core::{CoverageStore, FacilityId, FacilityType, Result, SpatialOptError};
use spatialopt_models::{
    build_backup, build_cc_threshold, build_lscp, build_mclp, build_mclp_cc, build_threshold,
    build_traumah, Problem,
};
use tracing::debug;

/// Builds the model `config` describes over `coverage`.
///
/// # Errors
///
/// - [`SpatialOptError::Range`] if the configuration is invalid.
/// - Any error of the selected builder.
pub fn build_model(coverage: &CoverageStore, config: &ModelConfig) -> Result<Problem> {
    config.validate().map_err(from_config_error)?;
    let options = config.build_options();
    debug!(
        event = "model_configured",
        family = %config.model.family(),
        delineator = %options.delineator,
        use_serviceable_demand = options.use_serviceable_demand,
    );

    match &config.model {
        ModelKindConfig::Mclp(params) => build_mclp(coverage, &params.caps, &options),
        ModelKindConfig::MclpCc(params) => build_mclp_cc(coverage, &params.caps, &options),
        ModelKindConfig::Threshold(params) => build_threshold(coverage, params.psi, &options),
        ModelKindConfig::CcThreshold(params) => {
            build_cc_threshold(coverage, params.psi, &options)
        }
        ModelKindConfig::Backup(params) => build_backup(coverage, &params.caps, &options),
        ModelKindConfig::Lscp => build_lscp(coverage, &options),
        ModelKindConfig::Traumah(params) => build_traumah(coverage, (*params).into(), &options),
    }
}

/// Facilities of a solved `problem` chosen at the configured threshold.
pub fn selected_facilities(
    problem: &Problem,
    config: &ModelConfig,
) -> IndexMap<FacilityType, Vec<FacilityId>> {
    problem.selection(config.threshold)
}

/// Loads a model configuration, TOML or YAML by file extension.
///
/// # Errors
///
/// I/O errors pass through; unparsable files are schema errors and invalid
/// values are range errors.
pub fn load_config(path: impl AsRef<Path>) -> Result<ModelConfig> {
    let path = path.as_ref();
    let yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let loaded = if yaml {
        ModelConfig::from_yaml_file(path)
    } else {
        ModelConfig::from_toml_file(path)
    };
    loaded.map_err(from_config_error)
}

fn from_config_error(err: ConfigError) -> SpatialOptError {
    match err {
        ConfigError::Io(err) => SpatialOptError::Io(err),
        ConfigError::Toml(err) => SpatialOptError::Schema(format!("model configuration: {}", err)),
        ConfigError::Yaml(err) => SpatialOptError::Schema(format!("model configuration: {}", err)),
        ConfigError::Invalid(msg) => SpatialOptError::Range(msg),
    }
}

#[cfg(test)]
mod tests {
    use spatialopt_config::{CapsConfig, ThresholdConfig};
    use spatialopt_core::{CoverageKind, FacilityCaps};
    use spatialopt_models::{ModelFamily, Solution, SolveStatus, Solver, SolverError};

    use super::*;

    fn coverage() -> CoverageStore {
        let mut coverage = CoverageStore::new(CoverageKind::Binary);
        coverage.add_demand("A", 10.0, 10.0).unwrap();
        coverage.add_facility("F", "f1").unwrap();
        coverage.cover("A", "F", "f1", 1.0).unwrap();
        coverage
    }

    #[test]
    fn test_dispatch_by_family() {
        let coverage = coverage();
        let cases = [
            (
                ModelKindConfig::Mclp(CapsConfig {
                    caps: FacilityCaps::total(1),
                }),
                "MCLP",
            ),
            (
                ModelKindConfig::Threshold(ThresholdConfig { psi: 50.0 }),
                "ThresholdModel",
            ),
            (
                ModelKindConfig::Backup(CapsConfig {
                    caps: FacilityCaps::total(1),
                }),
                "BCLP",
            ),
            (ModelKindConfig::Lscp, "LSCP"),
        ];
        for (model, name) in cases {
            let problem = build_model(&coverage, &ModelConfig::new(model)).unwrap();
            assert_eq!(problem.name, name);
        }
    }

    #[test]
    fn test_invalid_config_is_range_error() {
        let config = ModelConfig::new(ModelKindConfig::Lscp).with_delineator("");
        let err = build_model(&coverage(), &config).unwrap_err();
        assert!(matches!(err, SpatialOptError::Range(_)));
    }

    #[test]
    fn test_family_mismatch_is_range_error() {
        let config = ModelConfig::new(ModelKindConfig::MclpCc(CapsConfig {
            caps: FacilityCaps::total(1),
        }));
        assert_eq!(config.model.family(), ModelFamily::MclpCc);
        let err = build_model(&coverage(), &config).unwrap_err();
        assert!(matches!(err, SpatialOptError::Range(_)));
    }

    struct Fractional;

    impl Solver for Fractional {
        fn solve(&mut self, _problem: &Problem) -> std::result::Result<Solution, SolverError> {
            Ok(Solution::new(
                SolveStatus::Optimal,
                vec![("F$f1".to_string(), 0.6), ("Y$A".to_string(), 1.0)],
            ))
        }
    }

    #[test]
    fn test_selection_uses_configured_threshold() {
        let coverage = coverage();
        let strict = ModelConfig::new(ModelKindConfig::Lscp);
        let mut problem = build_model(&coverage, &strict).unwrap();
        problem.solve(&mut Fractional);
        assert!(selected_facilities(&problem, &strict).is_empty());

        let loose = strict.with_threshold(0.5);
        assert_eq!(selected_facilities(&problem, &loose)["F"], vec!["f1"]);
    }

    #[test]
    fn test_load_config_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("model.yml");
        std::fs::write(&yaml, "model:\n  type: lscp\n").unwrap();
        assert_eq!(load_config(&yaml).unwrap().model, ModelKindConfig::Lscp);

        let toml = dir.path().join("model.toml");
        std::fs::write(&toml, "[model]\ntype = \"nope\"\n").unwrap();
        assert!(matches!(load_config(&toml), Err(SpatialOptError::Schema(_))));

        assert!(matches!(
            load_config(dir.path().join("absent.toml")),
            Err(SpatialOptError::Io(_))
        ));
    }
}
