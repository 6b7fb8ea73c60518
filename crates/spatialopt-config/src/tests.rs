//! Tests for model configuration.

use std::io::Write;

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        delineator = "__"
        use_serviceable_demand = true
        export_path = "out/backup.lp"
        threshold = 0.5

        [model]
        type = "backup"

        [model.caps]
        total = 4
        fire = 1
        ems = 3
    "#;

    let config = ModelConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.delineator, "__");
    assert!(config.use_serviceable_demand);
    assert_eq!(config.export_path, Some(PathBuf::from("out/backup.lp")));
    assert_eq!(config.threshold, 0.5);
    assert_eq!(config.model.family(), ModelFamily::Backup);

    let ModelKindConfig::Backup(params) = &config.model else {
        panic!("expected backup model, got {:?}", config.model);
    };
    assert_eq!(params.caps.total, 4);
    assert_eq!(params.caps.for_type("fire"), Some(1));
    assert_eq!(params.caps.for_type("ems"), Some(3));
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        use_serviceable_demand: false
        model:
          type: traumah
          air_depots: 5
          trauma_centers: 10
    "#;

    let config = ModelConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.model.family(), ModelFamily::Traumah);
    let ModelKindConfig::Traumah(params) = config.model else {
        panic!("expected traumah model");
    };
    let counts: TraumahCounts = params.into();
    assert_eq!(counts, TraumahCounts::new(5, 10));
}

#[test]
fn test_every_family_tag() {
    let cases = [
        ("type = \"mclp\"\n[model.caps]\ntotal = 1", ModelFamily::Mclp),
        ("type = \"mclp_cc\"\n[model.caps]\ntotal = 1", ModelFamily::MclpCc),
        ("type = \"threshold\"\npsi = 50", ModelFamily::Threshold),
        ("type = \"cc_threshold\"\npsi = 12.5", ModelFamily::CcThreshold),
        ("type = \"backup\"\n[model.caps]\ntotal = 1", ModelFamily::Backup),
        ("type = \"lscp\"", ModelFamily::Lscp),
        (
            "type = \"traumah\"\nair_depots = 1\ntrauma_centers = 2",
            ModelFamily::Traumah,
        ),
    ];
    for (body, family) in cases {
        let config = ModelConfig::from_toml_str(&format!("[model]\n{}\n", body)).unwrap();
        assert_eq!(config.model.family(), family, "{}", body);
    }
}

#[test]
fn test_unknown_model_type_is_rejected() {
    let err = ModelConfig::from_toml_str("[model]\ntype = \"p_median\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_validation() {
    let err = ModelConfig::from_toml_str("delineator = \"\"\n[model]\ntype = \"lscp\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = ModelConfig::from_yaml_str("model:\n  type: threshold\n  psi: 120\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("psi")));

    let config = ModelConfig::new(ModelKindConfig::Lscp).with_threshold(f64::NAN);
    assert!(config.validate().is_err());
}

#[test]
fn test_builder_and_build_options() {
    let config = ModelConfig::new(ModelKindConfig::Mclp(CapsConfig {
        caps: FacilityCaps::total(3),
    }))
    .with_delineator("#")
    .with_serviceable_demand(true)
    .with_export_path("mclp.lp");

    let options = config.build_options();
    assert_eq!(options.delineator, "#");
    assert!(options.use_serviceable_demand);
    assert_eq!(options.export_path, Some(PathBuf::from("mclp.lp")));
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_from_files() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("model.toml");
    let mut file = std::fs::File::create(&toml_path).unwrap();
    writeln!(file, "[model]\ntype = \"threshold\"\npsi = 75").unwrap();
    let config = ModelConfig::load(&toml_path).unwrap();
    assert_eq!(config.model, ModelKindConfig::Threshold(ThresholdConfig { psi: 75.0 }));

    let yaml_path = dir.path().join("model.yaml");
    std::fs::write(&yaml_path, "model:\n  type: lscp\n").unwrap();
    let config = ModelConfig::from_yaml_file(&yaml_path).unwrap();
    assert_eq!(config.model, ModelKindConfig::Lscp);

    let err = ModelConfig::load(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
