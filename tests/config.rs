//! Configuration file and environment loading.

use irregular_ts::*;
use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;

// Environment variables are process wide.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn sample_config() -> PipelineConfig {
    ConfigBuilder::new()
        .missing_per_channel(vec![0.8, 0.2, 0.5])
        .seed(123)
        .mask(true)
        .delta(true)
        .impute(ImputeMethod::Forward)
        .categorical(vec![2])
        .standardise(Standardise::Data)
        .build()
        .unwrap()
}

#[test]
fn test_json_round_trip_with_overrides() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pipeline.json");

    let mut config = sample_config();
    config.overrides.insert(1, 0.0);
    config.save_to_file(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"override\""));
    assert!(content.contains("\"forward\""));

    let loaded = PipelineConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pipeline.toml");

    let config = sample_config();
    config.save_to_file(&path).unwrap();
    let loaded = PipelineConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_toml_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.toml");
    fs::write(&path, "missing = 0.25\nimpute = \"mean\"\n").unwrap();

    let config = PipelineConfig::load_from_file(&path).unwrap();
    assert_eq!(config.missing, Some(MissingRate::Global(0.25)));
    assert_eq!(config.impute, ImputeMethod::Mean);
    assert!(config.time);
    assert!(!config.mask);
    assert!(config.overrides.is_empty());
}

#[test]
fn test_invalid_files() {
    let dir = TempDir::new().unwrap();

    let path = dir.path().join("bad.toml");
    fs::write(&path, "missing = 1.5\n").unwrap();
    assert!(PipelineConfig::load_from_file(&path).unwrap_err().is_config());

    let path = dir.path().join("bad_method.json");
    fs::write(&path, r#"{"impute": "median"}"#).unwrap();
    let err = PipelineConfig::load_from_file(&path).unwrap_err();
    assert_eq!(err.category(), "json");

    let path = dir.path().join("config.yaml");
    fs::write(&path, "time: true\n").unwrap();
    assert!(PipelineConfig::load_from_file(&path).unwrap_err().is_config());

    let missing = dir.path().join("absent.toml");
    assert_eq!(
        PipelineConfig::load_from_file(&missing).unwrap_err().category(),
        "io"
    );
}

#[test]
fn test_environment_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var("IRREGULAR_TS_SEED", "42");
    std::env::set_var("IRREGULAR_TS_MISSING", "0.8,0.2,0.5");
    std::env::set_var("IRREGULAR_TS_IMPUTE", "zero");
    std::env::set_var("IRREGULAR_TS_MASK", "true");
    std::env::set_var("IRREGULAR_TS_TIME", "false");

    let config = PipelineConfig::load_from_environment();

    for name in ["SEED", "MISSING", "IMPUTE", "MASK", "TIME"] {
        std::env::remove_var(format!("IRREGULAR_TS_{}", name));
    }

    let config = config.unwrap();
    assert_eq!(config.seed, Some(42));
    assert_eq!(
        config.missing,
        Some(MissingRate::PerChannel(vec![0.8, 0.2, 0.5]))
    );
    assert_eq!(config.impute, ImputeMethod::Zero);
    assert!(config.mask);
    assert!(!config.time);
    assert!(!config.delta);
}

#[test]
fn test_environment_errors() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var("IRREGULAR_TS_IMPUTE", "median");
    let result = PipelineConfig::load_from_environment();
    std::env::remove_var("IRREGULAR_TS_IMPUTE");
    assert!(result.unwrap_err().is_config());

    std::env::set_var("IRREGULAR_TS_DELTA", "sometimes");
    let result = PipelineConfig::load_from_environment();
    std::env::remove_var("IRREGULAR_TS_DELTA");
    assert!(result.is_err());
}
